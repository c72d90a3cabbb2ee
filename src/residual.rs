// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reprojection residual of a single landmark corner observation.

use crate::error::ProjectionError;
use crate::layout::{INTRINSICS_DIM, POSE_DIM};
use crate::transform::landmark_to_image;
use nalgebra::{RealField, Vector2};

/// A landmark corner seen in an image.
///
/// Both members are measurements, so they stay `f64` whatever scalar
/// the parameters are evaluated with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Position of the corner in its landmark plane.
    pub corner: [f64; 2],
    /// Measured pixel coordinates of the corner.
    pub pixel: [f64; 2],
}

impl Observation {
    /// Pair a landmark corner with the pixel it was detected at.
    pub fn new(corner: [f64; 2], pixel: [f64; 2]) -> Self {
        Self { corner, pixel }
    }
}

/// Difference between the predicted and the measured pixel of an observation, `predicted - measured`.
///
/// A degenerate projection is handed back to the caller,
/// which decides whether to skip the observation or abort the step.
pub fn reprojection_residual<T: RealField>(
    observation: &Observation,
    landmark_pose: &[T; POSE_DIM],
    camera_pose: &[T; POSE_DIM],
    intrinsics: &[T; INTRINSICS_DIM],
) -> Result<Vector2<T>, ProjectionError> {
    let [x, y] = observation.corner;
    let predicted = landmark_to_image(
        nalgebra::convert(x),
        nalgebra::convert(y),
        landmark_pose,
        camera_pose,
        intrinsics,
    )?;
    let [u, v] = observation.pixel;
    Ok(Vector2::new(
        predicted.x.clone() - nalgebra::convert::<f64, T>(u),
        predicted.y.clone() - nalgebra::convert::<f64, T>(v),
    ))
}
