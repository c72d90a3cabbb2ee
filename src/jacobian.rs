// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Forward-mode Jacobians of the landmark to image chain, computed with `num-dual`.
//!
//! The transforms are evaluated on [`Dual64`] numbers, seeding one parameter at a time.
//! Each evaluation yields one column of the Jacobian, so a full evaluation costs
//! one pass for the value and one pass per parameter (18 in total).
//! Observations are constants and are never differentiated.

use crate::error::ProjectionError;
use crate::layout::{INTRINSICS_DIM, POSE_DIM};
use crate::residual::{reprojection_residual, Observation};
use crate::transform::landmark_to_image;
use nalgebra::{SMatrix, Vector2};
use num_dual::Dual64;

/// Jacobian block of a 2D output with respect to one 6 parameter block.
pub type Block = SMatrix<f64, 2, POSE_DIM>;

// Intrinsics derivatives are stored in a `Block` too.
const _: () = assert!(INTRINSICS_DIM == POSE_DIM);

/// Parameter blocks a reprojection depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterBlock {
    /// Pose of the observed landmark.
    LandmarkPose,
    /// Pose of the observing camera.
    CameraPose,
    /// Camera intrinsics.
    Intrinsics,
}

impl ParameterBlock {
    /// All blocks, in the order they are passed to the transforms.
    pub const ALL: [ParameterBlock; 3] = [
        ParameterBlock::LandmarkPose,
        ParameterBlock::CameraPose,
        ParameterBlock::Intrinsics,
    ];

    /// Number of scalars in the block.
    pub const fn dim(self) -> usize {
        match self {
            ParameterBlock::LandmarkPose | ParameterBlock::CameraPose => POSE_DIM,
            ParameterBlock::Intrinsics => INTRINSICS_DIM,
        }
    }
}

/// Value of a 2D function of the parameter blocks, with its derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReprojectionJacobian {
    /// Function value.
    pub value: Vector2<f64>,
    /// Derivatives with respect to the landmark pose `[X, Y, Z, Rx, Ry, Rz]`.
    pub landmark_pose: Block,
    /// Derivatives with respect to the camera pose `[X, Y, Z, Rx, Ry, Rz]`.
    pub camera_pose: Block,
    /// Derivatives with respect to the intrinsics `[f, u0, v0, alpha, beta, theta]`.
    /// The `theta` column is always zero.
    pub intrinsics: Block,
}

impl ReprojectionJacobian {
    /// Jacobian block of one parameter block.
    pub fn block(&self, block: ParameterBlock) -> &Block {
        match block {
            ParameterBlock::LandmarkPose => &self.landmark_pose,
            ParameterBlock::CameraPose => &self.camera_pose,
            ParameterBlock::Intrinsics => &self.intrinsics,
        }
    }

    fn block_mut(&mut self, block: ParameterBlock) -> &mut Block {
        match block {
            ParameterBlock::LandmarkPose => &mut self.landmark_pose,
            ParameterBlock::CameraPose => &mut self.camera_pose,
            ParameterBlock::Intrinsics => &mut self.intrinsics,
        }
    }
}

/// Jacobian of the predicted pixel of a landmark corner, see [`landmark_to_image`].
pub fn image_jacobian(
    corner: [f64; 2],
    landmark_pose: &[f64; POSE_DIM],
    camera_pose: &[f64; POSE_DIM],
    intrinsics: &[f64; INTRINSICS_DIM],
) -> Result<ReprojectionJacobian, ProjectionError> {
    let [x, y] = corner;
    forward_jacobian(landmark_pose, camera_pose, intrinsics, |lm, cam, k| {
        let uv = landmark_to_image(Dual64::new(x, 0.0), Dual64::new(y, 0.0), lm, cam, k)?;
        Ok(uv.coords)
    })
}

/// Jacobian of the reprojection residual of an observation, see [`reprojection_residual`].
pub fn reprojection_jacobian(
    observation: &Observation,
    landmark_pose: &[f64; POSE_DIM],
    camera_pose: &[f64; POSE_DIM],
    intrinsics: &[f64; INTRINSICS_DIM],
) -> Result<ReprojectionJacobian, ProjectionError> {
    forward_jacobian(landmark_pose, camera_pose, intrinsics, |lm, cam, k| {
        reprojection_residual(observation, lm, cam, k)
    })
}

// Private functions ###########################################################

type DualPose = [Dual64; POSE_DIM];
type DualIntrinsics = [Dual64; INTRINSICS_DIM];

/// Evaluate `f` once for the value, then once per seeded parameter.
fn forward_jacobian<F>(
    landmark_pose: &[f64; POSE_DIM],
    camera_pose: &[f64; POSE_DIM],
    intrinsics: &[f64; INTRINSICS_DIM],
    f: F,
) -> Result<ReprojectionJacobian, ProjectionError>
where
    F: Fn(&DualPose, &DualPose, &DualIntrinsics) -> Result<Vector2<Dual64>, ProjectionError>,
{
    let value = f(
        &lift(landmark_pose, None),
        &lift(camera_pose, None),
        &lift(intrinsics, None),
    )?;
    let mut jacobian = ReprojectionJacobian {
        value: value.map(|d| d.re),
        landmark_pose: Block::zeros(),
        camera_pose: Block::zeros(),
        intrinsics: Block::zeros(),
    };

    for block in ParameterBlock::ALL {
        for col in 0..block.dim() {
            let seed = |b: ParameterBlock| if b == block { Some(col) } else { None };
            let output = f(
                &lift(landmark_pose, seed(ParameterBlock::LandmarkPose)),
                &lift(camera_pose, seed(ParameterBlock::CameraPose)),
                &lift(intrinsics, seed(ParameterBlock::Intrinsics)),
            )?;
            jacobian
                .block_mut(block)
                .set_column(col, &output.map(|d| d.eps));
        }
    }
    Ok(jacobian)
}

/// Lift a parameter block to dual numbers, with a unit derivative on `seed` only.
fn lift<const N: usize>(params: &[f64; N], seed: Option<usize>) -> [Dual64; N] {
    std::array::from_fn(|i| {
        let eps = if seed == Some(i) { 1.0 } else { 0.0 };
        Dual64::new(params[i], eps)
    })
}

// Tests #######################################################################
