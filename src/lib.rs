// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![warn(missing_docs)]

//! This package provides the coordinate transforms at the core of
//! landmark based visual self-localization.
//!
//! A corner of a planar landmark, given in the landmark's own plane,
//! is mapped to world coordinates with the landmark pose,
//! then to camera coordinates with the inverse of the camera pose,
//! and finally projected to pixels with a [pinhole camera model][pinhole]
//! with independent horizontal and vertical scale factors.
//!
//! Every transform is a pure function generic over [`nalgebra::RealField`].
//! It evaluates on `f64`, and on the dual numbers of [`num_dual`] so that
//! a nonlinear least squares optimizer can differentiate through it
//! when refining landmark and camera poses ([bundle adjustment][ba]).
//!
//! Poses and intrinsics are passed as flat blocks of 6 scalars,
//! whose slot order is described in [`layout`].
//!
//! [pinhole]: https://en.wikipedia.org/wiki/Pinhole_camera_model
//! [ba]: https://en.wikipedia.org/wiki/Bundle_adjustment

pub mod error;
pub mod jacobian;
pub mod layout;
pub mod residual;
pub mod rotation;
pub mod transform;

pub use crate::error::ProjectionError;
pub use crate::layout::{
    Intrinsics, IntrinsicsParam, Pose, PoseParam, INTRINSICS_DIM, POSE_DIM,
};
pub use crate::residual::{reprojection_residual, Observation};
pub use crate::rotation::angle_axis_rotate_point;
pub use crate::transform::{
    landmark_to_image, landmark_to_world, project, world_to_camera, world_to_image,
    DEGENERATE_DEPTH_RATIO,
};
