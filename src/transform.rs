// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Landmark to world to image transforms.
//!
//! All functions are pure, allocation free and generic over [`RealField`],
//! so the same code is evaluated on `f64` and on dual numbers
//! when an optimizer differentiates through it.
//! Pose and intrinsics arguments are the flat blocks described in [`crate::layout`].

use crate::error::ProjectionError;
use crate::layout::{Intrinsics, Pose, INTRINSICS_DIM, POSE_DIM};
use crate::rotation::angle_axis_rotate_point;
use nalgebra::{Point2, Point3, RealField, Vector3};

/// A camera-space depth is treated as zero by the perspective divide when its magnitude
/// is at most this fraction of the largest camera-space coordinate of the point.
///
/// The test is relative so that scaling a point about the camera center never changes
/// whether it projects.
pub const DEGENERATE_DEPTH_RATIO: f64 = f64::EPSILON;

/// Transform a point given in landmark coordinates into world coordinates.
///
/// Landmarks are planar, so the local point is $(x, y, 0)$.
/// It is rotated by the landmark axis-angle rotation, then translated by the landmark position.
pub fn landmark_to_world<T: RealField>(x: T, y: T, landmark_pose: &[T; POSE_DIM]) -> Point3<T> {
    let pose = Pose::from_params(landmark_pose);
    let p_lm = Vector3::new(x, y, T::zero());
    let p_w = angle_axis_rotate_point(&pose.axis_angle(), &p_lm) + pose.translation();
    Point3::from(p_w)
}

/// Transform a point given in world coordinates into camera coordinates.
///
/// The camera pose is camera-in-world, so this applies its inverse:
/// the camera position is subtracted first, then the point is rotated by the negated
/// axis-angle vector.
pub fn world_to_camera<T: RealField>(world: &Point3<T>, camera_pose: &[T; POSE_DIM]) -> Vector3<T> {
    let pose = Pose::from_params(camera_pose);
    let p_c = &world.coords - pose.translation();
    angle_axis_rotate_point(&-pose.axis_angle(), &p_c)
}

/// Project a point given in camera coordinates onto the image.
///
/// $$
/// \begin{pmatrix} u \\\\ v \end{pmatrix} = \frac{1}{z_c}
/// \begin{pmatrix}
///     f \alpha \ x_c + u_0 \ z_c \\\\
///     f \beta \ y_c + v_0 \ z_c
/// \end{pmatrix}
/// $$
///
/// The sensor axes are assumed orthogonal, the `theta` intrinsic is not read.
/// Returns [`ProjectionError::DegenerateProjection`] when
/// $|z_c| \le \epsilon \max(|x_c|, |y_c|, |z_c|)$ with $\epsilon$ = [`DEGENERATE_DEPTH_RATIO`],
/// which includes $z_c = 0$ and the camera center itself, and never a non finite pixel in that case.
pub fn project<T: RealField>(
    camera: &Vector3<T>,
    intrinsics: &[T; INTRINSICS_DIM],
) -> Result<Point2<T>, ProjectionError> {
    let k = Intrinsics::from_params(intrinsics);
    let (xc, yc, zc) = (camera.x.clone(), camera.y.clone(), camera.z.clone());

    let scale = xc.clone().abs().max(yc.clone().abs()).max(zc.clone().abs());
    let zi = zc.clone();
    if zi.clone().abs() <= scale * nalgebra::convert::<f64, T>(DEGENERATE_DEPTH_RATIO) {
        log::trace!("camera-space depth is zero, point has no image coordinates");
        return Err(ProjectionError::DegenerateProjection);
    }
    let xi = k.f.clone() * k.alpha * xc + k.u0 * zc.clone();
    let yi = k.f * k.beta * yc + k.v0 * zc;

    Ok(Point2::new(xi / zi.clone(), yi / zi))
}

/// Transform a point given in world coordinates into image coordinates.
///
/// Chains [`world_to_camera`] and [`project`].
pub fn world_to_image<T: RealField>(
    world: &Point3<T>,
    camera_pose: &[T; POSE_DIM],
    intrinsics: &[T; INTRINSICS_DIM],
) -> Result<Point2<T>, ProjectionError> {
    let p_c = world_to_camera(world, camera_pose);
    project(&p_c, intrinsics)
}

/// Transform a point given in landmark coordinates into image coordinates.
///
/// This is the prediction wired into reprojection residuals.
/// It fails exactly when [`world_to_image`] fails on the intermediate world point.
pub fn landmark_to_image<T: RealField>(
    x: T,
    y: T,
    landmark_pose: &[T; POSE_DIM],
    camera_pose: &[T; POSE_DIM],
    intrinsics: &[T; INTRINSICS_DIM],
) -> Result<Point2<T>, ProjectionError> {
    let world = landmark_to_world(x, y, landmark_pose);
    world_to_image(&world, camera_pose, intrinsics)
}

// Tests #######################################################################
