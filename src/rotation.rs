// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Closed-form axis-angle rotation, generic over the scalar type.

use nalgebra::{RealField, Vector3};

/// Rotate `point` by the axis-angle vector `angle_axis`.
///
/// With $\theta = \lVert \bm{\omega} \rVert$ and $\bm{k} = \bm{\omega} / \theta$,
/// this is Rodrigues' formula:
/// $$
/// \bm{R} \bm{p} = \bm{p} \cos\theta + (\bm{k} \times \bm{p}) \sin\theta
///     + \bm{k} \ (\bm{k} \cdot \bm{p}) (1 - \cos\theta)
/// $$
///
/// Near the identity the formula divides by $\theta$, so the first order
/// expansion $\bm{p} + \bm{\omega} \times \bm{p}$ is used instead.
/// It is exact up to $O(\theta^2)$ and keeps the derivative with respect to
/// $\bm{\omega}$ correct at zero, which `Rotation3::from_scaled_axis` does not.
pub fn angle_axis_rotate_point<T: RealField>(
    angle_axis: &Vector3<T>,
    point: &Vector3<T>,
) -> Vector3<T> {
    let theta2 = angle_axis.norm_squared();
    if theta2 > nalgebra::convert(f64::EPSILON) {
        let theta = theta2.sqrt();
        let (sin_theta, cos_theta) = theta.clone().sin_cos();
        let axis = angle_axis / theta;
        let axis_cross_point = axis.cross(point);
        let tmp = axis.dot(point) * (T::one() - cos_theta.clone());
        point * cos_theta + axis_cross_point * sin_theta + axis * tmp
    } else {
        point + angle_axis.cross(point)
    }
}

// Tests #######################################################################
