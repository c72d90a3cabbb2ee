// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Flat parameter block layouts shared with the optimizer.
//!
//! A pose and a set of camera intrinsics are both stored by the optimizer
//! as flat blocks of 6 scalars. The slot order of those blocks is the contract
//! between every producer and consumer of parameters, and it is never checked
//! at runtime: a block filled in the wrong order silently yields wrong numbers.
//!
//! [`Pose`] and [`Intrinsics`] are `#[repr(C)]` named views over those blocks
//! so call sites can use field names while keeping the exact flat layout.

use nalgebra::{Isometry3, RealField, Translation3, UnitQuaternion, Vector3};
use std::ops::Index;

/// Number of scalars in a pose parameter block.
pub const POSE_DIM: usize = 6;

/// Number of scalars in an intrinsics parameter block.
pub const INTRINSICS_DIM: usize = 6;

/// Slot of each pose parameter in a flat pose block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum PoseParam {
    /// Translation along x.
    X = 0,
    /// Translation along y.
    Y = 1,
    /// Translation along z.
    Z = 2,
    /// First component of the axis-angle rotation.
    Rx = 3,
    /// Second component of the axis-angle rotation.
    Ry = 4,
    /// Third component of the axis-angle rotation.
    Rz = 5,
}

impl PoseParam {
    /// All pose slots, in block order.
    pub const ALL: [PoseParam; POSE_DIM] = [
        PoseParam::X,
        PoseParam::Y,
        PoseParam::Z,
        PoseParam::Rx,
        PoseParam::Ry,
        PoseParam::Rz,
    ];

    /// Index of this parameter in the flat block.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Slot of each intrinsic parameter in a flat intrinsics block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum IntrinsicsParam {
    /// Focal length.
    F = 0,
    /// Horizontal coordinate of the principal point.
    U0 = 1,
    /// Vertical coordinate of the principal point.
    V0 = 2,
    /// Horizontal scale factor.
    Alpha = 3,
    /// Vertical scale factor.
    Beta = 4,
    /// Angle between the sensor axes.
    Theta = 5,
}

impl IntrinsicsParam {
    /// All intrinsics slots, in block order.
    pub const ALL: [IntrinsicsParam; INTRINSICS_DIM] = [
        IntrinsicsParam::F,
        IntrinsicsParam::U0,
        IntrinsicsParam::V0,
        IntrinsicsParam::Alpha,
        IntrinsicsParam::Beta,
        IntrinsicsParam::Theta,
    ];

    /// Index of this parameter in the flat block.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Six degrees of freedom pose of a landmark or a camera, expressed in world coordinates.
///
/// The rotation is an axis-angle vector $\bm{\omega} = (r_x, r_y, r_z)$:
/// its direction is the rotation axis and its norm $\theta = \lVert \bm{\omega} \rVert$
/// is the rotation angle. A point $\bm{p}$ of the local frame maps to the world as
/// $$
/// \bm{p_w} = \bm{R}(\bm{\omega}) \ \bm{p} + \bm{t}
/// $$
/// For a camera this means the pose is stored as camera-in-world, not world-in-camera.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Pose<T> {
    /// Translation along x.
    pub x: T,
    /// Translation along y.
    pub y: T,
    /// Translation along z.
    pub z: T,
    /// Axis-angle rotation, x component.
    pub rx: T,
    /// Axis-angle rotation, y component.
    pub ry: T,
    /// Axis-angle rotation, z component.
    pub rz: T,
}

impl<T: Clone> Pose<T> {
    /// Read a pose from a flat `[X, Y, Z, Rx, Ry, Rz]` block.
    #[inline]
    pub fn from_params(params: &[T; POSE_DIM]) -> Self {
        Self::from(params.clone())
    }

    /// Write the pose back to a flat `[X, Y, Z, Rx, Ry, Rz]` block.
    #[inline]
    pub fn to_params(&self) -> [T; POSE_DIM] {
        self.clone().into()
    }
}

impl<T: RealField> Pose<T> {
    /// Pose with zero translation and zero rotation.
    pub fn identity() -> Self {
        Self::from_parts(Vector3::zeros(), Vector3::zeros())
    }

    /// Build a pose from its translation and its axis-angle rotation.
    pub fn from_parts(translation: Vector3<T>, axis_angle: Vector3<T>) -> Self {
        let [x, y, z]: [T; 3] = translation.into();
        let [rx, ry, rz]: [T; 3] = axis_angle.into();
        Self { x, y, z, rx, ry, rz }
    }

    /// Translation part $(X, Y, Z)$.
    #[inline]
    pub fn translation(&self) -> Vector3<T> {
        Vector3::new(self.x.clone(), self.y.clone(), self.z.clone())
    }

    /// Axis-angle rotation part $(R_x, R_y, R_z)$.
    #[inline]
    pub fn axis_angle(&self) -> Vector3<T> {
        Vector3::new(self.rx.clone(), self.ry.clone(), self.rz.clone())
    }
}

impl Pose<f64> {
    /// Convert from nalgebra Isometry3 type.
    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        Self::from_parts(iso.translation.vector, iso.rotation.scaled_axis())
    }

    /// Convert to nalgebra Isometry3 type, mapping local coordinates to world coordinates.
    pub fn to_isometry(&self) -> Isometry3<f64> {
        let rotation = UnitQuaternion::from_scaled_axis(self.axis_angle());
        Isometry3::from_parts(Translation3::from(self.translation()), rotation)
    }
}

impl<T> From<[T; POSE_DIM]> for Pose<T> {
    #[inline]
    fn from([x, y, z, rx, ry, rz]: [T; POSE_DIM]) -> Self {
        Self { x, y, z, rx, ry, rz }
    }
}

impl<T> From<Pose<T>> for [T; POSE_DIM] {
    #[inline]
    fn from(pose: Pose<T>) -> Self {
        [pose.x, pose.y, pose.z, pose.rx, pose.ry, pose.rz]
    }
}

impl<T> Index<PoseParam> for Pose<T> {
    type Output = T;

    fn index(&self, param: PoseParam) -> &T {
        match param {
            PoseParam::X => &self.x,
            PoseParam::Y => &self.y,
            PoseParam::Z => &self.z,
            PoseParam::Rx => &self.rx,
            PoseParam::Ry => &self.ry,
            PoseParam::Rz => &self.rz,
        }
    }
}

/// Linear intrinsic parameters of a pinhole camera.
///
/// The projection matrix built from these parameters is
/// $$
/// \bm{K} = \begin{pmatrix}
///     f \alpha & 0 & u_0 \\\\
///     0 & f \beta & v_0 \\\\
///     0 & 0 & 1
/// \end{pmatrix}
/// $$
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Intrinsics<T> {
    /// Focal length.
    pub f: T,
    /// Horizontal coordinate of the principal point, in pixels.
    pub u0: T,
    /// Vertical coordinate of the principal point, in pixels.
    pub v0: T,
    /// Horizontal scale factor.
    pub alpha: T,
    /// Vertical scale factor.
    pub beta: T,
    /// Angle between the sensor axes.
    ///
    /// This slot is part of the block layout but the projection does not read it:
    /// the sensor axes are assumed orthogonal (90°), so no skew term enters $\bm{K}$.
    /// Whether a skewed sensor model should eventually consume it is undecided.
    pub theta: T,
}

impl<T: Clone> Intrinsics<T> {
    /// Read intrinsics from a flat `[f, u0, v0, alpha, beta, theta]` block.
    #[inline]
    pub fn from_params(params: &[T; INTRINSICS_DIM]) -> Self {
        Self::from(params.clone())
    }

    /// Write the intrinsics back to a flat `[f, u0, v0, alpha, beta, theta]` block.
    #[inline]
    pub fn to_params(&self) -> [T; INTRINSICS_DIM] {
        self.clone().into()
    }
}

impl<T> From<[T; INTRINSICS_DIM]> for Intrinsics<T> {
    #[inline]
    fn from([f, u0, v0, alpha, beta, theta]: [T; INTRINSICS_DIM]) -> Self {
        Self {
            f,
            u0,
            v0,
            alpha,
            beta,
            theta,
        }
    }
}

impl<T> From<Intrinsics<T>> for [T; INTRINSICS_DIM] {
    #[inline]
    fn from(intrinsics: Intrinsics<T>) -> Self {
        [
            intrinsics.f,
            intrinsics.u0,
            intrinsics.v0,
            intrinsics.alpha,
            intrinsics.beta,
            intrinsics.theta,
        ]
    }
}

impl<T> Index<IntrinsicsParam> for Intrinsics<T> {
    type Output = T;

    fn index(&self, param: IntrinsicsParam) -> &T {
        match param {
            IntrinsicsParam::F => &self.f,
            IntrinsicsParam::U0 => &self.u0,
            IntrinsicsParam::V0 => &self.v0,
            IntrinsicsParam::Alpha => &self.alpha,
            IntrinsicsParam::Beta => &self.beta,
            IntrinsicsParam::Theta => &self.theta,
        }
    }
}

// Tests #######################################################################
