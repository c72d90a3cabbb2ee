// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type returned by the projecting transforms.

use thiserror::Error;

/// Failure of a transform that ends with a perspective divide.
///
/// This is the only failure the geometry core can report.
/// Every other input, including zero rotations and points at the origin,
/// is accepted as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The camera-space depth of the point is zero (or indistinguishable from zero),
    /// so the point lies on the focal plane of the camera and has no pixel coordinates.
    #[error("degenerate projection: camera-space depth is zero")]
    DegenerateProjection,
}
