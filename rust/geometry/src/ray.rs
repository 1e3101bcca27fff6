// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Half-infinite rays used for penetration sampling.

use crate::error::{Error, Result};
use nalgebra::{Isometry3, Point3, Vector3};

/// Squared length below which a direction is treated as zero
const MIN_DIRECTION_NORM_SQ: f64 = 1e-24;

/// A ray starting at `origin` and extending along a unit `direction`.
///
/// Distances along the ray ("proximity") are measured in the same linear unit
/// as the origin coordinates because the direction is normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Create a ray, normalizing the direction
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Result<Self> {
        let norm_sq = direction.norm_squared();
        if !norm_sq.is_finite() || norm_sq < MIN_DIRECTION_NORM_SQ {
            return Err(Error::DegenerateDirection(format!(
                "({}, {}, {})",
                direction.x, direction.y, direction.z
            )));
        }

        Ok(Self {
            origin,
            direction: direction / norm_sq.sqrt(),
        })
    }

    /// Point at signed distance `t` from the origin
    #[inline]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// Express this ray in another frame.
    ///
    /// Isometries preserve lengths, so a proximity measured on the
    /// transformed ray is valid on the original one.
    pub fn transformed(&self, transform: &Isometry3<f64>) -> Self {
        Self {
            origin: transform.transform_point(&self.origin),
            direction: transform.transform_vector(&self.direction),
        }
    }

    /// Uniformly scale the origin about the world origin. Proximities on
    /// the result are in the scaled unit.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            origin: Point3::from(self.origin.coords * factor),
            direction: self.direction,
        }
    }
}
