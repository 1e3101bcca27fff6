// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turns a logical hit into a concrete opening placement.

use mep_openings_core::{Document, Error, HitKey, LevelKey, Result};
use mep_openings_geometry::{Centerline, Point3};

use crate::dedup::LogicalHit;

/// Everything needed to create one placeholder instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Penetration point on the run's centerline
    pub point: Point3<f64>,
    /// Barrier that will host the placeholder
    pub host: HitKey,
    /// Level of the host document the placeholder references
    pub level: LevelKey,
    pub width: f64,
    pub height: f64,
}

/// Resolves hits against the architectural document.
///
/// Pure: reads the document, never edits it.
#[derive(Debug, Clone, Copy)]
pub struct PlacementResolver<'a> {
    document: &'a Document,
    clearance: f64,
}

impl<'a> PlacementResolver<'a> {
    /// `clearance` must already be in the document's internal unit
    pub fn new(document: &'a Document, clearance: f64) -> Self {
        Self { document, clearance }
    }

    /// Opening size for a run of `diameter`, same on width and height
    #[inline]
    pub fn opening_size(&self, diameter: f64) -> f64 {
        diameter + self.clearance
    }

    /// Resolve one hit of the run described by `centerline` and `diameter`.
    ///
    /// Fails with [`Error::DanglingBarrierReference`] if the barrier is gone
    /// and [`Error::MissingLevel`] if it has no level this document knows.
    pub fn resolve(&self, centerline: &Centerline, diameter: f64, hit: &LogicalHit) -> Result<Placement> {
        let point = centerline.point_at(hit.proximity);

        let (owner, barrier) = self
            .document
            .resolve_hit(hit.key)
            .ok_or(Error::DanglingBarrierReference(hit.key))?;
        let level_key = barrier.level.ok_or(Error::MissingLevel(hit.key.barrier))?;
        let level = owner
            .level(level_key)
            .ok_or(Error::MissingLevel(hit.key.barrier))?;

        // Linked levels are matched to host levels by name
        let level = if hit.key.is_local() {
            level_key
        } else {
            self.document
                .level_by_name(&level.name)
                .ok_or(Error::MissingLevel(hit.key.barrier))?
        };

        let size = self.opening_size(diameter);
        Ok(Placement {
            point,
            host: hit.key,
            level,
            width: size,
            height: size,
        })
    }
}
