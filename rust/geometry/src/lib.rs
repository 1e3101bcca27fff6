// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MEP-Openings Geometry
//!
//! Ray casting against triangulated planar solids and straight centerline
//! extraction, built on nalgebra.

pub mod curve;
pub mod error;
pub mod ray;
pub mod solid;

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry3, Point3, Vector3};

pub use curve::{Centerline, Curve};
pub use error::{Error, Result};
pub use ray::Ray;
pub use solid::{Aabb, PlanarSolid, SolidHits, Triangle};
