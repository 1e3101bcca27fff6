// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Location curves of linear elements and their straight centerlines.

use crate::error::{Error, Result};
use crate::ray::Ray;
use nalgebra::{Point3, Vector3};

/// Shortest line that still has a usable direction
const MIN_LINE_LENGTH: f64 = 1e-9;

/// Location curve of a duct or pipe
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    /// Straight segment between two end points
    Line { start: Point3<f64>, end: Point3<f64> },
    /// Circular arc (bent runs). Carried so scans can report it, never sampled.
    Arc {
        center: Point3<f64>,
        radius: f64,
        normal: Vector3<f64>,
        start_angle: f64,
        end_angle: f64,
    },
}

impl Curve {
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Self {
        Curve::Line { start, end }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Curve::Line { .. })
    }

    /// Uniformly scale about the origin, as when changing length unit
    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            Curve::Line { start, end } => Curve::Line {
                start: Point3::from(start.coords * factor),
                end: Point3::from(end.coords * factor),
            },
            Curve::Arc {
                center,
                radius,
                normal,
                start_angle,
                end_angle,
            } => Curve::Arc {
                center: Point3::from(center.coords * factor),
                radius: radius * factor,
                normal: *normal,
                start_angle: *start_angle,
                end_angle: *end_angle,
            },
        }
    }

    /// Straight centerline of the curve.
    ///
    /// Only lines qualify. Arcs and zero-length lines fail with
    /// [`Error::UnsupportedGeometry`].
    pub fn centerline(&self) -> Result<Centerline> {
        match self {
            Curve::Line { start, end } => {
                let delta = end - start;
                let length = delta.norm();
                if !length.is_finite() || length < MIN_LINE_LENGTH {
                    return Err(Error::UnsupportedGeometry(format!(
                        "line of length {length} has no direction"
                    )));
                }
                Ok(Centerline {
                    origin: *start,
                    direction: delta / length,
                    length,
                })
            }
            Curve::Arc { radius, .. } => Err(Error::UnsupportedGeometry(format!(
                "arc of radius {radius} is not a straight run"
            ))),
        }
    }
}

/// Start point, unit direction and finite length of a straight run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centerline {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
    pub length: f64,
}

impl Centerline {
    /// Point at distance `proximity` from the start point
    #[inline]
    pub fn point_at(&self, proximity: f64) -> Point3<f64> {
        self.origin + self.direction * proximity
    }

    /// End point of the run
    pub fn end(&self) -> Point3<f64> {
        self.point_at(self.length)
    }

    /// Whether a hit at `proximity` lies on the finite run (inclusive at both ends)
    #[inline]
    pub fn contains(&self, proximity: f64) -> bool {
        (0.0..=self.length).contains(&proximity)
    }

    /// The infinite sampling ray along this centerline
    pub fn ray(&self) -> Ray {
        Ray {
            origin: self.origin,
            direction: self.direction,
        }
    }
}
