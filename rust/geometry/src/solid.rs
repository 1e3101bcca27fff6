// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar Solids
//!
//! Triangulated closed solids (walls, slabs, columns) and the ray tests run
//! against them. Every face is made of triangles, so one physical face may
//! answer a single ray more than once when the ray crosses a shared triangle
//! edge. Callers deduplicate at the element level.

use crate::error::{Error, Result};
use crate::ray::Ray;
use nalgebra::{Isometry3, Point3, Vector3};
use smallvec::SmallVec;

/// Determinant threshold below which a ray is parallel to a triangle
const PARALLEL_EPSILON: f64 = 1e-12;

/// Hits produced by one solid for one ray; walls rarely exceed four.
pub type SolidHits = SmallVec<[f64; 4]>;

/// Triangle definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Zero-area faces can never be hit and are dropped from solids
    pub fn is_degenerate(&self) -> bool {
        let doubled_area = (self.v1 - self.v0).cross(&(self.v2 - self.v0)).norm();
        doubled_area.is_nan() || doubled_area < PARALLEL_EPSILON
    }

    /// Two-sided Möller–Trumbore test.
    ///
    /// Returns the distance along the ray, or `None` when the ray misses,
    /// runs parallel to the triangle, or meets it behind the origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let p = ray.direction.cross(&edge2);
        let det = edge1.dot(&p);

        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.v0;
        let u = s.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = ray.direction.dot(&q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(&q) * inv_det;
        (t >= 0.0).then_some(t)
    }

    /// Apply a rigid transform to all three vertices
    pub fn transformed(&self, transform: &Isometry3<f64>) -> Self {
        Self {
            v0: transform.transform_point(&self.v0),
            v1: transform.transform_point(&self.v1),
            v2: transform.transform_point(&self.v2),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Bounding box of a point set, `None` when empty
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut min = first;
        let mut max = first;

        for p in iter {
            min = min.inf(p);
            max = max.sup(p);
        }

        Some(Self { min, max })
    }

    /// Slab test. Returns the parameter interval where the ray is inside the box.
    pub fn ray_interval(&self, ray: &Ray) -> Option<(f64, f64)> {
        let mut t_min = 0.0_f64;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir.abs() < PARALLEL_EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some((t_min, t_max))
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vector3::repeat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }
}

/// A closed solid described by planar triangles
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarSolid {
    faces: Vec<Triangle>,
    bounds: Aabb,
}

impl PlanarSolid {
    /// Build a solid from its boundary triangles. Degenerate faces are
    /// dropped; a solid with none left is invalid.
    pub fn from_triangles(mut faces: Vec<Triangle>) -> Result<Self> {
        faces.retain(|t| !t.is_degenerate());
        let bounds = Aabb::from_points(faces.iter().flat_map(|t| [&t.v0, &t.v1, &t.v2]))
            .ok_or_else(|| Error::InvalidSolid("solid has no faces".into()))?;
        Ok(Self { faces, bounds })
    }

    /// Create a box solid from AABB min/max bounds.
    /// 12 triangles, 2 per face.
    pub fn from_aabb(min: Point3<f64>, max: Point3<f64>) -> Self {
        let corners = [
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(max.x, max.y, max.z),
            Point3::new(min.x, max.y, max.z),
        ];
        Self::from_corners(corners)
    }

    /// Straight wall solid swept from a base line.
    ///
    /// `start` and `end` give the wall's location line at its base elevation;
    /// the solid extends `thickness / 2` to either side and `height` upward.
    pub fn wall(start: Point3<f64>, end: Point3<f64>, thickness: f64, height: f64) -> Result<Self> {
        let run = Vector3::new(end.x - start.x, end.y - start.y, 0.0);
        if run.norm() < PARALLEL_EPSILON {
            return Err(Error::InvalidSolid("wall location line has no horizontal length".into()));
        }
        if thickness <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidSolid(format!(
                "wall thickness {thickness} and height {height} must be positive"
            )));
        }

        let side = Vector3::z().cross(&run).normalize() * (thickness * 0.5);
        let up = Vector3::z() * height;
        let end = Point3::new(end.x, end.y, start.z);

        Ok(Self::from_corners([
            start - side,
            end - side,
            end + side,
            start + side,
            start - side + up,
            end - side + up,
            end + side + up,
            start + side + up,
        ]))
    }

    /// Corners ordered bottom ring (0..4) then top ring (4..8)
    fn from_corners(v: [Point3<f64>; 8]) -> Self {
        let faces = vec![
            // Bottom
            Triangle::new(v[0], v[2], v[1]),
            Triangle::new(v[0], v[3], v[2]),
            // Top
            Triangle::new(v[4], v[5], v[6]),
            Triangle::new(v[4], v[6], v[7]),
            // Sides
            Triangle::new(v[0], v[4], v[7]),
            Triangle::new(v[0], v[7], v[3]),
            Triangle::new(v[1], v[2], v[6]),
            Triangle::new(v[1], v[6], v[5]),
            Triangle::new(v[0], v[1], v[5]),
            Triangle::new(v[0], v[5], v[4]),
            Triangle::new(v[3], v[7], v[6]),
            Triangle::new(v[3], v[6], v[2]),
        ];
        let bounds = Aabb::from_points(v.iter()).unwrap_or(Aabb { min: v[0], max: v[0] });
        Self { faces, bounds }
    }

    pub fn faces(&self) -> &[Triangle] {
        &self.faces
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Distances of every face crossing along the ray, in face order.
    ///
    /// No ordering by distance and no merging: two faces of the same wall
    /// (or two triangles sharing an edge) each contribute an entry.
    pub fn ray_intersections(&self, ray: &Ray) -> SolidHits {
        let mut hits = SolidHits::new();
        if self.bounds.expanded(1e-9).ray_interval(ray).is_none() {
            return hits;
        }

        for face in &self.faces {
            if let Some(t) = face.intersect_ray(ray) {
                hits.push(t);
            }
        }
        hits
    }

    /// Apply a rigid transform to the whole solid
    pub fn transformed(&self, transform: &Isometry3<f64>) -> Self {
        let faces: Vec<Triangle> = self.faces.iter().map(|f| f.transformed(transform)).collect();
        let bounds = Aabb::from_points(faces.iter().flat_map(|t| [&t.v0, &t.v1, &t.v2]))
            .unwrap_or(self.bounds);
        Self { faces, bounds }
    }
}
