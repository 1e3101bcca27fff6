// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ray casting against barrier solids.
//!
//! [`RayCaster`] is the only seam between the placement pipeline and the
//! geometry kernel. [`ReferenceIntersector`] is the document-backed
//! implementation; tests substitute scripted casters.

use mep_openings_core::{BarrierKey, Category, Document, Error, HitKey, LinkKey, Result, ViewKey};
use mep_openings_geometry::Ray;

/// One raw ray-solid crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawHit {
    /// Distance from the ray origin along its direction
    pub proximity: f64,
    pub barrier: BarrierKey,
    /// Null for barriers of the sampled document itself
    pub link: LinkKey,
}

impl RawHit {
    pub fn local(proximity: f64, barrier: BarrierKey) -> Self {
        Self {
            proximity,
            barrier,
            link: LinkKey::host(),
        }
    }

    /// Logical identity used for deduplication
    #[inline]
    pub fn key(&self) -> HitKey {
        HitKey::linked(self.barrier, self.link)
    }
}

/// Finds every barrier crossing along a ray.
///
/// The returned hits are in no particular order and may contain several
/// entries for the same barrier. An empty result is not an error.
pub trait RayCaster {
    fn cast(&self, ray: &Ray) -> Vec<RawHit>;
}

impl<C: RayCaster + ?Sized> RayCaster for &C {
    fn cast(&self, ray: &Ray) -> Vec<RawHit> {
        (**self).cast(ray)
    }
}

/// Accepts barriers of a single category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementClassFilter {
    pub category: Category,
}

impl ElementClassFilter {
    pub fn new(category: Category) -> Self {
        Self { category }
    }

    /// The filter used for opening placement: walls only
    pub fn walls() -> Self {
        Self::new(Category::Walls)
    }
}

/// Document-backed ray caster.
///
/// Construction requires a non-template 3D view as the sampling context; the
/// view is never modified.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceIntersector<'a> {
    document: &'a Document,
    filter: ElementClassFilter,
    include_links: bool,
}

impl<'a> ReferenceIntersector<'a> {
    /// Bind to a specific view. Fails if the view is missing or a template.
    pub fn new(document: &'a Document, filter: ElementClassFilter, view: ViewKey) -> Result<Self> {
        match document.view(view) {
            Some(v) if !v.is_template => Ok(Self {
                document,
                filter,
                include_links: false,
            }),
            _ => Err(Error::NoSamplingContext),
        }
    }

    /// Bind to the document's first non-template 3D view
    pub fn for_document(document: &'a Document, filter: ElementClassFilter) -> Result<Self> {
        let view = document.first_3d_view().ok_or(Error::NoSamplingContext)?;
        Self::new(document, filter, view)
    }

    /// Also search barriers inside link instances
    pub fn with_links(mut self, include_links: bool) -> Self {
        self.include_links = include_links;
        self
    }

    /// `ray` is in `document`'s unit; `to_host` scales its proximities back
    fn cast_document(&self, document: &Document, ray: &Ray, link: LinkKey, to_host: f64, hits: &mut Vec<RawHit>) {
        for (key, barrier) in document.barriers_of(self.filter.category) {
            hits.extend(
                barrier
                    .solid
                    .ray_intersections(ray)
                    .into_iter()
                    .map(|proximity| RawHit {
                        proximity: proximity * to_host,
                        barrier: key,
                        link,
                    }),
            );
        }
    }
}

impl RayCaster for ReferenceIntersector<'_> {
    fn cast(&self, ray: &Ray) -> Vec<RawHit> {
        let mut hits = Vec::new();
        self.cast_document(self.document, ray, LinkKey::host(), 1.0, &mut hits);

        if self.include_links {
            let host_unit = self.document.internal_unit();
            for (link_key, link) in self.document.links() {
                // The transform is in host units; only the unit change rescales distances
                let link_unit = link.document.internal_unit();
                let local_ray = ray
                    .transformed(&link.transform.inverse())
                    .scaled(host_unit.scale_to(link_unit));
                let to_host = link_unit.scale_to(host_unit);
                self.cast_document(&link.document, &local_ray, link_key, to_host, &mut hits);
            }
        }

        hits
    }
}
