// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building documents.
//!
//! A [`Document`] owns every element of one model in slot maps keyed by the
//! types in [`crate::keys`]. Reads are free; placeholder edits go through a
//! [`Transaction`](crate::Transaction) so they can be rolled back.

use std::sync::Arc;

use nalgebra::Isometry3;
use slotmap::SlotMap;

use crate::element::{
    Barrier, Category, Discipline, FamilySymbol, Level, LinearRun, LinkInstance,
    PlaceholderInstance, View3D,
};
use crate::error::{Error, Result};
use crate::keys::*;
use crate::units::{DocumentUnits, LengthUnit};

/// One building model (architectural, mechanical, ...).
///
/// # Example
///
/// ```
/// use mep_openings_core::{Document, LengthUnit, Level};
///
/// let mut doc = Document::new("AR", LengthUnit::Millimeters);
/// let ground = doc.add_level(Level::new("Level 1", 0.0));
///
/// assert_eq!(doc.level(ground).map(|l| l.name.as_str()), Some("Level 1"));
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    title: String,
    internal_unit: LengthUnit,
    pub(crate) levels: SlotMap<LevelKey, Level>,
    pub(crate) barriers: SlotMap<BarrierKey, Barrier>,
    pub(crate) runs: SlotMap<RunKey, LinearRun>,
    pub(crate) views: SlotMap<ViewKey, View3D>,
    pub(crate) symbols: SlotMap<SymbolKey, FamilySymbol>,
    pub(crate) placeholders: SlotMap<PlaceholderKey, PlaceholderInstance>,
    pub(crate) links: SlotMap<LinkKey, LinkInstance>,
}

impl Document {
    pub fn new(title: impl Into<String>, internal_unit: LengthUnit) -> Self {
        Self {
            title: title.into(),
            internal_unit,
            levels: SlotMap::with_key(),
            barriers: SlotMap::with_key(),
            runs: SlotMap::with_key(),
            views: SlotMap::with_key(),
            symbols: SlotMap::with_key(),
            placeholders: SlotMap::with_key(),
            links: SlotMap::with_key(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn internal_unit(&self) -> LengthUnit {
        self.internal_unit
    }

    /// Converter into this document's internal unit
    pub fn units(&self) -> DocumentUnits {
        DocumentUnits {
            internal: self.internal_unit,
        }
    }

    // ---- Levels ----

    pub fn add_level(&mut self, level: Level) -> LevelKey {
        self.levels.insert(level)
    }

    pub fn level(&self, key: LevelKey) -> Option<&Level> {
        self.levels.get(key)
    }

    pub fn level_by_name(&self, name: &str) -> Option<LevelKey> {
        self.levels
            .iter()
            .find(|(_, level)| level.name == name)
            .map(|(key, _)| key)
    }

    // ---- Barriers ----

    pub fn add_barrier(&mut self, barrier: Barrier) -> BarrierKey {
        self.barriers.insert(barrier)
    }

    pub fn barrier(&self, key: BarrierKey) -> Option<&Barrier> {
        self.barriers.get(key)
    }

    /// Delete a barrier. Its key goes stale for good.
    pub fn remove_barrier(&mut self, key: BarrierKey) -> Option<Barrier> {
        self.barriers.remove(key)
    }

    pub fn barriers(&self) -> impl Iterator<Item = (BarrierKey, &Barrier)> {
        self.barriers.iter()
    }

    /// Barriers of one category
    pub fn barriers_of(&self, category: Category) -> impl Iterator<Item = (BarrierKey, &Barrier)> {
        self.barriers.iter().filter(move |(_, b)| b.category == category)
    }

    // ---- Linear runs ----

    pub fn add_run(&mut self, run: LinearRun) -> RunKey {
        self.runs.insert(run)
    }

    pub fn run(&self, key: RunKey) -> Option<&LinearRun> {
        self.runs.get(key)
    }

    pub fn runs_of(&self, discipline: Discipline) -> impl Iterator<Item = (RunKey, &LinearRun)> {
        self.runs.iter().filter(move |(_, r)| r.discipline == discipline)
    }

    /// Owned copies of every run of a discipline, in document order
    pub fn snapshot_runs(&self, discipline: Discipline) -> Vec<(RunKey, LinearRun)> {
        self.runs_of(discipline)
            .map(|(key, run)| (key, run.clone()))
            .collect()
    }

    /// Like [`snapshot_runs`](Self::snapshot_runs), with every run converted
    /// from this document's unit into `unit`
    pub fn snapshot_runs_in(&self, discipline: Discipline, unit: LengthUnit) -> Vec<(RunKey, LinearRun)> {
        self.runs_of(discipline)
            .map(|(key, run)| (key, run.converted(self.internal_unit, unit)))
            .collect()
    }

    // ---- Views ----

    pub fn add_view(&mut self, view: View3D) -> ViewKey {
        self.views.insert(view)
    }

    pub fn view(&self, key: ViewKey) -> Option<&View3D> {
        self.views.get(key)
    }

    /// First 3D view that is not a template
    pub fn first_3d_view(&self) -> Option<ViewKey> {
        self.views
            .iter()
            .find(|(_, view)| !view.is_template)
            .map(|(key, _)| key)
    }

    // ---- Family symbols ----

    pub fn add_symbol(&mut self, symbol: FamilySymbol) -> SymbolKey {
        self.symbols.insert(symbol)
    }

    pub fn symbol(&self, key: SymbolKey) -> Option<&FamilySymbol> {
        self.symbols.get(key)
    }

    /// First symbol of `family_name` in `category`
    pub fn find_symbol(&self, family_name: &str, category: Category) -> Option<SymbolKey> {
        self.symbols
            .iter()
            .find(|(_, s)| s.category == category && s.family_name == family_name)
            .map(|(key, _)| key)
    }

    /// Activate a symbol so instances can be created from it.
    ///
    /// Returns `true` if the call changed the state, `false` if it was
    /// already active.
    pub fn activate_symbol(&mut self, key: SymbolKey) -> Result<bool> {
        let symbol = self.symbols.get_mut(key).ok_or(Error::SymbolNotFound(key))?;
        if symbol.active {
            return Ok(false);
        }
        symbol.active = true;
        Ok(true)
    }

    // ---- Placeholders ----

    pub fn placeholder(&self, key: PlaceholderKey) -> Option<&PlaceholderInstance> {
        self.placeholders.get(key)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = (PlaceholderKey, &PlaceholderInstance)> {
        self.placeholders.iter()
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    // ---- Links ----

    pub fn add_link(
        &mut self,
        name: impl Into<String>,
        transform: Isometry3<f64>,
        document: Arc<Document>,
    ) -> LinkKey {
        self.links.insert(LinkInstance {
            name: name.into(),
            transform,
            document,
        })
    }

    pub fn link(&self, key: LinkKey) -> Option<&LinkInstance> {
        self.links.get(key)
    }

    pub fn links(&self) -> impl Iterator<Item = (LinkKey, &LinkInstance)> {
        self.links.iter()
    }

    /// Resolve a hit identity to its barrier, following the link if any
    pub fn resolve_hit(&self, hit: HitKey) -> Option<(&Document, &Barrier)> {
        if hit.is_local() {
            return self.barrier(hit.barrier).map(|b| (self, b));
        }
        let link = self.link(hit.link)?;
        let barrier = link.document.barrier(hit.barrier)?;
        Some((link.document.as_ref(), barrier))
    }
}
