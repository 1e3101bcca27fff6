// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element records stored in a [`Document`](crate::Document).

use std::sync::Arc;

use mep_openings_geometry::{Curve, PlanarSolid};
use nalgebra::{Isometry3, Point3};
use rustc_hash::FxHashMap;

use crate::document::Document;
use crate::keys::{HitKey, LevelKey, SymbolKey};
use crate::units::LengthUnit;

/// Built-in element categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Walls,
    Floors,
    Roofs,
    Columns,
    StructuralFraming,
    GenericModel,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Walls => "Walls",
            Category::Floors => "Floors",
            Category::Roofs => "Roofs",
            Category::Columns => "Columns",
            Category::StructuralFraming => "StructuralFraming",
            Category::GenericModel => "GenericModel",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named reference elevation.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub name: String,
    pub elevation: f64,
}

impl Level {
    pub fn new(name: impl Into<String>, elevation: f64) -> Self {
        Self {
            name: name.into(),
            elevation,
        }
    }
}

/// A solid obstruction that linear runs may penetrate.
#[derive(Debug, Clone, PartialEq)]
pub struct Barrier {
    pub name: String,
    pub category: Category,
    pub level: Option<LevelKey>,
    pub solid: PlanarSolid,
    /// Whether family instances may be hosted on this element.
    /// Curtain walls and similar systems refuse hosted families.
    pub allows_hosting: bool,
}

impl Barrier {
    /// A basic wall on `level`
    pub fn wall(name: impl Into<String>, level: Option<LevelKey>, solid: PlanarSolid) -> Self {
        Self {
            name: name.into(),
            category: Category::Walls,
            level,
            solid,
            allows_hosting: true,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Mark the barrier as unable to host family instances
    pub fn without_hosting(mut self) -> Self {
        self.allows_hosting = false;
        self
    }
}

/// MEP discipline of a linear run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Discipline {
    Duct,
    Pipe,
}

impl Discipline {
    /// Processing order of a full scan
    pub const ALL: [Discipline; 2] = [Discipline::Duct, Discipline::Pipe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Discipline::Duct => "duct",
            Discipline::Pipe => "pipe",
        }
    }

    /// Name of the edit scope that creates this discipline's openings
    pub fn transaction_name(&self) -> &'static str {
        match self {
            Discipline::Duct => "Openings for ducts",
            Discipline::Pipe => "Openings for pipes",
        }
    }
}

impl std::fmt::Display for Discipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A duct or pipe segment.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRun {
    pub discipline: Discipline,
    pub curve: Curve,
    pub diameter: f64,
}

impl LinearRun {
    pub fn duct(curve: Curve, diameter: f64) -> Self {
        Self {
            discipline: Discipline::Duct,
            curve,
            diameter,
        }
    }

    pub fn pipe(curve: Curve, diameter: f64) -> Self {
        Self {
            discipline: Discipline::Pipe,
            curve,
            diameter,
        }
    }

    /// The same run with geometry and diameter re-expressed from `from`
    /// into `to`
    pub fn converted(&self, from: LengthUnit, to: LengthUnit) -> Self {
        if from == to {
            return self.clone();
        }
        Self {
            discipline: self.discipline,
            curve: self.curve.scaled(from.scale_to(to)),
            diameter: from.convert(self.diameter, to),
        }
    }
}

/// A 3D view. Template views are configuration holders, not viewable geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View3D {
    pub name: String,
    pub is_template: bool,
}

impl View3D {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_template: false,
        }
    }

    pub fn template(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_template: true,
        }
    }
}

/// A loadable family type.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilySymbol {
    pub family_name: String,
    pub name: String,
    pub category: Category,
    /// Instance parameters declared by the family
    pub parameters: Vec<String>,
    pub(crate) active: bool,
}

impl FamilySymbol {
    pub fn new(
        family_name: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        parameters: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            family_name: family_name.into(),
            name: name.into(),
            category,
            parameters: parameters.into_iter().map(Into::into).collect(),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn declares(&self, parameter: &str) -> bool {
        self.parameters.iter().any(|p| p == parameter)
    }
}

/// A family instance created by a placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderInstance {
    pub symbol: SymbolKey,
    pub point: Point3<f64>,
    pub host: HitKey,
    pub level: LevelKey,
    pub(crate) parameters: FxHashMap<String, f64>,
}

impl PlaceholderInstance {
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }
}

/// Another document placed into a host document.
#[derive(Debug, Clone)]
pub struct LinkInstance {
    pub name: String,
    /// Maps link coordinates into host coordinates
    pub transform: Isometry3<f64>,
    pub document: Arc<Document>,
}
