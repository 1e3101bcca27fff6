// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # MEP-Openings Core
//!
//! In-memory building model used by the opening placement engine.
//!
//! Documents store levels, barriers (walls, floors, ...), linear MEP runs,
//! 3D views, family symbols, placeholder instances and link instances in
//! slot maps with generational keys. Placeholder edits are made through
//! [`Transaction`], an atomic scope that rolls back unless committed.

pub mod document;
pub mod element;
pub mod error;
pub mod keys;
pub mod session;
pub mod transaction;
pub mod units;

pub use document::Document;
pub use element::{
    Barrier, Category, Discipline, FamilySymbol, Level, LinearRun, LinkInstance,
    PlaceholderInstance, View3D,
};
pub use error::{Error, Result, Severity};
pub use keys::{
    BarrierKey, DocumentKey, HitKey, LevelKey, LinkKey, PlaceholderKey, RunKey, SymbolKey, ViewKey,
};
pub use session::Session;
pub use transaction::{Transaction, TransactionStatus};
pub use units::{DocumentUnits, LengthUnit, UnitConverter};
