// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # MEP-Openings Processing
//!
//! Finds where duct and pipe centerlines cross walls and places one opening
//! placeholder per crossing, sized to the run's diameter plus a clearance.
//!
//! ## Pipeline
//!
//! ```text
//! LinearRun ─► Centerline ─► RayCaster ─► deduplicate ─► PlacementResolver
//!                                                              │
//!                    Transaction per discipline ◄── BatchOrchestrator
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mep_openings_processing::{AddOpeningsCommand, OpeningsConfig, TracingNotifier};
//!
//! let command = AddOpeningsCommand::new(OpeningsConfig::from_env());
//! let report = command.run(&mut session, &mut TracingNotifier);
//! println!("{}", report.to_json()?);
//! ```

pub mod caster;
pub mod command;
pub mod config;
pub mod dedup;
pub mod host;
pub mod orchestrator;
pub mod placement;
pub mod template;

pub use caster::{ElementClassFilter, RawHit, RayCaster, ReferenceIntersector};
pub use command::{AddOpeningsCommand, CommandOutcome, CommandReport};
pub use config::OpeningsConfig;
pub use dedup::{deduplicate, LogicalHit, TieBreak};
pub use host::{
    DocumentLocator, DocumentPair, FamilyLookup, RecordingNotifier, TemplateLookup, TitleLocator,
    TracingNotifier, UserNotifier,
};
pub use orchestrator::{
    apply_plan, plan_discipline, plan_run, BatchOrchestrator, DisciplinePlan, DisciplineReport,
    DisciplineState, RunPlan,
};
pub use placement::{Placement, PlacementResolver};
pub use template::PlaceholderTemplate;
