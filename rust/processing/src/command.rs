// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The "add openings" command: preflight, then one batch per discipline.

use mep_openings_core::{Discipline, Error, LengthUnit, Result, Session, UnitConverter, ViewKey};
use serde::Serialize;

use crate::config::OpeningsConfig;
use crate::host::{DocumentLocator, DocumentPair, FamilyLookup, TemplateLookup, TitleLocator, UserNotifier};
use crate::orchestrator::{BatchOrchestrator, DisciplineReport};
use crate::template::PlaceholderTemplate;

/// Status returned to the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommandOutcome {
    Succeeded,
    Cancelled,
}

/// Outcome plus one report per discipline that was attempted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandReport {
    pub outcome: CommandOutcome,
    pub disciplines: Vec<DisciplineReport>,
}

impl CommandReport {
    pub fn cancelled() -> Self {
        Self {
            outcome: CommandOutcome::Cancelled,
            disciplines: Vec::new(),
        }
    }

    pub fn discipline(&self, discipline: Discipline) -> Option<&DisciplineReport> {
        self.disciplines.iter().find(|r| r.discipline == discipline)
    }

    pub fn placeholders_created(&self) -> usize {
        self.disciplines.iter().map(|r| r.placeholders_created).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Everything resolved before any edit scope opens.
#[derive(Debug, Clone)]
struct Preflight {
    documents: DocumentPair,
    template: PlaceholderTemplate,
    view: ViewKey,
    /// Unit of the architectural document; runs and clearance are expressed in it
    unit: LengthUnit,
    clearance: f64,
}

/// Places opening placeholders wherever ducts and pipes cross walls.
#[derive(Debug, Clone, Default)]
pub struct AddOpeningsCommand {
    pub config: OpeningsConfig,
}

impl AddOpeningsCommand {
    pub fn new(config: OpeningsConfig) -> Self {
        Self { config }
    }

    /// Locator matching the configured title marker
    pub fn locator(&self) -> TitleLocator {
        TitleLocator::new(self.config.mechanical_title_marker.clone())
    }

    /// Lookup for the configured family and category
    pub fn template_lookup(&self) -> FamilyLookup {
        FamilyLookup::new(self.config.family_name.clone(), self.config.category)
    }

    /// Run with the default locator and template lookup.
    pub fn run(&self, session: &mut Session, notifier: &mut dyn UserNotifier) -> CommandReport {
        self.execute(session, &self.locator(), &self.template_lookup(), notifier)
    }

    /// Run the command.
    ///
    /// A fatal preflight error is shown through `notifier` and cancels the
    /// command before anything is edited. Otherwise ducts then pipes are
    /// processed, each in its own transaction; the outcome is
    /// [`CommandOutcome::Succeeded`] only when both committed.
    pub fn execute(
        &self,
        session: &mut Session,
        locator: &dyn DocumentLocator,
        templates: &dyn TemplateLookup,
        notifier: &mut dyn UserNotifier,
    ) -> CommandReport {
        let preflight = match self.preflight(session, locator, templates) {
            Ok(preflight) => preflight,
            Err(err) => {
                tracing::warn!(error = %err, "Add openings cancelled");
                notifier.notify("Error", &err.to_string());
                return CommandReport::cancelled();
            }
        };

        let Preflight {
            documents,
            template,
            view,
            unit,
            clearance,
        } = preflight;
        tracing::info!(clearance, %unit, family = %template.family_name, "Adding openings");

        let orchestrator = BatchOrchestrator::new(&self.config, template, view, clearance);
        let mut disciplines = Vec::with_capacity(Discipline::ALL.len());

        for discipline in Discipline::ALL {
            let runs = match session.document(documents.mechanical) {
                Some(doc) => doc.snapshot_runs_in(discipline, unit),
                None => Vec::new(),
            };
            let report = match session.document_mut(documents.architectural) {
                Some(doc) => orchestrator.run_discipline(doc, discipline, &runs),
                None => {
                    let mut report = DisciplineReport::new(discipline);
                    report.error = Some(Error::DocumentNotFound(format!("{:?}", documents.architectural)).to_string());
                    report
                }
            };
            disciplines.push(report);
        }

        let outcome = if disciplines.iter().all(DisciplineReport::committed) {
            CommandOutcome::Succeeded
        } else {
            CommandOutcome::Cancelled
        };

        let report = CommandReport { outcome, disciplines };
        tracing::info!(
            outcome = ?report.outcome,
            created = report.placeholders_created(),
            "Add openings finished"
        );
        report
    }

    fn preflight(
        &self,
        session: &Session,
        locator: &dyn DocumentLocator,
        templates: &dyn TemplateLookup,
    ) -> Result<Preflight> {
        let documents = locator.locate(session)?;
        let architectural = session
            .document(documents.architectural)
            .ok_or_else(|| Error::DocumentNotFound(format!("{:?}", documents.architectural)))?;
        session
            .document(documents.mechanical)
            .ok_or_else(|| Error::DocumentNotFound(format!("{:?}", documents.mechanical)))?;

        let template = templates.find(session, documents.architectural)?;
        let view = architectural.first_3d_view().ok_or(Error::NoSamplingContext)?;
        let clearance = architectural
            .units()
            .to_internal(self.config.clearance, self.config.clearance_unit);

        let unit = architectural.internal_unit();

        tracing::debug!(
            architectural = architectural.title(),
            %unit,
            "Preflight passed"
        );

        Ok(Preflight {
            documents,
            template,
            view,
            unit,
            clearance,
        })
    }
}
