// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch Orchestration
//!
//! One discipline at a time:
//!
//! 1. **Plan** (read-only): extract each run's centerline, cast, deduplicate
//!    and resolve placements. Per-run and per-hit failures are skipped here.
//!    Optionally spread over the rayon pool; output keeps input order.
//! 2. **Apply**: activate the template, open one transaction, create every
//!    planned placeholder, commit. Any creation failure rolls the whole
//!    discipline back.

use mep_openings_core::{
    Discipline, Document, LinearRun, Result, RunKey, Transaction, ViewKey,
};
use mep_openings_geometry::Centerline;
use rayon::prelude::*;
use serde::Serialize;

use crate::caster::{ElementClassFilter, RayCaster, ReferenceIntersector};
use crate::config::OpeningsConfig;
use crate::dedup::{deduplicate, TieBreak};
use crate::placement::{Placement, PlacementResolver};
use crate::template::PlaceholderTemplate;

/// Progress of one discipline batch.
///
/// `NotStarted → TemplateActivated → ScopeOpen → Committed | RolledBack`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DisciplineState {
    NotStarted,
    TemplateActivated,
    ScopeOpen,
    Committed,
    RolledBack,
}

impl DisciplineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DisciplineState::Committed | DisciplineState::RolledBack)
    }
}

/// Outcome of one discipline batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisciplineReport {
    pub discipline: Discipline,
    pub state: DisciplineState,
    pub runs_scanned: usize,
    /// Runs without a usable straight centerline or diameter
    pub runs_skipped: usize,
    /// Hits whose barrier or level could not be resolved
    pub hits_skipped: usize,
    pub placements_planned: usize,
    /// Placeholders persisted; zero unless committed
    pub placeholders_created: usize,
    /// Why the batch stopped short of committing
    pub error: Option<String>,
}

impl DisciplineReport {
    pub fn new(discipline: Discipline) -> Self {
        Self {
            discipline,
            state: DisciplineState::NotStarted,
            runs_scanned: 0,
            runs_skipped: 0,
            hits_skipped: 0,
            placements_planned: 0,
            placeholders_created: 0,
            error: None,
        }
    }

    pub fn committed(&self) -> bool {
        self.state == DisciplineState::Committed
    }
}

/// Placements resolved for one discipline, not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DisciplinePlan {
    pub discipline: Discipline,
    pub placements: Vec<Placement>,
    pub runs_scanned: usize,
    pub runs_skipped: usize,
    pub hits_skipped: usize,
}

/// Placements for a single run plus the hits that had to be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub run: RunKey,
    pub placements: Vec<Placement>,
    pub hits_skipped: usize,
}

/// Straight centerline of a run, checked for a usable diameter
pub fn extract(run: &LinearRun) -> Result<Centerline> {
    if !run.diameter.is_finite() || run.diameter <= 0.0 {
        return Err(mep_openings_core::Error::UnsupportedGeometry(format!(
            "{} diameter {} is not positive",
            run.discipline, run.diameter
        )));
    }
    Ok(run.curve.centerline()?)
}

/// Extract → cast → deduplicate → resolve for one run.
///
/// Fails only when the run itself is unusable; unresolvable hits are
/// counted and skipped.
pub fn plan_run<C>(
    key: RunKey,
    run: &LinearRun,
    caster: &C,
    resolver: &PlacementResolver<'_>,
    tie_break: TieBreak,
) -> Result<RunPlan>
where
    C: RayCaster + ?Sized,
{
    let centerline = extract(run)?;
    let raw = caster.cast(&centerline.ray());
    let hits = deduplicate(raw, centerline.length, tie_break);

    let mut plan = RunPlan {
        run: key,
        placements: Vec::with_capacity(hits.len()),
        hits_skipped: 0,
    };

    for hit in &hits {
        match resolver.resolve(&centerline, run.diameter, hit) {
            Ok(placement) => plan.placements.push(placement),
            Err(err) => {
                tracing::debug!(run = ?key, hit = ?hit.key, error = %err, "Skipping hit");
                plan.hits_skipped += 1;
            }
        }
    }

    Ok(plan)
}

/// Plan every run of a discipline. Read-only.
pub fn plan_discipline<C>(
    discipline: Discipline,
    runs: &[(RunKey, LinearRun)],
    caster: &C,
    resolver: &PlacementResolver<'_>,
    tie_break: TieBreak,
    parallel: bool,
) -> DisciplinePlan
where
    C: RayCaster + Sync + ?Sized,
{
    let outcomes: Vec<Result<RunPlan>> = if parallel {
        runs.par_iter()
            .map(|(key, run)| plan_run(*key, run, caster, resolver, tie_break))
            .collect()
    } else {
        runs.iter()
            .map(|(key, run)| plan_run(*key, run, caster, resolver, tie_break))
            .collect()
    };

    let mut plan = DisciplinePlan {
        discipline,
        placements: Vec::new(),
        runs_scanned: runs.len(),
        runs_skipped: 0,
        hits_skipped: 0,
    };

    for ((key, _), outcome) in runs.iter().zip(outcomes) {
        match outcome {
            Ok(run_plan) => {
                plan.hits_skipped += run_plan.hits_skipped;
                plan.placements.extend(run_plan.placements);
            }
            Err(err) => {
                tracing::debug!(%discipline, run = ?key, error = %err, "Skipping run");
                plan.runs_skipped += 1;
            }
        }
    }

    plan
}

/// Apply a plan inside one transaction on the architectural document.
pub fn apply_plan(
    document: &mut Document,
    plan: &DisciplinePlan,
    template: &PlaceholderTemplate,
    config: &OpeningsConfig,
) -> DisciplineReport {
    let discipline = plan.discipline;
    let mut report = DisciplineReport {
        runs_scanned: plan.runs_scanned,
        runs_skipped: plan.runs_skipped,
        hits_skipped: plan.hits_skipped,
        placements_planned: plan.placements.len(),
        ..DisciplineReport::new(discipline)
    };

    match template.ensure_active(document) {
        Ok(activated) => {
            tracing::debug!(%discipline, activated, "Placeholder template ready");
            report.state = DisciplineState::TemplateActivated;
        }
        Err(err) => {
            tracing::warn!(%discipline, error = %err, "Could not activate placeholder template");
            report.error = Some(err.to_string());
            return report;
        }
    }

    let mut tx = Transaction::start(document, discipline.transaction_name());
    report.state = DisciplineState::ScopeOpen;

    for (index, placement) in plan.placements.iter().enumerate() {
        if let Err(err) = create_placeholder(&mut tx, placement, template, config) {
            tracing::warn!(
                %discipline,
                index,
                planned = plan.placements.len(),
                severity = ?err.severity(),
                error = %err,
                "Placeholder creation failed, rolling back"
            );
            tx.rollback();
            report.state = DisciplineState::RolledBack;
            report.error = Some(err.to_string());
            return report;
        }
    }

    report.placeholders_created = tx.created_count();
    tx.commit();
    report.state = DisciplineState::Committed;

    tracing::info!(
        %discipline,
        runs = report.runs_scanned,
        runs_skipped = report.runs_skipped,
        hits_skipped = report.hits_skipped,
        created = report.placeholders_created,
        "Committed openings"
    );

    report
}

fn create_placeholder(
    tx: &mut Transaction<'_>,
    placement: &Placement,
    template: &PlaceholderTemplate,
    config: &OpeningsConfig,
) -> Result<()> {
    let key = tx.create_placeholder(template.symbol, placement.point, placement.host, placement.level)?;
    tx.set_parameter(key, &config.width_parameter, placement.width)?;
    tx.set_parameter(key, &config.height_parameter, placement.height)?;
    Ok(())
}

/// Runs discipline batches against the architectural document with the
/// document-backed ray caster.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator<'c> {
    config: &'c OpeningsConfig,
    template: PlaceholderTemplate,
    view: ViewKey,
    clearance: f64,
}

impl<'c> BatchOrchestrator<'c> {
    /// `view` is the sampling context; `clearance` is in the architectural
    /// document's internal unit.
    pub fn new(config: &'c OpeningsConfig, template: PlaceholderTemplate, view: ViewKey, clearance: f64) -> Self {
        Self {
            config,
            template,
            view,
            clearance,
        }
    }

    /// Plan then apply one discipline's runs.
    pub fn run_discipline(
        &self,
        document: &mut Document,
        discipline: Discipline,
        runs: &[(RunKey, LinearRun)],
    ) -> DisciplineReport {
        tracing::debug!(%discipline, runs = runs.len(), "Scanning runs");

        let plan = {
            let caster = match ReferenceIntersector::new(document, ElementClassFilter::walls(), self.view) {
                Ok(caster) => caster.with_links(self.config.include_links),
                Err(err) => {
                    let mut report = DisciplineReport::new(discipline);
                    report.runs_scanned = runs.len();
                    report.error = Some(err.to_string());
                    return report;
                }
            };
            let resolver = PlacementResolver::new(document, self.clearance);
            plan_discipline(
                discipline,
                runs,
                &caster,
                &resolver,
                self.config.tie_break,
                self.config.parallel_scan,
            )
        };

        apply_plan(document, &plan, &self.template, self.config)
    }
}
