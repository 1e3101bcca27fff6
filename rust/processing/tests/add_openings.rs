// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests for the add openings command.

use std::sync::Arc;

use approx::assert_relative_eq;
use mep_openings_core::{
    Barrier, Category, Discipline, Document, DocumentKey, FamilySymbol, LengthUnit, Level,
    LinearRun, Session, View3D,
};
use mep_openings_geometry::{Curve, Isometry3, PlanarSolid, Point3, Vector3};
use mep_openings_processing::{
    plan_run, AddOpeningsCommand, CommandOutcome, CommandReport, DisciplineState, OpeningsConfig,
    PlacementResolver, RawHit, RayCaster, RecordingNotifier, TieBreak,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Wall running along Y, centered on `x`
fn wall_at(x: f64, thickness: f64) -> PlanarSolid {
    PlanarSolid::wall(
        Point3::new(x, -3000.0, 0.0),
        Point3::new(x, 3000.0, 0.0),
        thickness,
        3000.0,
    )
    .unwrap()
}

/// Horizontal run along X at the given Y, from x = 0 to `length`
fn along_x(y: f64, length: f64) -> Curve {
    Curve::line(Point3::new(0.0, y, 1500.0), Point3::new(length, y, 1500.0))
}

struct Model {
    session: Session,
    ar: DocumentKey,
    ov: DocumentKey,
}

impl Model {
    /// Architectural document in millimeters with one level, one 3D view
    /// and the opening family, plus an empty mechanical document.
    fn new() -> Self {
        let mut ar = Document::new("Tower_AR", LengthUnit::Millimeters);
        ar.add_level(Level::new("Level 1", 0.0));
        ar.add_view(View3D::template("Template"));
        ar.add_view(View3D::new("{3D}"));
        ar.add_symbol(FamilySymbol::new(
            "Opening",
            "Opening",
            Category::GenericModel,
            ["Width", "Height"],
        ));

        let mut session = Session::new();
        let ar = session.open(ar);
        let ov = session.open(Document::new("Tower_ОВ", LengthUnit::Millimeters));
        Self { session, ar, ov }
    }

    fn ar(&self) -> &Document {
        self.session.document(self.ar).unwrap()
    }

    fn ar_mut(&mut self) -> &mut Document {
        self.session.document_mut(self.ar).unwrap()
    }

    fn wall(&mut self, x: f64, thickness: f64) -> &mut Self {
        let doc = self.ar_mut();
        let level = doc.level_by_name("Level 1");
        doc.add_barrier(Barrier::wall("Wall", level, wall_at(x, thickness)));
        self
    }

    fn curtain_wall(&mut self, x: f64) -> &mut Self {
        let doc = self.ar_mut();
        let level = doc.level_by_name("Level 1");
        doc.add_barrier(Barrier::wall("Curtain", level, wall_at(x, 50.0)).without_hosting());
        self
    }

    fn run(&mut self, run: LinearRun) -> &mut Self {
        self.session.document_mut(self.ov).unwrap().add_run(run);
        self
    }

    fn execute(&mut self, config: OpeningsConfig) -> (CommandReport, RecordingNotifier) {
        init_tracing();
        let mut notifier = RecordingNotifier::default();
        let report = AddOpeningsCommand::new(config).run(&mut self.session, &mut notifier);
        (report, notifier)
    }

    fn symbol_active(&self) -> bool {
        let doc = self.ar();
        doc.find_symbol("Opening", Category::GenericModel)
            .and_then(|key| doc.symbol(key))
            .map(|s| s.is_active())
            .unwrap_or(false)
    }

    /// (x, y, z, width, height) of every placeholder, sorted
    fn openings(&self) -> Vec<[f64; 5]> {
        let mut out: Vec<[f64; 5]> = self
            .ar()
            .placeholders()
            .map(|(_, p)| {
                [
                    p.point.x,
                    p.point.y,
                    p.point.z,
                    p.parameter("Width").unwrap_or(f64::NAN),
                    p.parameter("Height").unwrap_or(f64::NAN),
                ]
            })
            .collect();
        out.sort_by(|a, b| a.partial_cmp(b).unwrap());
        out
    }
}

fn nearest() -> OpeningsConfig {
    OpeningsConfig {
        tie_break: TieBreak::Nearest,
        ..OpeningsConfig::default()
    }
}

#[test]
fn duct_through_one_wall_gets_one_opening() {
    let mut model = Model::new();
    model.wall(400.0, 4.0).run(LinearRun::duct(along_x(250.0, 1000.0), 200.0));

    let (report, notifier) = model.execute(OpeningsConfig::default());

    assert_eq!(report.outcome, CommandOutcome::Succeeded);
    assert!(notifier.messages.is_empty());
    assert!(model.symbol_active());

    let openings = model.openings();
    assert_eq!(openings.len(), 1);
    let [x, y, z, width, height] = openings[0];
    // First-seen hit is either face of the wall
    assert!((x - 398.0).abs() < 1e-6 || (x - 402.0).abs() < 1e-6, "x = {x}");
    assert_eq!((y, z), (250.0, 1500.0));
    assert_eq!(width, 230.0);
    assert_eq!(height, 230.0);

    let ducts = report.discipline(Discipline::Duct).unwrap();
    assert_eq!(ducts.state, DisciplineState::Committed);
    assert_eq!(ducts.placeholders_created, 1);
}

#[test]
fn nearest_tie_break_picks_the_entry_face() {
    let mut model = Model::new();
    model.wall(400.0, 4.0).run(LinearRun::duct(along_x(250.0, 1000.0), 200.0));

    model.execute(nearest());

    let openings = model.openings();
    assert_eq!(openings.len(), 1);
    assert_relative_eq!(openings[0][0], 398.0, epsilon = 1e-6);

    let placeholder = model.ar().placeholders().next().unwrap().1;
    let level = model.ar().level(placeholder.level).unwrap();
    assert_eq!(level.name, "Level 1");
    assert!(placeholder.host.is_local());
}

#[test]
fn opening_sits_at_hit_proximity_along_the_run() {
    struct AtFourHundred(mep_openings_core::BarrierKey);

    impl RayCaster for AtFourHundred {
        fn cast(&self, _ray: &mep_openings_geometry::Ray) -> Vec<RawHit> {
            vec![RawHit::local(400.0, self.0)]
        }
    }

    let mut model = Model::new();
    model.wall(400.0, 4.0);
    let doc = model.ar();
    let (wall, _) = doc.barriers().next().unwrap();

    // Diagonal run so the point is not trivially on an axis
    let start = Point3::new(100.0, 100.0, 1500.0);
    let end = start + Vector3::new(600.0, 800.0, 0.0);
    let run = LinearRun::duct(Curve::line(start, end), 200.0);

    let resolver = PlacementResolver::new(doc, 30.0);
    let plan = plan_run(Default::default(), &run, &AtFourHundred(wall), &resolver, TieBreak::FirstSeen).unwrap();

    assert_eq!(plan.placements.len(), 1);
    let placement = plan.placements[0];
    assert_relative_eq!(placement.point.x, 340.0, epsilon = 1e-9);
    assert_relative_eq!(placement.point.y, 420.0, epsilon = 1e-9);
    assert_relative_eq!(placement.point.z, 1500.0, epsilon = 1e-9);
    assert_eq!(placement.width, 230.0);
    assert_eq!(placement.height, 230.0);
    assert_eq!(plan.hits_skipped, 0);
}

#[test]
fn ducts_and_pipes_through_several_walls() {
    let mut model = Model::new();
    model
        .wall(300.0, 100.0)
        .wall(700.0, 100.0)
        .run(LinearRun::duct(along_x(150.0, 1000.0), 400.0))
        .run(LinearRun::duct(along_x(1000.0, 500.0), 250.0))
        .run(LinearRun::pipe(along_x(-1000.0, 1000.0), 50.0));

    let (report, _) = model.execute(nearest());

    assert_eq!(report.outcome, CommandOutcome::Succeeded);
    let ducts = report.discipline(Discipline::Duct).unwrap();
    let pipes = report.discipline(Discipline::Pipe).unwrap();
    assert_eq!(ducts.runs_scanned, 2);
    assert_eq!(ducts.placeholders_created, 3);
    assert_eq!(pipes.runs_scanned, 1);
    assert_eq!(pipes.placeholders_created, 2);

    let sizes: Vec<f64> = model.openings().iter().map(|o| o[3]).collect();
    assert_eq!(sizes.iter().filter(|s| **s == 430.0).count(), 2);
    assert_eq!(sizes.iter().filter(|s| **s == 280.0).count(), 1);
    assert_eq!(sizes.iter().filter(|s| **s == 80.0).count(), 2);
}

#[test]
fn run_ending_inside_a_wall_still_counts_the_face_it_reached() {
    let mut model = Model::new();
    model
        .wall(400.0, 200.0)
        // Reaches the x = 300 face, stops before x = 500
        .run(LinearRun::pipe(along_x(150.0, 350.0), 50.0))
        // Stops short of the wall
        .run(LinearRun::pipe(along_x(500.0, 250.0), 50.0));

    let (report, _) = model.execute(OpeningsConfig::default());

    let pipes = report.discipline(Discipline::Pipe).unwrap();
    assert_eq!(pipes.placeholders_created, 1);
    assert_relative_eq!(model.openings()[0][0], 300.0, epsilon = 1e-6);
}

#[test]
fn results_are_deterministic() {
    let build = || {
        let mut model = Model::new();
        model
            .wall(300.0, 120.0)
            .wall(650.0, 200.0)
            .run(LinearRun::duct(along_x(150.0, 1000.0), 315.0))
            .run(LinearRun::pipe(along_x(400.0, 1000.0), 32.0));
        model
    };

    let mut first = build();
    let mut second = build();
    let (a, _) = first.execute(OpeningsConfig::default());
    let (b, _) = second.execute(OpeningsConfig::default());

    assert_eq!(a, b);
    assert_eq!(first.openings(), second.openings());
}

#[test]
fn model_without_walls_succeeds_with_nothing_placed() {
    let mut model = Model::new();
    model
        .run(LinearRun::duct(along_x(150.0, 1000.0), 200.0))
        .run(LinearRun::pipe(along_x(100.0, 1000.0), 25.0));

    let (report, notifier) = model.execute(OpeningsConfig::default());

    assert_eq!(report.outcome, CommandOutcome::Succeeded);
    assert_eq!(report.placeholders_created(), 0);
    assert!(notifier.messages.is_empty());
    assert!(report.disciplines.iter().all(|d| d.state == DisciplineState::Committed));
}

#[test]
fn missing_mechanical_document_cancels() {
    let mut model = Model::new();
    model.wall(400.0, 200.0).run(LinearRun::duct(along_x(150.0, 1000.0), 200.0));
    model.session.close(model.ov);

    let (report, notifier) = model.execute(OpeningsConfig::default());

    assert_eq!(report.outcome, CommandOutcome::Cancelled);
    assert!(report.disciplines.is_empty());
    assert_eq!(notifier.messages.len(), 1);
    assert_eq!(notifier.messages[0].0, "Error");
    assert_eq!(model.ar().placeholder_count(), 0);
    assert!(!model.symbol_active());
}

#[test]
fn missing_template_cancels() {
    let mut model = Model::new();
    model.wall(400.0, 200.0).run(LinearRun::duct(along_x(150.0, 1000.0), 200.0));

    let config = OpeningsConfig {
        family_name: "Sleeve".into(),
        ..OpeningsConfig::default()
    };
    let (report, notifier) = model.execute(config);

    assert_eq!(report.outcome, CommandOutcome::Cancelled);
    assert_eq!(notifier.messages.len(), 1);
    assert!(notifier.messages[0].1.contains("Sleeve"));
    assert_eq!(model.ar().placeholder_count(), 0);
}

#[test]
fn template_only_views_cancel() {
    let mut ar = Document::new("Tower_AR", LengthUnit::Millimeters);
    ar.add_level(Level::new("Level 1", 0.0));
    ar.add_view(View3D::template("Template"));
    ar.add_symbol(FamilySymbol::new(
        "Opening",
        "Opening",
        Category::GenericModel,
        ["Width", "Height"],
    ));
    let mut session = Session::new();
    session.open(ar);
    session.open(Document::new("Tower_ОВ", LengthUnit::Millimeters));

    let mut notifier = RecordingNotifier::default();
    let report = AddOpeningsCommand::default().run(&mut session, &mut notifier);

    assert_eq!(report.outcome, CommandOutcome::Cancelled);
    assert_eq!(notifier.messages.len(), 1);
}

#[test]
fn failed_creation_rolls_back_only_its_discipline() {
    let mut model = Model::new();
    model
        .wall(300.0, 100.0)
        .curtain_wall(700.0)
        .run(LinearRun::duct(along_x(150.0, 1000.0), 200.0))
        .run(LinearRun::pipe(along_x(-1000.0, 500.0), 50.0));

    let (report, notifier) = model.execute(OpeningsConfig::default());

    assert_eq!(report.outcome, CommandOutcome::Cancelled);
    // Scope failures are not shown to the user
    assert!(notifier.messages.is_empty());

    let ducts = report.discipline(Discipline::Duct).unwrap();
    assert_eq!(ducts.state, DisciplineState::RolledBack);
    assert_eq!(ducts.placements_planned, 2);
    assert_eq!(ducts.placeholders_created, 0);
    assert!(ducts.error.is_some());

    let pipes = report.discipline(Discipline::Pipe).unwrap();
    assert_eq!(pipes.state, DisciplineState::Committed);
    assert_eq!(pipes.placeholders_created, 1);

    // Only the pipe's opening survives
    let openings = model.openings();
    assert_eq!(openings.len(), 1);
    assert_eq!(openings[0][3], 80.0);
}

#[test]
fn activation_happens_once_across_runs() {
    let mut model = Model::new();
    model.wall(400.0, 200.0).run(LinearRun::pipe(along_x(150.0, 1000.0), 50.0));

    let (first, _) = model.execute(OpeningsConfig::default());
    assert!(model.symbol_active());
    let (second, _) = model.execute(OpeningsConfig::default());

    assert_eq!(first.outcome, CommandOutcome::Succeeded);
    assert_eq!(second.outcome, CommandOutcome::Succeeded);
    assert!(model.symbol_active());
    // Existing openings are not detected; each run places its own
    assert_eq!(model.ar().placeholder_count(), 2);
}

#[test]
fn arcs_and_degenerate_runs_are_skipped() {
    let mut model = Model::new();
    model
        .wall(400.0, 200.0)
        .run(LinearRun::duct(
            Curve::Arc {
                center: Point3::new(400.0, 0.0, 1500.0),
                radius: 500.0,
                normal: Vector3::z(),
                start_angle: 0.0,
                end_angle: std::f64::consts::PI,
            },
            200.0,
        ))
        .run(LinearRun::duct(along_x(0.0, 0.0), 200.0))
        .run(LinearRun::duct(along_x(150.0, 1000.0), 200.0));

    let (report, _) = model.execute(OpeningsConfig::default());

    assert_eq!(report.outcome, CommandOutcome::Succeeded);
    let ducts = report.discipline(Discipline::Duct).unwrap();
    assert_eq!(ducts.runs_scanned, 3);
    assert_eq!(ducts.runs_skipped, 2);
    assert_eq!(ducts.placeholders_created, 1);
}

#[test]
fn linked_walls_are_opened_when_links_are_included() {
    let build = || {
        let mut linked = Document::new("Tower_AR_core", LengthUnit::Millimeters);
        let level = linked.add_level(Level::new("Level 1", 0.0));
        linked.add_barrier(Barrier::wall("Core wall", Some(level), wall_at(100.0, 200.0)));

        let mut model = Model::new();
        model.ar_mut().add_link(
            "Core",
            Isometry3::translation(300.0, 0.0, 0.0),
            Arc::new(linked),
        );
        model.run(LinearRun::duct(along_x(250.0, 1000.0), 200.0));
        model
    };

    let mut without = build();
    let (report, _) = without.execute(nearest());
    assert_eq!(report.outcome, CommandOutcome::Succeeded);
    assert_eq!(without.ar().placeholder_count(), 0);

    let mut with = build();
    let config = OpeningsConfig {
        include_links: true,
        ..nearest()
    };
    let (report, _) = with.execute(config);
    assert_eq!(report.outcome, CommandOutcome::Succeeded);

    let openings = with.openings();
    assert_eq!(openings.len(), 1);
    assert_relative_eq!(openings[0][0], 300.0, epsilon = 1e-6);

    let placeholder = with.ar().placeholders().next().unwrap().1;
    assert!(!placeholder.host.is_local());
    assert_eq!(with.ar().level(placeholder.level).unwrap().name, "Level 1");
}

#[test]
fn parallel_scan_matches_sequential() {
    let build = || {
        let mut model = Model::new();
        model.wall(250.0, 100.0).wall(600.0, 150.0).wall(900.0, 200.0);
        for i in 0..40 {
            let y = -1975.0 + i as f64 * 100.0;
            model.run(LinearRun::duct(along_x(y, 1000.0), 100.0 + i as f64));
            model.run(LinearRun::pipe(along_x(y + 50.0, 700.0), 20.0 + i as f64));
        }
        model
    };

    let mut sequential = build();
    let mut parallel = build();
    let (a, _) = sequential.execute(OpeningsConfig::default());
    let (b, _) = parallel.execute(OpeningsConfig {
        parallel_scan: true,
        ..OpeningsConfig::default()
    });

    assert_eq!(a, b);
    assert_eq!(sequential.openings(), parallel.openings());
    assert_eq!(a.placeholders_created(), 40 * 3 + 40 * 2);
}

#[test]
fn clearance_follows_document_units() {
    let mut ar = Document::new("Tower_AR", LengthUnit::Feet);
    let level = ar.add_level(Level::new("Level 1", 0.0));
    ar.add_view(View3D::new("{3D}"));
    ar.add_symbol(FamilySymbol::new(
        "Opening",
        "Opening",
        Category::GenericModel,
        ["Width", "Height"],
    ));
    ar.add_barrier(Barrier::wall(
        "Wall",
        Some(level),
        PlanarSolid::wall(Point3::new(10.0, -10.0, 0.0), Point3::new(10.0, 10.0, 0.0), 0.5, 10.0).unwrap(),
    ));
    let mut ov = Document::new("Tower_ОВ", LengthUnit::Feet);
    ov.add_run(LinearRun::pipe(
        Curve::line(Point3::new(0.0, 1.0, 4.0), Point3::new(20.0, 1.0, 4.0)),
        0.5,
    ));

    let mut session = Session::new();
    let ar = session.open(ar);
    session.open(ov);

    let mut notifier = RecordingNotifier::default();
    let report = AddOpeningsCommand::default().run(&mut session, &mut notifier);
    assert_eq!(report.outcome, CommandOutcome::Succeeded);

    let doc = session.document(ar).unwrap();
    let placeholder = doc.placeholders().next().unwrap().1;
    assert_relative_eq!(placeholder.parameter("Width").unwrap(), 0.5 + 30.0 / 304.8, epsilon = 1e-12);
}

#[test]
fn mixed_document_units_are_reconciled() {
    init_tracing();
    // Architectural model in feet: 0.5 ft wall centered on x = 10 ft
    let mut ar = Document::new("Tower_AR", LengthUnit::Feet);
    let level = ar.add_level(Level::new("Level 1", 0.0));
    ar.add_view(View3D::new("{3D}"));
    ar.add_symbol(FamilySymbol::new(
        "Opening",
        "Opening",
        Category::GenericModel,
        ["Width", "Height"],
    ));
    ar.add_barrier(Barrier::wall(
        "Wall",
        Some(level),
        PlanarSolid::wall(Point3::new(10.0, -10.0, 0.0), Point3::new(10.0, 10.0, 0.0), 0.5, 10.0).unwrap(),
    ));
    // Mechanical model in millimetres: 20 ft pipe at y = 1 ft, z = 4 ft, 6 in diameter
    let mut ov = Document::new("Tower_ОВ", LengthUnit::Millimeters);
    ov.add_run(LinearRun::pipe(
        Curve::line(Point3::new(0.0, 304.8, 1219.2), Point3::new(6096.0, 304.8, 1219.2)),
        152.4,
    ));

    let mut session = Session::new();
    let ar = session.open(ar);
    session.open(ov);

    let mut notifier = RecordingNotifier::default();
    let report = AddOpeningsCommand::new(nearest()).run(&mut session, &mut notifier);
    assert_eq!(report.outcome, CommandOutcome::Succeeded);
    assert_eq!(report.placeholders_created(), 1);

    let doc = session.document(ar).unwrap();
    let placeholder = doc.placeholders().next().unwrap().1;
    assert_relative_eq!(placeholder.point.x, 9.75, epsilon = 1e-9);
    assert_relative_eq!(placeholder.point.y, 1.0, epsilon = 1e-9);
    assert_relative_eq!(placeholder.point.z, 4.0, epsilon = 1e-9);
    let size = 0.5 + 30.0 / 304.8;
    assert_relative_eq!(placeholder.parameter("Width").unwrap(), size, epsilon = 1e-9);
    assert_relative_eq!(placeholder.parameter("Height").unwrap(), size, epsilon = 1e-9);
}

#[test]
fn re_extracted_centerline_reproduces_hits() {
    use mep_openings_processing::{deduplicate, ElementClassFilter, ReferenceIntersector};

    let mut model = Model::new();
    model.wall(300.0, 120.0).wall(700.0, 80.0);
    let doc = model.ar();
    let caster = ReferenceIntersector::for_document(doc, ElementClassFilter::walls()).unwrap();

    let curve = Curve::line(Point3::new(-50.0, 420.0, 900.0), Point3::new(950.0, 520.0, 900.0));
    let centerline = curve.centerline().unwrap();
    let first = deduplicate(caster.cast(&centerline.ray()), centerline.length, TieBreak::FirstSeen);

    let again = Curve::line(centerline.origin, centerline.end()).centerline().unwrap();
    let second = deduplicate(caster.cast(&again.ray()), again.length, TieBreak::FirstSeen);

    assert_eq!(first.len(), 2);
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.key, b.key);
        assert_relative_eq!(a.proximity, b.proximity, epsilon = 1e-9);
    }
}
