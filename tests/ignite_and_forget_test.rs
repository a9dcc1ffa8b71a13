use anyhow::{Context, Result};
use portal_link::{
    Axis, Cell, CellClassifier, CellKind, EngineConfig, Flavor, MemoryRegistry, PortalEngine,
    PortalRegistry, ProposalKind, Realm, RecordingNotifier, ReferencePoint, SparseWorld,
    VoxelWorld,
};

type Engine = PortalEngine<SparseWorld, MemoryRegistry, RecordingNotifier>;

const ORIGIN: Cell = Cell::new(0, 64, 0);

/// A 3 wide, 4 tall vanilla frame standing on the overworld floor.
fn engine_with_frame(axis: Axis, notifier: RecordingNotifier) -> Engine {
    let mut world = SparseWorld::flat(Realm::Overworld, 62);
    world.build_frame(Realm::Overworld, ORIGIN, axis, 3, 4, Flavor::Vanilla);
    PortalEngine::new(EngineConfig::default(), world, MemoryRegistry::new(), notifier)
}

fn lit(axis: Axis, notifier: RecordingNotifier) -> Result<Engine> {
    let mut engine = engine_with_frame(axis, notifier);
    engine
        .ignite(Realm::Overworld, ORIGIN.add(1, 2, 0))
        .context("frame should light")?;
    Ok(engine)
}

#[test]
fn test_ignite_fills_frame_and_saves_anchor() -> Result<()> {
    let mut engine = engine_with_frame(Axis::Z, RecordingNotifier::new());

    let reference = engine
        .ignite(Realm::Overworld, Cell::new(0, 66, 2))
        .context("frame should light")?;

    assert_eq!(
        reference,
        ReferencePoint::new(Realm::Overworld, ORIGIN, Flavor::Vanilla)
    );
    assert_eq!(engine.world().count(Realm::Overworld, CellKind::Portal(Axis::Z)), 12);
    assert_eq!(
        engine.registry().anchors(Realm::Overworld, Flavor::Vanilla),
        vec![ORIGIN]
    );
    assert!(engine.registry().anchors(Realm::Overworld, Flavor::Custom).is_empty());

    assert_eq!(
        engine.locate_reference_point(Realm::Overworld, Cell::new(0, 67, 1)),
        Some(reference)
    );
    Ok(())
}

#[test]
fn test_ignite_through_fire() -> Result<()> {
    let mut engine = engine_with_frame(Axis::X, RecordingNotifier::new());
    engine
        .world_mut()
        .apply(Realm::Overworld, Cell::new(2, 64, 0), CellKind::Fire);

    assert!(engine.ignite(Realm::Overworld, ORIGIN).is_some());
    assert_eq!(
        engine.world().classify(Realm::Overworld, Cell::new(2, 64, 0)),
        CellKind::Portal(Axis::X)
    );
    Ok(())
}

#[test]
fn test_ignite_outside_a_frame_does_nothing() {
    let mut engine = engine_with_frame(Axis::X, RecordingNotifier::new());

    assert!(engine.ignite(Realm::Overworld, Cell::new(20, 64, 20)).is_none());
    // seed must be empty
    assert!(engine.ignite(Realm::Overworld, Cell::new(0, 63, 0)).is_none());
    assert!(engine.registry().is_empty());

    let (_, _, notifier) = engine.into_parts();
    assert!(notifier.seen().is_empty());
}

#[test]
fn test_ignite_rejects_frames_out_of_bounds() {
    let mut world = SparseWorld::flat(Realm::Overworld, 62);
    world.build_frame(Realm::Overworld, ORIGIN, Axis::X, 1, 3, Flavor::Custom);
    let mut engine = PortalEngine::new(
        EngineConfig::default(),
        world,
        MemoryRegistry::new(),
        RecordingNotifier::new(),
    );

    assert!(engine.ignite(Realm::Overworld, ORIGIN).is_none());
}

#[test]
fn test_vetoed_ignition_leaves_frame_dark() {
    let mut engine = engine_with_frame(
        Axis::X,
        RecordingNotifier::vetoing(&[ProposalKind::IgnitePortal]),
    );

    assert!(engine.ignite(Realm::Overworld, ORIGIN).is_none());
    assert_eq!(engine.world().count(Realm::Overworld, CellKind::Portal(Axis::X)), 0);
    assert!(engine.registry().is_empty());
}

#[test]
fn test_breaking_frame_forgets_portal() -> Result<()> {
    let mut engine = lit(Axis::X, RecordingNotifier::new())?;

    // left wall, level with the interior
    let forgotten = engine.forget_portals(Realm::Overworld, &[Cell::new(-1, 65, 0)]);

    assert_eq!(
        forgotten,
        vec![ReferencePoint::new(Realm::Overworld, ORIGIN, Flavor::Vanilla)]
    );
    assert!(engine.registry().is_empty());
    Ok(())
}

#[test]
fn test_explosion_forgets_each_portal_once() -> Result<()> {
    let mut engine = lit(Axis::Z, RecordingNotifier::new())?;

    let blast = [
        Cell::new(0, 63, 1),
        Cell::new(0, 64, 1),
        Cell::new(0, 65, 1),
        Cell::new(0, 64, 2),
        Cell::new(5, 64, 5),
    ];
    let forgotten = engine.forget_portals(Realm::Overworld, &blast);

    assert_eq!(forgotten.len(), 1);
    assert_eq!(forgotten[0].cell, ORIGIN);

    let (_, registry, notifier) = engine.into_parts();
    assert!(registry.is_empty());
    assert_eq!(
        notifier.seen(),
        &[ProposalKind::IgnitePortal, ProposalKind::DestroyPortals]
    );
    Ok(())
}

#[test]
fn test_unrelated_blocks_forget_nothing() -> Result<()> {
    let mut engine = lit(Axis::X, RecordingNotifier::new())?;

    // a corner touches no portal cell, the ground below is not frame
    let forgotten = engine.forget_portals(
        Realm::Overworld,
        &[Cell::new(-1, 63, 0), Cell::new(0, 62, 0), Cell::new(0, 64, 1)],
    );

    assert!(forgotten.is_empty());
    assert_eq!(engine.registry().len(), 1);

    let (_, _, notifier) = engine.into_parts();
    assert_eq!(notifier.seen(), &[ProposalKind::IgnitePortal]);
    Ok(())
}

#[test]
fn test_vetoed_destruction_keeps_anchor() -> Result<()> {
    let mut engine = lit(
        Axis::X,
        RecordingNotifier::vetoing(&[ProposalKind::DestroyPortals]),
    )?;

    let forgotten = engine.forget_portals(Realm::Overworld, &[Cell::new(1, 64, 0)]);

    assert!(forgotten.is_empty());
    assert_eq!(
        engine.registry().anchors(Realm::Overworld, Flavor::Vanilla),
        vec![ORIGIN]
    );
    Ok(())
}
