use anyhow::{Context, Result};
use portal_link::{
    AllowAll, Axis, Cell, EngineConfig, Flavor, MemoryRegistry, PortalEngine, Position, Realm,
    SparseWorld, Traveler,
};

fn engine(config: EngineConfig) -> PortalEngine<SparseWorld, MemoryRegistry, AllowAll> {
    let world = SparseWorld::new()
        .with_floor(Realm::Overworld, 62)
        .with_floor(Realm::Nether, 30)
        .with_ceiling(Realm::Nether, 127);
    PortalEngine::new(config, world, MemoryRegistry::new(), AllowAll)
}

/// Light a custom portal at `origin`, walk through it and back again.
/// Returns where the traveler started and where they ended up.
fn there_and_back(config: EngineConfig, origin: Cell, axis: Axis) -> Result<(Position, Position)> {
    let mut engine = engine(config);
    engine
        .world_mut()
        .build_frame(Realm::Overworld, origin, axis, 2, 3, Flavor::Custom);
    engine
        .ignite(Realm::Overworld, origin)
        .context("overworld frame should light")?;

    let start = match axis {
        Axis::X => Position::new(f64::from(origin.x) + 1.0, f64::from(origin.y), f64::from(origin.z) + 0.5),
        Axis::Z => Position::new(f64::from(origin.x) + 0.5, f64::from(origin.y), f64::from(origin.z) + 1.0),
    };
    let outbound = engine
        .travel(&Traveler::player(Realm::Overworld, start))
        .context("outbound trip")?;
    assert_eq!(outbound.location.realm, Realm::Nether);

    let mut returning = Traveler::player(Realm::Nether, outbound.location.position);
    returning.yaw = outbound.location.yaw;
    let inbound = engine.travel(&returning).context("return trip")?;

    assert_eq!(inbound.location.realm, Realm::Overworld);
    assert!(!inbound.created);
    assert_eq!(inbound.portal.cell, origin);
    Ok((start, inbound.location.position))
}

#[test]
fn test_round_trip_returns_to_the_starting_portal() -> Result<()> {
    for (origin, axis) in [
        (Cell::new(80, 64, 16), Axis::X),
        (Cell::new(-37, 64, 5), Axis::X),
        (Cell::new(0, 64, 0), Axis::X),
        (Cell::new(300, 64, -210), Axis::X),
        (Cell::new(-81, 64, -17), Axis::Z),
    ] {
        let (start, end) = there_and_back(EngineConfig::default(), origin, axis)?;
        assert!((start.x - end.x).abs() <= 1.0, "x drifted from {:?} to {:?}", start, end);
        assert!((start.z - end.z).abs() <= 1.0, "z drifted from {:?} to {:?}", start, end);
    }
    Ok(())
}

#[test]
fn test_round_trip_with_equal_ratios() -> Result<()> {
    let mut config = EngineConfig::default();
    config.custom.ratio.nether = 1.0;
    config.custom.min_distance.overworld = 16.0;

    let origin = Cell::new(40, 64, -40);
    let (start, end) = there_and_back(config, origin, Axis::Z)?;

    assert!((start.x - end.x).abs() <= 1.0);
    assert!((start.z - end.z).abs() <= 1.0);
    Ok(())
}

#[test]
fn test_round_trip_keeps_orientation() -> Result<()> {
    let origin = Cell::new(16, 64, 16);
    let mut engine = engine(EngineConfig::default());
    engine
        .world_mut()
        .build_frame(Realm::Overworld, origin, Axis::Z, 2, 3, Flavor::Custom);
    engine.ignite(Realm::Overworld, origin).context("ignite")?;

    let mut traveler = Traveler::player(Realm::Overworld, Position::new(16.5, 64.0, 17.0));
    traveler.yaw = -90.0;
    traveler.pitch = 12.5;

    let outbound = engine.travel(&traveler).context("outbound trip")?;

    // the new portal keeps the entry orientation when there is room for it
    assert_eq!(outbound.axis, Axis::Z);
    assert_eq!(outbound.location.yaw, -90.0);
    assert_eq!(outbound.location.pitch, 12.5);
    Ok(())
}
