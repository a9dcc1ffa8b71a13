use anyhow::{Context, Result};
use portal_link::config::toml_config::ArrivalHeight;
use portal_link::utils::validation::Validate;
use portal_link::{
    AllowAll, Axis, Cell, CellKind, EngineConfig, Flavor, LinkError, MemoryRegistry,
    PortalEngine, PortalRegistry, Position, Realm, SparseWorld, Traveler,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_engine_builds_portals_at_configured_size() -> Result<()> {
    let config_file = write_temp(
        r#"
allow_floating_placement = false

[portal_size.width]
min = 2
max = 21
new = 4

[portal_size.height]
min = 3
max = 21
new = 5

[realms.nether]
min_height = 0
max_height = 256
ceiling = 127
arrival = { fixed = 50 }
"#,
    )?;

    let config = EngineConfig::from_file(config_file.path())?;
    config.validate()?;
    assert_eq!(config.realms.nether.arrival, ArrivalHeight::Fixed(50));

    let mut world = SparseWorld::new()
        .with_floor(Realm::Overworld, 62)
        .with_floor(Realm::Nether, 48);
    world.build_frame(Realm::Overworld, Cell::new(0, 64, 0), Axis::X, 2, 3, Flavor::Custom);

    let mut engine = PortalEngine::new(config, world, MemoryRegistry::new(), AllowAll);
    engine
        .ignite(Realm::Overworld, Cell::new(0, 64, 0))
        .context("ignite")?;

    let traveler = Traveler::player(Realm::Overworld, Position::new(1.0, 64.0, 0.5));
    let destination = engine.travel(&traveler).context("travel")?;

    // the fixed arrival height already stands on the floor
    assert_eq!(destination.portal.cell, Cell::new(0, 50, 0));
    assert_eq!(
        engine.world().count(Realm::Nether, CellKind::Portal(Axis::X)),
        4 * 5
    );
    // half way along a 4 wide exit
    assert_eq!(destination.location.position.x, 2.0);
    Ok(())
}

#[test]
fn test_invalid_config_file_is_rejected() -> Result<()> {
    let config_file = write_temp(
        r#"
[portal_size.width]
min = 5
max = 3
new = 4
"#,
    )?;

    let config = EngineConfig::from_file(config_file.path())?;
    let err = config.validate().unwrap_err();
    assert!(matches!(err, LinkError::InvalidConfigValueError { .. }));
    assert!(!err.recovery_suggestion().is_empty());
    Ok(())
}

#[test]
fn test_missing_config_file_is_an_io_error() {
    let result = EngineConfig::from_file("/definitely/not/here/portal-link.toml");
    assert!(matches!(result, Err(LinkError::IoError(_))));
}

#[test]
fn test_registry_file_feeds_the_engine() -> Result<()> {
    let registry_file = write_temp(
        r#"
[custom]
nether = ["garbage", "10,40,2"]
"#,
    )?;
    let registry = MemoryRegistry::from_file(registry_file.path())?;
    assert_eq!(registry.len(), 1);

    let mut world = SparseWorld::new().with_floor(Realm::Overworld, 62);
    world.build_frame(Realm::Overworld, Cell::new(80, 64, 16), Axis::X, 2, 3, Flavor::Custom);
    world.build_frame(Realm::Nether, Cell::new(10, 40, 2), Axis::X, 2, 3, Flavor::Custom);
    world.fill_interior(Realm::Nether, Cell::new(10, 40, 2), Axis::X, 2, 3);

    let mut engine = PortalEngine::new(EngineConfig::default(), world, registry, AllowAll);
    engine
        .ignite(Realm::Overworld, Cell::new(80, 64, 16))
        .context("ignite")?;

    let traveler = Traveler::player(Realm::Overworld, Position::new(81.0, 64.0, 16.5));
    let destination = engine.travel(&traveler).context("travel")?;
    assert_eq!(destination.portal.cell, Cell::new(10, 40, 2));

    let out = NamedTempFile::new()?;
    engine.registry().save_to_file(out.path())?;
    let reloaded = MemoryRegistry::from_file(out.path())?;
    assert_eq!(
        reloaded.anchors(Realm::Overworld, Flavor::Custom),
        vec![Cell::new(80, 64, 16)]
    );
    assert_eq!(
        reloaded.anchors(Realm::Nether, Flavor::Custom),
        vec![Cell::new(10, 40, 2)]
    );
    Ok(())
}
