use anyhow::{anyhow, Context, Result};
use clap::Parser;
use portal_link::config::cli::{Cli, Command, LogFormat, SimulateArgs};
use portal_link::utils::{logger, validation::Validate};
use portal_link::{
    AllowAll, Axis, Cell, EngineConfig, Flavor, LinkError, MemoryRegistry, PortalEngine, Position,
    Realm, SparseWorld, Traveler, TravelerKind,
};

fn main() {
    let cli = Cli::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    if let Err(e) = run(cli.command) {
        tracing::error!("❌ {:#}", e);
        eprintln!("❌ {:#}", e);
        if let Some(link_error) = e.downcast_ref::<LinkError>() {
            eprintln!("💡 Suggestion: {}", link_error.recovery_suggestion());
        }
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Config { config, dump } => {
            let config = load_config(Some(&config))?;
            tracing::info!("✅ Configuration loaded and validated successfully");
            if dump {
                print!("{}", config.to_toml_string()?);
            }
            Ok(())
        }
        Command::Simulate(args) => simulate(args),
    }
}

fn load_config(path: Option<&std::path::PathBuf>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            EngineConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path.display()))?
        }
        None => EngineConfig::default(),
    };

    config.validate()?;
    Ok(config)
}

/// Ground levels of the synthetic world. The origin realm's floor sits just
/// under the frame.
fn build_world(config: &EngineConfig, args: &SimulateArgs) -> SparseWorld {
    let mut world = SparseWorld::new()
        .with_floor(Realm::Overworld, 62)
        .with_floor(Realm::Nether, 30)
        .with_floor(args.realm, args.y - 2);

    for realm in Realm::ALL {
        if let Some(ceiling) = config.realm(realm).ceiling {
            world = world.with_ceiling(realm, ceiling);
        }
    }

    world
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let registry = match &args.registry {
        Some(path) => MemoryRegistry::from_file(path)
            .with_context(|| format!("failed to load registry '{}'", path.display()))?,
        None => MemoryRegistry::new(),
    };

    let flavor = if args.vanilla {
        Flavor::Vanilla
    } else {
        Flavor::Custom
    };
    let origin = Cell::new(args.x, args.y, args.z);

    let mut world = build_world(&config, &args);
    world.build_frame(args.realm, origin, args.axis, args.width, args.height, flavor);

    let mut engine = PortalEngine::new(config, world, registry, AllowAll);
    engine.probe_ceilings();

    let entry = engine
        .ignite(args.realm, origin)
        .ok_or_else(|| anyhow!("frame at {} in {} could not be lit", origin, args.realm))?;

    // stand in the middle of the bottom row
    let middle = origin.center();
    let half_width = f64::from(args.width) / 2.0;
    let feet = f64::from(origin.y);
    let position = match args.axis {
        Axis::X => Position::new(f64::from(origin.x) + half_width, feet, middle.z),
        Axis::Z => Position::new(middle.x, feet, f64::from(origin.z) + half_width),
    };
    let mut traveler = Traveler::player(args.realm, position);
    if args.entity {
        traveler.kind = TravelerKind::Entity;
    }

    let destination = engine.travel(&traveler);
    match &destination {
        Some(found) if found.created => {
            tracing::info!("✅ New portal created at {}", found.portal.cell)
        }
        Some(found) => tracing::info!("✅ Linked to existing portal at {}", found.portal.cell),
        None => tracing::warn!("No destination for this traveler"),
    }

    let report = serde_json::json!({
        "entry": entry,
        "traveler": traveler,
        "destination": destination,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!();
    print!("{}", engine.registry().to_toml_string()?);

    Ok(())
}
