use crate::domain::model::{Axis, Realm};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "portal-link")]
#[command(about = "Links portals between the overworld and the nether")]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load and validate a configuration file
    Config {
        /// Path to TOML configuration file
        #[arg(short, long, default_value = "portal-link.toml")]
        config: PathBuf,

        /// Print the effective configuration, defaults included
        #[arg(long)]
        dump: bool,
    },

    /// Light a frame in a synthetic world and send a traveler through it
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Path to TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Anchors known before the simulation starts
    #[arg(long)]
    pub registry: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Realm::Overworld)]
    pub realm: Realm,

    /// Bottom-left interior cell of the frame
    #[arg(long, allow_negative_numbers = true)]
    pub x: i32,

    #[arg(long, allow_negative_numbers = true)]
    pub y: i32,

    #[arg(long, allow_negative_numbers = true)]
    pub z: i32,

    #[arg(long, value_enum, default_value_t = Axis::X)]
    pub axis: Axis,

    #[arg(long, default_value_t = 2)]
    pub width: i32,

    #[arg(long, default_value_t = 3)]
    pub height: i32,

    /// Build the frame from vanilla material
    #[arg(long)]
    pub vanilla: bool,

    /// Send a non-player entity, which may not create portals
    #[arg(long)]
    pub entity: bool,
}
