pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::{AllowAll, MemoryRegistry, RecordingNotifier, SparseWorld};
pub use config::EngineConfig;
pub use core::engine::PortalEngine;
pub use domain::model::{
    Axis, Cell, CellKind, Destination, Flavor, Location, Position, Realm, ReferencePoint, Traveler,
    TravelerKind,
};
pub use domain::ports::{CellClassifier, Notifier, PortalRegistry, Proposal, ProposalKind, VoxelWorld};
pub use utils::error::{LinkError, Result};
