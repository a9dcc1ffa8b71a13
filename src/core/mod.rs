pub mod adjust;
pub mod engine;
pub mod frame;
pub mod geometry;
pub mod placement;
pub mod resolver;

pub use crate::domain::model::{Cell, Destination, ReferencePoint};
pub use crate::domain::ports::{Notifier, PortalRegistry, VoxelWorld};
pub use crate::utils::error::Result;
