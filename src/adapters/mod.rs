// In-memory implementations of the domain ports.

pub mod memory_registry;
pub mod notifiers;
pub mod sparse_world;

pub use memory_registry::MemoryRegistry;
pub use notifiers::{AllowAll, RecordingNotifier};
pub use sparse_world::SparseWorld;
