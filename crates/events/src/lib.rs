//! Realtime change events and the pub/sub bus that carries them.

pub mod bus;
pub mod envelope;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::{ChangeEnvelope, ChangeKind};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
