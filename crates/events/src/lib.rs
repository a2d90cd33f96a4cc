//! Workflow event distribution.
//!
//! Audit-style notifications emitted by the engine (request created,
//! decision recorded, order generated, ...). The bus is distribution only:
//! the request store remains the source of truth, and subscribers must be
//! idempotent.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
