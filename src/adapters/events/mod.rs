//! Event publishing adapters.
//!
//! - `InMemoryEventBus` - Captures events for test assertions
//! - `TracingEventPublisher` - Logs events through `tracing`

mod in_memory;
mod tracing_publisher;

pub use in_memory::InMemoryEventBus;
pub use tracing_publisher::TracingEventPublisher;
