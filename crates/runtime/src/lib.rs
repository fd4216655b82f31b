pub mod event_bus;
pub mod metrics;
pub mod timer_queue;

pub use event_bus::*;
pub use metrics::*;
pub use timer_queue::*;
