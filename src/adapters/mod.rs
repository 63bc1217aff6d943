//! Adapters binding the application ports to real infrastructure.

pub mod hardware;
pub mod log_sink;
pub mod time;

pub use hardware::{GpioSafety, HubSensors, PumpActuator};
pub use log_sink::LogEventSink;
pub use time::MonotonicTime;
