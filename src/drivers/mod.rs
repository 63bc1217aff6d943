//! Hardware drivers: peripheral init, pump outputs, safety input.

pub mod hw;
pub mod pump;
pub mod safety_input;

pub use pump::PumpOutputs;
pub use safety_input::SafetyInput;
