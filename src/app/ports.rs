//! Port traits decoupling the control core from hardware.
//!
//! The service talks to the outside world only through these traits.
//! Production wires them to the ESP-IDF adapters; tests wire them to
//! in-memory mocks and drive the loop deterministically.

use crate::app::events::AppEvent;
use crate::control::blender::ActuatorCommand;
use crate::error::Result;
use crate::sensors::SensorSnapshot;

/// Produces one snapshot of all sensor channels per control tick.
pub trait SensorPort {
    fn sample(&mut self) -> SensorSnapshot;
}

/// Applies an actuation command to the pump outputs.
pub trait ActuatorPort {
    fn apply(&mut self, command: &ActuatorCommand) -> Result<()>;
}

/// Polled external safety input (e.g. an inertia or kill switch).
pub trait SafetyInputPort {
    /// True while the external safety demands the outputs be cut.
    fn engaged(&mut self) -> bool;
}

/// Receives the application event stream.
pub trait DiagnosticsSink {
    fn record(&mut self, event: &AppEvent);
}

/// Discards every event. Useful where no observer is wired up.
impl DiagnosticsSink for () {
    fn record(&mut self, _event: &AppEvent) {}
}
