//! Hardware-backed implementations of the application ports.
//!
//! Thin wrappers: each adapter owns the matching driver and translates
//! between port vocabulary and driver vocabulary. On the host these
//! run against the simulated registers in `drivers::hw`.

use crate::app::ports::{ActuatorPort, SafetyInputPort, SensorPort};
use crate::config::SystemConfig;
use crate::control::ActuatorCommand;
use crate::drivers::{PumpOutputs, SafetyInput};
use crate::error::Result;
use crate::sensors::{SensorHub, SensorSnapshot};

pub struct HubSensors {
    hub: SensorHub,
}

impl HubSensors {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            hub: SensorHub::new(config),
        }
    }
}

impl SensorPort for HubSensors {
    fn sample(&mut self) -> SensorSnapshot {
        self.hub.read_all()
    }
}

pub struct PumpActuator {
    outputs: PumpOutputs,
}

impl PumpActuator {
    pub fn new() -> Self {
        Self {
            outputs: PumpOutputs::new(),
        }
    }
}

impl Default for PumpActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for PumpActuator {
    fn apply(&mut self, command: &ActuatorCommand) -> Result<()> {
        self.outputs.set_fraction(command.output_fraction);
        Ok(())
    }
}

pub struct GpioSafety {
    input: SafetyInput,
}

impl GpioSafety {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            input: SafetyInput::new(config),
        }
    }
}

impl SafetyInputPort for GpioSafety {
    fn engaged(&mut self) -> bool {
        self.input.engaged()
    }
}
