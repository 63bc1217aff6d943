//! The application service: one object that owns the whole control
//! core and runs it one tick at a time.
//!
//! Ports come in as generics so the same service runs against real
//! hardware adapters on the target and against mocks on the host. The
//! tick order is fixed: sample, classify, derive the target, blend,
//! actuate. Classification happens before blending so this tick's
//! limits apply to this tick's output.

use crate::app::events::AppEvent;
use crate::app::ports::{ActuatorPort, DiagnosticsSink, SafetyInputPort, SensorPort};
use crate::config::SystemConfig;
use crate::control::{ActuationBlender, ActuatorCommand, SetpointMapper};
use crate::diagnostics::StatusSnapshot;
use crate::error::Result;
use crate::protection::{CurrentProtection, Level, VoltageProtection};
use crate::sensors::SensorSnapshot;

pub struct PumpService<S, A, F, D> {
    sensors: S,
    actuator: A,
    safety: F,
    sink: D,
    current_protection: CurrentProtection,
    voltage_protection: VoltageProtection,
    setpoint: SetpointMapper,
    blender: ActuationBlender,
    fault_minimum: f32,
    safety_engaged: bool,
    last_snapshot: SensorSnapshot,
    last_command: ActuatorCommand,
}

impl<S, A, F, D> PumpService<S, A, F, D>
where
    S: SensorPort,
    A: ActuatorPort,
    F: SafetyInputPort,
    D: DiagnosticsSink,
{
    pub fn new(config: &SystemConfig, sensors: S, actuator: A, safety: F, sink: D) -> Self {
        Self {
            sensors,
            actuator,
            safety,
            sink,
            current_protection: CurrentProtection::new(config),
            voltage_protection: VoltageProtection::new(config),
            setpoint: SetpointMapper::new(config),
            blender: ActuationBlender::new(config),
            fault_minimum: config.fault_minimum_fraction,
            safety_engaged: false,
            last_snapshot: SensorSnapshot::nominal(),
            last_command: ActuatorCommand::off(),
        }
    }

    /// Run one control cycle at `now_ms` (wrapping millisecond ticks).
    pub fn tick(&mut self, now_ms: u32) -> Result<ActuatorCommand> {
        let snapshot = self.sensors.sample();

        let engaged = self.safety.engaged();
        if engaged != self.safety_engaged {
            self.safety_engaged = engaged;
            self.sink.record(&AppEvent::ExternalSafetyChanged { engaged });
        }

        let current_level = self.current_protection.update(
            snapshot.current_max_a,
            snapshot.current_valid,
            now_ms,
            &mut self.sink,
        );
        self.voltage_protection.update(
            snapshot.voltage_v,
            snapshot.voltage_valid,
            now_ms,
            &mut self.sink,
        );

        let emergency = current_level == Level::Emergency;
        let target = self
            .setpoint
            .target(snapshot.pressure_bar, snapshot.pressure_valid);

        let command = self.blender.blend(
            target,
            &[
                self.current_protection.limit_factor(),
                self.voltage_protection.limit_factor(),
            ],
            self.output_floor(emergency),
            engaged,
            emergency,
        );

        self.actuator.apply(&command)?;

        self.last_snapshot = snapshot;
        self.last_command = command;
        Ok(command)
    }

    /// Minimum output fraction demanded this tick. Zero unless a
    /// fault-class level is active; always zero under an external
    /// safety cut or a shutdown-enabled emergency.
    fn output_floor(&self, emergency: bool) -> f32 {
        if self.safety_engaged {
            return 0.0;
        }
        if emergency && cfg!(feature = "full-shutdown") {
            return 0.0;
        }
        if self.current_protection.fault_class_active()
            || self.voltage_protection.fault_class_active()
        {
            self.fault_minimum
        } else {
            0.0
        }
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            current_level: self.current_protection.level(),
            voltage_level: self.voltage_protection.level(),
            current_a: self.last_snapshot.current_max_a,
            voltage_v: self.last_snapshot.voltage_v,
            baseline_v: self.voltage_protection.baseline_v(),
            pressure_bar: self.last_snapshot.pressure_bar,
            target_fraction: self.last_command.target_fraction,
            output_fraction: self.last_command.output_fraction,
            effective_limit: self.last_command.effective_limit,
            external_safety: self.safety_engaged,
            current_faults: self.current_protection.fault_count(),
            voltage_faults: self.voltage_protection.fault_count(),
        }
    }

    pub fn current_level(&self) -> Level {
        self.current_protection.level()
    }

    pub fn voltage_level(&self) -> Level {
        self.voltage_protection.level()
    }

    pub fn current_limit_factor(&self) -> f32 {
        self.current_protection.limit_factor()
    }

    pub fn voltage_limit_factor(&self) -> f32 {
        self.voltage_protection.limit_factor()
    }

    pub fn external_safety_engaged(&self) -> bool {
        self.safety_engaged
    }

    /// Clear both domains' lifetime fault counters (service command,
    /// e.g. after maintenance).
    pub fn reset_fault_counts(&mut self) {
        self.current_protection.reset_fault_count();
        self.voltage_protection.reset_fault_count();
    }

    pub fn diagnostics(&self) -> &D {
        &self.sink
    }

    pub fn diagnostics_mut(&mut self) -> &mut D {
        &mut self.sink
    }
}
