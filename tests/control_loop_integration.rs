//! End-to-end control loop scenarios against mock ports.
//!
//! Each test drives `PumpService` tick by tick with scripted sensor
//! frames and asserts on the actuation commands and the event stream.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pumpguard::app::events::AppEvent;
use pumpguard::app::ports::{ActuatorPort, DiagnosticsSink, SafetyInputPort, SensorPort};
use pumpguard::app::PumpService;
use pumpguard::config::SystemConfig;
use pumpguard::control::ActuatorCommand;
use pumpguard::error::Result;
use pumpguard::protection::{Domain, Level};
use pumpguard::sensors::SensorSnapshot;

// ── Mock ports ───────────────────────────────────────────────

struct SharedSensors(Rc<Cell<SensorSnapshot>>);

impl SensorPort for SharedSensors {
    fn sample(&mut self) -> SensorSnapshot {
        self.0.get()
    }
}

struct RecordingActuator(Rc<RefCell<Vec<ActuatorCommand>>>);

impl ActuatorPort for RecordingActuator {
    fn apply(&mut self, command: &ActuatorCommand) -> Result<()> {
        self.0.borrow_mut().push(*command);
        Ok(())
    }
}

struct SharedSafety(Rc<Cell<bool>>);

impl SafetyInputPort for SharedSafety {
    fn engaged(&mut self) -> bool {
        self.0.get()
    }
}

#[derive(Default)]
struct CaptureSink {
    events: Vec<AppEvent>,
}

impl DiagnosticsSink for CaptureSink {
    fn record(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Test rig ─────────────────────────────────────────────────

struct Rig {
    service: PumpService<SharedSensors, RecordingActuator, SharedSafety, CaptureSink>,
    sensors: Rc<Cell<SensorSnapshot>>,
    safety: Rc<Cell<bool>>,
    commands: Rc<RefCell<Vec<ActuatorCommand>>>,
    config: SystemConfig,
    now_ms: u32,
}

impl Rig {
    fn new() -> Self {
        let config = SystemConfig::default();
        let sensors = Rc::new(Cell::new(SensorSnapshot::nominal()));
        let safety = Rc::new(Cell::new(false));
        let commands = Rc::new(RefCell::new(Vec::new()));

        let service = PumpService::new(
            &config,
            SharedSensors(Rc::clone(&sensors)),
            RecordingActuator(Rc::clone(&commands)),
            SharedSafety(Rc::clone(&safety)),
            CaptureSink::default(),
        );

        Self {
            service,
            sensors,
            safety,
            commands,
            config,
            now_ms: 0,
        }
    }

    fn set_sensors(&self, edit: impl FnOnce(&mut SensorSnapshot)) {
        let mut s = self.sensors.get();
        edit(&mut s);
        self.sensors.set(s);
    }

    fn tick(&mut self) -> ActuatorCommand {
        self.now_ms += self.config.control_loop_interval_ms;
        self.service.tick(self.now_ms).expect("tick must not fail")
    }

    fn run(&mut self, ticks: usize) -> ActuatorCommand {
        let mut last = ActuatorCommand::off();
        for _ in 0..ticks {
            last = self.tick();
        }
        last
    }

    fn events(&self) -> Vec<AppEvent> {
        self.service.diagnostics().events.clone()
    }
}

// ── Scenarios ────────────────────────────────────────────────

#[test]
fn ramps_to_full_output_under_boost() {
    let mut rig = Rig::new();
    rig.set_sensors(|s| s.pressure_bar = 0.5);

    let mut previous = 0.0;
    for _ in 0..25 {
        let c = rig.tick();
        let step = c.output_fraction - previous;
        assert!(step >= 0.0 && step <= rig.config.output_rate_max_per_cycle + 1e-6);
        previous = c.output_fraction;
    }
    assert!((previous - 1.0).abs() < 1e-6, "should settle at 1.0, got {previous}");
}

#[test]
fn idle_pressure_holds_minimum_fraction() {
    let mut rig = Rig::new();
    rig.set_sensors(|s| s.pressure_bar = 0.0);
    let c = rig.run(30);
    assert!((c.output_fraction - rig.config.output_fraction_min).abs() < 1e-6);
}

#[test]
fn overcurrent_warning_caps_output() {
    let mut rig = Rig::new();
    rig.set_sensors(|s| s.pressure_bar = 0.5);
    rig.run(25);

    rig.set_sensors(|s| {
        s.current_1_a = 26.0;
        s.current_2_a = 10.0;
        s.current_max_a = 26.0;
    });
    let c = rig.run(15);

    assert_eq!(rig.service.current_level(), Level::Warning);
    assert!((rig.service.current_limit_factor() - 0.70).abs() < 1e-6);
    assert!((c.effective_limit - 0.70).abs() < 1e-6);
    assert!((c.output_fraction - 0.70).abs() < 1e-6);
}

#[test]
fn voltage_sag_caps_output() {
    let mut rig = Rig::new();
    rig.set_sensors(|s| s.pressure_bar = 0.5);
    rig.run(25);

    // 12 V baseline, 8 V supply: 33% sag crosses the 30% threshold.
    rig.set_sensors(|s| s.voltage_v = 8.0);
    let c = rig.run(10);

    assert_eq!(rig.service.voltage_level(), Level::Warning);
    assert!((rig.service.voltage_limit_factor() - 0.85).abs() < 1e-6);
    assert!((c.effective_limit - 0.85).abs() < 1e-6);
    assert!((c.output_fraction - 0.85).abs() < 1e-6);
}

#[test]
fn invalid_current_sensor_forces_fault_floor() {
    let mut rig = Rig::new();
    rig.set_sensors(|s| s.pressure_bar = 0.5);
    rig.run(25);

    rig.set_sensors(|s| s.current_valid = false);
    let c = rig.run(20);

    assert_eq!(rig.service.current_level(), Level::Fault);
    // FAULT limit is 0.5; the fault floor keeps the pump at half flow
    // rather than trusting a broken sensor with a shutdown decision.
    assert!((c.output_fraction - 0.50).abs() < 1e-6);
}

#[test]
fn external_safety_cuts_output_in_one_tick() {
    let mut rig = Rig::new();
    rig.set_sensors(|s| s.pressure_bar = 0.5);
    let c = rig.run(25);
    assert!(c.output_fraction > 0.9);

    rig.safety.set(true);
    let c = rig.tick();
    assert_eq!(c.output_fraction, 0.0);
    assert!(c.bypassed_slew);
    assert!(rig.service.external_safety_engaged());

    assert!(rig
        .events()
        .iter()
        .any(|e| matches!(e, AppEvent::ExternalSafetyChanged { engaged: true })));
}

#[test]
fn release_of_safety_ramps_back_up() {
    let mut rig = Rig::new();
    rig.set_sensors(|s| s.pressure_bar = 0.5);
    rig.run(25);
    rig.safety.set(true);
    rig.tick();

    rig.safety.set(false);
    let c = rig.tick();
    assert!(
        (c.output_fraction - rig.config.output_rate_max_per_cycle).abs() < 1e-6,
        "recovery restarts the ramp from zero"
    );
}

#[test]
fn safety_overrides_fault_floor() {
    let mut rig = Rig::new();
    rig.set_sensors(|s| {
        s.pressure_bar = 0.5;
        s.current_valid = false;
    });
    rig.run(10);
    rig.safety.set(true);
    let c = rig.tick();
    assert_eq!(c.output_fraction, 0.0);
}

#[test]
#[cfg(not(feature = "full-shutdown"))]
fn emergency_drops_to_half_flow_immediately() {
    let mut rig = Rig::new();
    rig.set_sensors(|s| s.pressure_bar = 0.5);
    rig.run(25);

    rig.set_sensors(|s| {
        s.current_1_a = 46.0;
        s.current_max_a = 46.0;
    });
    let c = rig.tick();

    assert_eq!(rig.service.current_level(), Level::Emergency);
    assert!(c.bypassed_slew, "emergency must not wait out the ramp");
    assert!((c.output_fraction - 0.50).abs() < 1e-6);
}

#[test]
#[cfg(feature = "full-shutdown")]
fn emergency_shuts_down_completely() {
    let mut rig = Rig::new();
    rig.set_sensors(|s| s.pressure_bar = 0.5);
    rig.run(25);

    rig.set_sensors(|s| s.current_max_a = 46.0);
    let c = rig.tick();

    assert_eq!(rig.service.current_level(), Level::Emergency);
    assert_eq!(c.output_fraction, 0.0);
}

#[test]
fn fault_counters_persist_until_reset() {
    let mut rig = Rig::new();
    rig.run(5);

    // Two separate excursions to FAULT.
    for _ in 0..2 {
        rig.set_sensors(|s| s.current_max_a = 42.0);
        rig.run(6);
        assert_eq!(rig.service.current_level(), Level::Fault);
        rig.set_sensors(|s| s.current_max_a = 5.0);
        rig.run(10);
        assert_eq!(rig.service.current_level(), Level::Normal);
    }

    assert_eq!(rig.service.status().current_faults, 2);
    rig.service.reset_fault_counts();
    assert_eq!(rig.service.status().current_faults, 0);
}

#[test]
fn level_changes_carry_monotonic_timestamps() {
    let mut rig = Rig::new();
    rig.run(3);
    rig.set_sensors(|s| s.current_max_a = 37.0);
    rig.run(5);

    let changes: Vec<u32> = rig
        .events()
        .iter()
        .filter_map(|e| match e {
            AppEvent::LevelChanged {
                domain: Domain::Current,
                at_ms,
                ..
            } => Some(*at_ms),
            _ => None,
        })
        .collect();

    assert!(changes.len() >= 2, "expected a multi-step climb");
    assert!(changes.windows(2).all(|w| w[0] < w[1]));
    assert!(changes
        .iter()
        .all(|t| t % rig.config.control_loop_interval_ms == 0));
}

#[test]
fn status_snapshot_reflects_live_state() {
    let mut rig = Rig::new();
    rig.set_sensors(|s| {
        s.pressure_bar = 0.3;
        s.current_max_a = 12.0;
        s.voltage_v = 12.5;
    });
    rig.run(40);

    let status = rig.service.status();
    assert_eq!(status.current_level, Level::Normal);
    assert_eq!(status.voltage_level, Level::Normal);
    assert!((status.current_a - 12.0).abs() < 1e-6);
    assert!((status.target_fraction - 0.85).abs() < 0.001);
    assert!((status.output_fraction - 0.85).abs() < 0.001);
    assert!(!status.external_safety);
    // Baseline learned from the supply.
    assert!((status.baseline_v - 12.5).abs() < 0.5);
}

#[test]
fn every_command_reaches_the_actuator() {
    let mut rig = Rig::new();
    rig.run(10);
    assert_eq!(rig.commands.borrow().len(), 10);
}
