//! Multi-domain protection: leveled, hysteretic responses to
//! over-current and supply-voltage sag.
//!
//! Each domain wraps the shared [`ladder::ProtectionLadder`] with its
//! own level list and measurement formation. Levels never trip relays
//! or kill outputs directly; they publish a limit factor the actuation
//! blender folds into the final command.

pub mod baseline;
pub mod ladder;

use core::fmt;

use crate::app::ports::DiagnosticsSink;
use crate::config::SystemConfig;
use crate::protection::baseline::BaselineTracker;
use crate::protection::ladder::{LadderConfig, ProtectionLadder};

/// Which protection domain an event or level belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Current,
    Voltage,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Voltage => write!(f, "voltage"),
        }
    }
}

/// Protection severity, ordered: comparisons follow declaration order,
/// so `Level::Fault > Level::Warning` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Normal,
    Warning,
    High,
    Critical,
    Fault,
    Emergency,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Warning => "WARNING",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
            Self::Fault => "FAULT",
            Self::Emergency => "EMERGENCY",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Current domain
// ---------------------------------------------------------------------------

const CURRENT_LEVELS: [Level; 6] = [
    Level::Normal,
    Level::Warning,
    Level::High,
    Level::Critical,
    Level::Fault,
    Level::Emergency,
];

/// With `full-shutdown` enabled an emergency cuts the outputs entirely;
/// the default keeps a reduced flow so the pump never fully stops while
/// the engine may still need cooling.
const CURRENT_EMERGENCY_LIMIT: f32 = if cfg!(feature = "full-shutdown") { 0.0 } else { 0.50 };

const CURRENT_LIMITS: [f32; 6] = [1.00, 0.70, 0.60, 0.50, 0.50, CURRENT_EMERGENCY_LIMIT];

/// Over-current ladder classifying the worse of the two pump channels.
pub struct CurrentProtection {
    ladder: ProtectionLadder,
}

impl CurrentProtection {
    pub fn new(config: &SystemConfig) -> Self {
        let ladder = ProtectionLadder::new(
            LadderConfig {
                domain: Domain::Current,
                levels: &CURRENT_LEVELS,
                limit_factors: &CURRENT_LIMITS,
                hysteresis: config.current_hysteresis_a,
                sensor_fault_level: Level::Fault,
                emergency_ceiling: Some(config.current_emergency_ceiling_a),
                fault_class_floor: Level::Fault,
            },
            &[
                config.current_threshold_warning_a,
                config.current_threshold_high_a,
                config.current_threshold_critical_a,
                config.current_threshold_fault_a,
                // The ceiling doubles as the rising threshold into
                // EMERGENCY so downward hysteresis works above it too.
                config.current_emergency_ceiling_a,
            ],
        );
        Self { ladder }
    }

    pub fn update(
        &mut self,
        current_a: f32,
        valid: bool,
        now_ms: u32,
        sink: &mut dyn DiagnosticsSink,
    ) -> Level {
        self.ladder.update(current_a, valid, now_ms, sink)
    }

    pub fn level(&self) -> Level {
        self.ladder.level()
    }

    pub fn limit_factor(&self) -> f32 {
        self.ladder.limit_factor()
    }

    pub fn fault_class_active(&self) -> bool {
        self.ladder.fault_class_active()
    }

    pub fn fault_count(&self) -> u32 {
        self.ladder.fault_count()
    }

    pub fn reset_fault_count(&mut self) {
        self.ladder.reset_fault_count()
    }
}

// ---------------------------------------------------------------------------
// Voltage domain
// ---------------------------------------------------------------------------

const VOLTAGE_LEVELS: [Level; 4] = [
    Level::Normal,
    Level::Warning,
    Level::Critical,
    Level::Fault,
];

const VOLTAGE_LIMITS: [f32; 4] = [1.00, 0.85, 0.70, 0.50];

/// Supply-sag ladder. The measurement is the drop below the learned
/// baseline, so "worse" is always a rising number and the shared ladder
/// logic applies unchanged. FAULT is reachable only through sensor
/// invalidity: its rising threshold is infinite.
pub struct VoltageProtection {
    ladder: ProtectionLadder,
    baseline: BaselineTracker,
    warning_pct: f32,
    critical_pct: f32,
}

impl VoltageProtection {
    pub fn new(config: &SystemConfig) -> Self {
        let ladder = ProtectionLadder::new(
            LadderConfig {
                domain: Domain::Voltage,
                levels: &VOLTAGE_LEVELS,
                limit_factors: &VOLTAGE_LIMITS,
                hysteresis: config.voltage_hysteresis_v,
                sensor_fault_level: Level::Fault,
                emergency_ceiling: None,
                fault_class_floor: Level::Critical,
            },
            &[0.0, 0.0, f32::INFINITY],
        );
        Self {
            ladder,
            baseline: BaselineTracker::new(config),
            warning_pct: config.voltage_drop_warning_pct,
            critical_pct: config.voltage_drop_critical_pct,
        }
    }

    pub fn update(
        &mut self,
        voltage_v: f32,
        valid: bool,
        now_ms: u32,
        sink: &mut dyn DiagnosticsSink,
    ) -> Level {
        if valid {
            self.baseline.update(voltage_v);
        }
        let baseline_v = self.baseline.value();

        // Thresholds track the baseline, so a slowly recovering supply
        // tightens the sag budget every tick.
        self.ladder.set_thresholds(&[
            baseline_v * self.warning_pct,
            baseline_v * self.critical_pct,
            f32::INFINITY,
        ]);

        let sag_v = (baseline_v - voltage_v).max(0.0);
        self.ladder.update(sag_v, valid, now_ms, sink)
    }

    pub fn baseline_v(&self) -> f32 {
        self.baseline.value()
    }

    pub fn level(&self) -> Level {
        self.ladder.level()
    }

    pub fn limit_factor(&self) -> f32 {
        self.ladder.limit_factor()
    }

    pub fn fault_class_active(&self) -> bool {
        self.ladder.fault_class_active()
    }

    pub fn fault_count(&self) -> u32 {
        self.ladder.fault_count()
    }

    pub fn reset_fault_count(&mut self) {
        self.ladder.reset_fault_count()
    }
}
