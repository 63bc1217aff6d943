//! Generic hysteretic protection ladder.
//!
//! Both protection domains (current and supply voltage) are the same
//! machine: an ordered list of severity levels with rising thresholds
//! between them, a hysteresis band on the way back down, an output
//! limit factor per level, and a fault counter. The domains differ only
//! in their level lists, thresholds, and how the measurement is formed,
//! so all of that arrives through [`LadderConfig`].
//!
//! Transition rules, evaluated once per control tick:
//!
//! * an invalid sensor pins the ladder at its designated fault level
//!   (measurements from a broken sensor prove nothing either way);
//! * crossing the emergency ceiling jumps straight to the top level;
//! * otherwise the ladder moves at most one level per tick: up when the
//!   measurement reaches the next threshold, down only when it falls
//!   below the current level's entry threshold minus the hysteresis.
//!
//! Thresholds may be rewritten between ticks; the voltage domain does
//! so every cycle as its baseline moves.

use crate::app::events::AppEvent;
use crate::app::ports::DiagnosticsSink;
use crate::protection::{Domain, Level};

/// Upper bound on ladder depth; both domains fit well inside it.
pub const MAX_LEVELS: usize = 8;

/// Static shape of one protection domain.
#[derive(Debug, Clone, Copy)]
pub struct LadderConfig {
    pub domain: Domain,
    /// Severity levels in ascending order.
    pub levels: &'static [Level],
    /// Output limit factor applied while the matching level is active.
    pub limit_factors: &'static [f32],
    /// Band below an entry threshold the measurement must clear before
    /// the ladder steps back down.
    pub hysteresis: f32,
    /// Level pinned while the sensor reads implausibly.
    pub sensor_fault_level: Level,
    /// Crossing this measurement jumps straight to the top level.
    pub emergency_ceiling: Option<f32>,
    /// Levels at or above this severity count as fault-class.
    pub fault_class_floor: Level,
}

pub struct ProtectionLadder {
    config: LadderConfig,
    /// `thresholds[i]` is the rising threshold from level `i` to `i+1`.
    /// Slots past the ladder depth stay at infinity and are unreachable.
    thresholds: [f32; MAX_LEVELS],
    index: usize,
    sensor_fault_index: usize,
    last_transition_ms: u32,
    fault_events: u32,
}

impl ProtectionLadder {
    pub fn new(config: LadderConfig, thresholds: &[f32]) -> Self {
        debug_assert_eq!(config.levels.len(), config.limit_factors.len());
        debug_assert_eq!(thresholds.len(), config.levels.len() - 1);

        let sensor_fault_index = config
            .levels
            .iter()
            .position(|l| *l == config.sensor_fault_level)
            .unwrap_or(config.levels.len() - 1);

        let mut ladder = Self {
            config,
            thresholds: [f32::INFINITY; MAX_LEVELS],
            index: 0,
            sensor_fault_index,
            last_transition_ms: 0,
            fault_events: 0,
        };
        ladder.set_thresholds(thresholds);
        ladder
    }

    /// Replace the rising thresholds. The voltage domain calls this
    /// every tick as its baseline moves; order must stay ascending.
    pub fn set_thresholds(&mut self, thresholds: &[f32]) {
        for (slot, t) in self.thresholds.iter_mut().zip(thresholds) {
            *slot = *t;
        }
    }

    /// Classify one measurement and emit any resulting events.
    /// Returns the level active after this tick.
    pub fn update(
        &mut self,
        measurement: f32,
        valid: bool,
        now_ms: u32,
        sink: &mut dyn DiagnosticsSink,
    ) -> Level {
        let top = self.config.levels.len() - 1;

        let next = if !valid {
            // Never *lower* severity on a broken sensor.
            self.index.max(self.sensor_fault_index)
        } else if self
            .config
            .emergency_ceiling
            .is_some_and(|ceiling| measurement >= ceiling)
        {
            top
        } else if self.index < top && measurement >= self.thresholds[self.index] {
            self.index + 1
        } else if self.index > 0
            && measurement < self.thresholds[self.index - 1] - self.config.hysteresis
        {
            self.index - 1
        } else {
            self.index
        };

        if next != self.index {
            self.transition(next, measurement, now_ms, sink);
        }
        self.level()
    }

    fn transition(
        &mut self,
        next: usize,
        measurement: f32,
        now_ms: u32,
        sink: &mut dyn DiagnosticsSink,
    ) {
        let from = self.config.levels[self.index];
        let to = self.config.levels[next];
        let since_last_ms = now_ms.wrapping_sub(self.last_transition_ms);

        self.index = next;
        self.last_transition_ms = now_ms;

        sink.record(&AppEvent::LevelChanged {
            domain: self.config.domain,
            from,
            to,
            measurement,
            at_ms: now_ms,
            since_last_ms,
        });

        if to >= self.config.fault_class_floor {
            self.fault_events = self.fault_events.wrapping_add(1);
            sink.record(&AppEvent::FaultRaised {
                domain: self.config.domain,
                level: to,
                fault_count: self.fault_events,
            });
        } else if from >= self.config.fault_class_floor {
            sink.record(&AppEvent::FaultRecovered {
                domain: self.config.domain,
                level: to,
            });
        }
    }

    pub fn level(&self) -> Level {
        self.config.levels[self.index]
    }

    pub fn limit_factor(&self) -> f32 {
        self.config.limit_factors[self.index]
    }

    /// True while the active level is at or above the fault-class floor.
    pub fn fault_class_active(&self) -> bool {
        self.level() >= self.config.fault_class_floor
    }

    /// Lifetime count of transitions into fault-class levels.
    pub fn fault_count(&self) -> u32 {
        self.fault_events
    }

    pub fn reset_fault_count(&mut self) {
        self.fault_events = 0;
    }

    pub fn last_transition_ms(&self) -> u32 {
        self.last_transition_ms
    }
}
