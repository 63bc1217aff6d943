//! Diagnostics: periodic status snapshots and a bounded history of
//! protection transitions.
//!
//! Nothing here influences control decisions; it exists so a human (or
//! a serial console) can reconstruct what the machine did and why.

use core::fmt;

use heapless::Deque;

use crate::app::events::AppEvent;
use crate::app::ports::DiagnosticsSink;
use crate::protection::{Domain, Level};

/// Transitions kept in memory. Old entries are evicted FIFO.
pub const HISTORY_DEPTH: usize = 32;

/// One protection-level transition, as kept in the history ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRecord {
    pub domain: Domain,
    pub from: Level,
    pub to: Level,
    pub measurement: f32,
    pub at_ms: u32,
}

/// Fixed-capacity transition history. Implements [`DiagnosticsSink`] so
/// it can sit directly on the event stream, alone or fanned out.
#[derive(Default)]
pub struct TransitionHistory {
    records: Deque<TransitionRecord, HISTORY_DEPTH>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    fn push(&mut self, record: TransitionRecord) {
        if self.records.is_full() {
            self.records.pop_front();
        }
        // Cannot fail: a slot was just freed if needed.
        let _ = self.records.push_back(record);
    }
}

impl DiagnosticsSink for TransitionHistory {
    fn record(&mut self, event: &AppEvent) {
        if let AppEvent::LevelChanged {
            domain,
            from,
            to,
            measurement,
            at_ms,
            ..
        } = *event
        {
            self.push(TransitionRecord {
                domain,
                from,
                to,
                measurement,
                at_ms,
            });
        }
    }
}

/// Point-in-time view of the whole controller, published once per
/// status interval.
#[derive(Debug, Clone, Copy)]
pub struct StatusSnapshot {
    pub current_level: Level,
    pub voltage_level: Level,
    pub current_a: f32,
    pub voltage_v: f32,
    pub baseline_v: f32,
    pub pressure_bar: f32,
    pub target_fraction: f32,
    pub output_fraction: f32,
    pub effective_limit: f32,
    pub external_safety: bool,
    pub current_faults: u32,
    pub voltage_faults: u32,
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "out={:.2} (target {:.2}, limit {:.2}) | I={:.1}A [{}] V={:.1}V (base {:.1}) [{}] P={:.2}bar | faults I:{} V:{}{}",
            self.output_fraction,
            self.target_fraction,
            self.effective_limit,
            self.current_a,
            self.current_level,
            self.voltage_v,
            self.baseline_v,
            self.voltage_level,
            self.pressure_bar,
            self.current_faults,
            self.voltage_faults,
            if self.external_safety { " | SAFETY CUT" } else { "" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(at_ms: u32) -> AppEvent {
        AppEvent::LevelChanged {
            domain: Domain::Current,
            from: Level::Normal,
            to: Level::Warning,
            measurement: 26.0,
            at_ms,
            since_last_ms: 50,
        }
    }

    #[test]
    fn records_level_changes_only() {
        let mut h = TransitionHistory::new();
        h.record(&change(100));
        h.record(&AppEvent::ExternalSafetyChanged { engaged: true });
        h.record(&AppEvent::FaultRaised {
            domain: Domain::Voltage,
            level: Level::Critical,
            fault_count: 1,
        });
        assert_eq!(h.len(), 1);
        assert_eq!(h.latest().unwrap().at_ms, 100);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut h = TransitionHistory::new();
        for i in 0..(HISTORY_DEPTH as u32 + 5) {
            h.record(&change(i));
        }
        assert_eq!(h.len(), HISTORY_DEPTH);
        assert_eq!(h.iter().next().unwrap().at_ms, 5);
        assert_eq!(h.latest().unwrap().at_ms, HISTORY_DEPTH as u32 + 4);
    }

    #[test]
    fn status_line_formats() {
        let s = StatusSnapshot {
            current_level: Level::Warning,
            voltage_level: Level::Normal,
            current_a: 26.3,
            voltage_v: 12.1,
            baseline_v: 12.4,
            pressure_bar: 0.25,
            target_fraction: 0.78,
            output_fraction: 0.55,
            effective_limit: 0.70,
            external_safety: false,
            current_faults: 0,
            voltage_faults: 0,
        };
        let line = s.to_string();
        assert!(line.contains("WARNING"));
        assert!(line.contains("26.3A"));
        assert!(!line.contains("SAFETY CUT"));
    }
}
