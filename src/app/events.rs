//! Application events emitted by the control core.
//!
//! Every observable state change funnels through [`AppEvent`] so the
//! diagnostics sink (log output on hardware, a capture buffer in tests)
//! sees one uniform stream. Events are plain `Copy` data; no allocation
//! on the emit path.

use crate::protection::{Domain, Level};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// A protection ladder moved between levels.
    LevelChanged {
        domain: Domain,
        from: Level,
        to: Level,
        /// The measurement that drove the transition (Amperes for the
        /// current domain, Volts of sag for the voltage domain).
        measurement: f32,
        at_ms: u32,
        /// Time spent at `from` before this transition.
        since_last_ms: u32,
    },
    /// A transition landed on a fault-class level.
    FaultRaised {
        domain: Domain,
        level: Level,
        /// Lifetime count of fault-class entries for this domain.
        fault_count: u32,
    },
    /// A domain left its fault-class band.
    FaultRecovered { domain: Domain, level: Level },
    /// The external safety input changed state.
    ExternalSafetyChanged { engaged: bool },
}
