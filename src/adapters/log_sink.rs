//! Event sink that writes the application event stream to the log and
//! keeps the transition history ring.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::DiagnosticsSink;
use crate::diagnostics::TransitionHistory;

#[derive(Default)]
pub struct LogEventSink {
    history: TransitionHistory,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }
}

impl DiagnosticsSink for LogEventSink {
    fn record(&mut self, event: &AppEvent) {
        match *event {
            AppEvent::LevelChanged {
                domain,
                from,
                to,
                measurement,
                since_last_ms,
                ..
            } => {
                if to > from {
                    warn!(
                        "{domain}: {from} -> {to} at {measurement:.2} (held {from} for {since_last_ms} ms)"
                    );
                } else {
                    info!(
                        "{domain}: {from} -> {to} at {measurement:.2} (held {from} for {since_last_ms} ms)"
                    );
                }
            }
            AppEvent::FaultRaised {
                domain,
                level,
                fault_count,
            } => {
                error!("{domain}: fault-class {level} active (lifetime count {fault_count})");
            }
            AppEvent::FaultRecovered { domain, level } => {
                info!("{domain}: recovered to {level}");
            }
            AppEvent::ExternalSafetyChanged { engaged } => {
                if engaged {
                    warn!("external safety engaged, outputs cut");
                } else {
                    info!("external safety released");
                }
            }
        }
        self.history.record(event);
    }
}
