//! Upward-only baseline tracker for the nominal supply voltage.
//!
//! Voltage-protection thresholds are computed as a percentage drop from
//! this baseline instead of fixed absolute values, so the protection
//! adapts to the 8–14.5 V automotive range. Downward excursions are
//! exactly the events the rest of the system must react to, so the
//! baseline never chases them down: once seeded it only tracks upward
//! (supply recovery), through a slow EMA.

use crate::config::SystemConfig;

#[derive(Debug, Clone, Copy)]
pub struct BaselineTracker {
    value: f32,
    initialized: bool,
    alpha: f32,
    min_v: f32,
    max_v: f32,
}

impl BaselineTracker {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            value: 0.0,
            initialized: false,
            alpha: config.baseline_alpha,
            min_v: config.baseline_min_v,
            max_v: config.baseline_max_v,
        }
    }

    /// Feed one filtered supply-voltage reading.
    pub fn update(&mut self, filtered_v: f32) {
        if !self.initialized {
            self.value = filtered_v;
            self.initialized = true;
        } else if filtered_v > self.value {
            self.value += self.alpha * (filtered_v - self.value);
        }
        // A sagging supply leaves `value` untouched: thresholds derived
        // from the baseline must not shrink together with the sag.
        self.value = self.value.clamp(self.min_v, self.max_v);
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }
}
