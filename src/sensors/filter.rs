//! Exponential-moving-average filtering shared by every analog channel.
//!
//! `filtered = α·sample + (1−α)·filtered_prev`, with `0 < α ≤ 1` fixed
//! per channel. The filter is seeded with the first raw sample so there
//! is no slow ramp-in from an arbitrary zero state at startup.

/// One range-validated reading from an analog channel.
///
/// `valid` is recomputed on every read; an out-of-range reading keeps
/// the (stale but bounded) filtered value available for logging while
/// validity gates all control decisions.
#[derive(Debug, Clone, Copy)]
pub struct FilteredReading {
    /// Raw ADC counts behind this reading (post-oversampling average).
    pub raw: u16,
    /// Filtered physical value (Amperes, Volts, or bar gauge).
    pub value: f32,
    /// Whether the reading lies inside the channel's plausible range.
    pub valid: bool,
}

/// Seeded EMA filter.
#[derive(Debug, Clone, Copy)]
pub struct EmaFilter {
    alpha: f32,
    value: f32,
    seeded: bool,
}

impl EmaFilter {
    pub fn new(alpha: f32) -> Self {
        debug_assert!(alpha > 0.0 && alpha <= 1.0);
        Self {
            alpha,
            value: 0.0,
            seeded: false,
        }
    }

    /// Feed one sample; returns the new filtered value.
    pub fn update(&mut self, sample: f32) -> f32 {
        if self.seeded {
            self.value = self.alpha * sample + (1.0 - self.alpha) * self.value;
        } else {
            self.value = sample;
            self.seeded = true;
        }
        self.value
    }

    /// Last filtered value without feeding a new sample.
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }
}
