//! Pump PWM output driver.
//!
//! Both pump channels mirror the same duty: the two outputs drive the
//! same pump's redundant windings and must never diverge. Fraction in,
//! 8-bit LEDC duty out.

use crate::drivers::hw;
use crate::pins;

pub struct PumpOutputs {
    last_duty: u8,
}

impl PumpOutputs {
    pub fn new() -> Self {
        Self { last_duty: 0 }
    }

    /// Drive both channels at `fraction` (0.0..=1.0, clamped).
    pub fn set_fraction(&mut self, fraction: f32) {
        let duty = Self::fraction_to_duty(fraction);
        hw::ledc_set(pins::LEDC_CH_PUMP_1, duty);
        hw::ledc_set(pins::LEDC_CH_PUMP_2, duty);
        self.last_duty = duty;
    }

    pub fn last_duty(&self) -> u8 {
        self.last_duty
    }

    fn fraction_to_duty(fraction: f32) -> u8 {
        let max = ((1u16 << pins::PWM_RESOLUTION_BITS) - 1) as f32;
        (fraction.clamp(0.0, 1.0) * max + 0.5) as u8
    }
}

impl Default for PumpOutputs {
    fn default() -> Self {
        Self::new()
    }
}
