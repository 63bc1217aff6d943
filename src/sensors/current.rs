//! ACS772 hall-effect current sensor driver (unidirectional, 0–50 A).
//!
//! The sensor outputs a voltage proportional to current with a fixed
//! zero-current offset. Each read oversamples the ADC a fixed number of
//! times with a fixed microsecond spacing to average out switching noise
//! from the pump PWM carrier, then runs the result through the channel
//! EMA.
//!
//! Validity is judged on the *instantaneous* (pre-EMA) sample: a wiring
//! fault shows up immediately rather than after the filter catches up.

use crate::config::SystemConfig;
use crate::drivers::hw;
use crate::sensors::filter::{EmaFilter, FilteredReading};

pub struct CurrentSensor {
    adc_channel: u32,
    sensitivity_v_per_a: f32,
    zero_current_v: f32,
    max_valid_a: f32,
    adc_reference_v: f32,
    oversample_count: u8,
    oversample_delay_us: u32,
    filter: EmaFilter,
}

impl CurrentSensor {
    pub fn new(adc_channel: u32, config: &SystemConfig) -> Self {
        Self {
            adc_channel,
            sensitivity_v_per_a: config.acs772_sensitivity_v_per_a,
            zero_current_v: config.acs772_zero_current_v,
            max_valid_a: config.current_max_valid_a,
            adc_reference_v: config.adc_reference_v,
            oversample_count: config.current_oversample_count.max(1),
            oversample_delay_us: config.current_oversample_delay_us,
            filter: EmaFilter::new(config.current_filter_alpha),
        }
    }

    /// Oversample, convert, filter, and range-check one reading.
    pub fn read(&mut self) -> FilteredReading {
        let raw = self.oversampled_raw();
        let instantaneous_a = self.adc_to_amps(raw);

        let value = self.filter.update(instantaneous_a);
        let valid = (0.0..=self.max_valid_a).contains(&instantaneous_a);

        FilteredReading { raw, value, valid }
    }

    /// Average a fixed burst of samples spaced by a fixed delay.
    fn oversampled_raw(&self) -> u16 {
        let mut sum: u32 = 0;
        for i in 0..self.oversample_count {
            if i > 0 {
                hw::delay_us(self.oversample_delay_us);
            }
            sum += u32::from(hw::adc1_read(self.adc_channel));
        }
        (sum / u32::from(self.oversample_count)) as u16
    }

    fn adc_to_amps(&self, raw: u16) -> f32 {
        let v = f32::from(raw) / 4095.0 * self.adc_reference_v;
        (v - self.zero_current_v) / self.sensitivity_v_per_a
    }
}
