//! MPX5700AP absolute pressure sensor (MAP) driver.
//!
//! Datasheet transfer function: `Vout = Vs · (0.00125 · P(kPa) + 0.04)`,
//! inverted here to recover kPa, then converted to bar gauge by
//! subtracting atmospheric pressure. Negative gauge values are vacuum,
//! positive are boost.
//!
//! The EMA runs on the sensed voltage (before conversion), matching the
//! sensor's noise characteristics; the plausible range check runs on the
//! converted gauge value.

use crate::config::SystemConfig;
use crate::drivers::hw;
use crate::sensors::filter::{EmaFilter, FilteredReading};

/// Plausible gauge range for a 15–700 kPa absolute sensor.
const MIN_VALID_BAR: f32 = -1.0;
const MAX_VALID_BAR: f32 = 6.0;

pub struct PressureSensor {
    adc_channel: u32,
    adc_reference_v: f32,
    atmospheric_bar: f32,
    filter: EmaFilter,
}

impl PressureSensor {
    pub fn new(adc_channel: u32, config: &SystemConfig) -> Self {
        Self {
            adc_channel,
            adc_reference_v: config.adc_reference_v,
            atmospheric_bar: config.atmospheric_pressure_bar,
            filter: EmaFilter::new(config.map_filter_alpha),
        }
    }

    pub fn read(&mut self) -> FilteredReading {
        let raw = hw::adc1_read(self.adc_channel);
        let sensed_v = f32::from(raw) / 4095.0 * self.adc_reference_v;

        let filtered_v = self.filter.update(sensed_v);
        let value = self.volts_to_bar_gauge(filtered_v);
        let valid = (MIN_VALID_BAR..=MAX_VALID_BAR).contains(&value);

        FilteredReading { raw, value, valid }
    }

    fn volts_to_bar_gauge(&self, v: f32) -> f32 {
        let ratio = v / self.adc_reference_v;
        let p_kpa = (ratio - 0.04) / 0.001_25;
        let p_bar_absolute = p_kpa / 100.0;
        p_bar_absolute - self.atmospheric_bar
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    fn raw_for_bar_gauge(config: &SystemConfig, bar_gauge: f32) -> u16 {
        let p_kpa = (bar_gauge + config.atmospheric_pressure_bar) * 100.0;
        let ratio = 0.001_25 * p_kpa + 0.04;
        (ratio * 4095.0) as u16
    }

    #[test]
    fn atmospheric_reads_zero_gauge() {
        let config = SystemConfig::default();
        hw::sim_set_adc(8, raw_for_bar_gauge(&config, 0.0));
        let mut sensor = PressureSensor::new(8, &config);
        let r = sensor.read();
        assert!(r.value.abs() < 0.05, "expected ~0 bar gauge, got {}", r.value);
        assert!(r.valid);
    }

    #[test]
    fn boost_pressure_converts() {
        let config = SystemConfig::default();
        hw::sim_set_adc(9, raw_for_bar_gauge(&config, 0.3));
        let mut sensor = PressureSensor::new(9, &config);
        let r = sensor.read();
        assert!((r.value - 0.3).abs() < 0.05, "expected ~0.3 bar, got {}", r.value);
    }

    #[test]
    fn shorted_sensor_is_invalid() {
        let config = SystemConfig::default();
        hw::sim_set_adc(10, 0);
        let mut sensor = PressureSensor::new(10, &config);
        // Vout = 0 decodes far below any achievable vacuum.
        assert!(!sensor.read().valid);
    }
}
