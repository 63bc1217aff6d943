//! Supply voltage sensing through a 10k/1k resistive divider.
//!
//! `V_supply = V_adc / divider_ratio`. The filtered value feeds both
//! the baseline tracker and the voltage protection ladder, so validity
//! is judged on the *filtered* value: a single noise spike should not
//! fault the domain, but a sustained implausible reading must.

use crate::config::SystemConfig;
use crate::drivers::hw;
use crate::sensors::filter::{EmaFilter, FilteredReading};

pub struct VoltageSensor {
    adc_channel: u32,
    divider_ratio: f32,
    adc_reference_v: f32,
    min_valid_v: f32,
    max_valid_v: f32,
    filter: EmaFilter,
}

impl VoltageSensor {
    pub fn new(adc_channel: u32, config: &SystemConfig) -> Self {
        Self {
            adc_channel,
            divider_ratio: config.voltage_divider_ratio,
            adc_reference_v: config.adc_reference_v,
            min_valid_v: config.voltage_min_valid_v,
            max_valid_v: config.voltage_max_valid_v,
            filter: EmaFilter::new(config.voltage_filter_alpha),
        }
    }

    pub fn read(&mut self) -> FilteredReading {
        let raw = hw::adc1_read(self.adc_channel);
        let supply_v = self.adc_to_supply_volts(raw);

        let value = self.filter.update(supply_v);
        let valid = (self.min_valid_v..=self.max_valid_v).contains(&value);

        FilteredReading { raw, value, valid }
    }

    fn adc_to_supply_volts(&self, raw: u16) -> f32 {
        let adc_v = f32::from(raw) / 4095.0 * self.adc_reference_v;
        adc_v / self.divider_ratio
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    fn raw_for_volts(config: &SystemConfig, supply_v: f32) -> u16 {
        let adc_v = supply_v * config.voltage_divider_ratio;
        (adc_v / config.adc_reference_v * 4095.0) as u16
    }

    #[test]
    fn converts_nominal_supply() {
        let config = SystemConfig::default();
        hw::sim_set_adc(2, raw_for_volts(&config, 12.0));
        let mut sensor = VoltageSensor::new(2, &config);
        let r = sensor.read();
        assert!((r.value - 12.0).abs() < 0.2, "expected ~12 V, got {}", r.value);
        assert!(r.valid);
    }

    #[test]
    fn dead_divider_reads_invalid() {
        let config = SystemConfig::default();
        hw::sim_set_adc(3, 0);
        let mut sensor = VoltageSensor::new(3, &config);
        let r = sensor.read();
        assert!(!r.valid);
        assert!(r.value < config.voltage_min_valid_v);
    }

    #[test]
    fn over_range_reads_invalid() {
        let config = SystemConfig::default();
        hw::sim_set_adc(7, raw_for_volts(&config, 18.0));
        let mut sensor = VoltageSensor::new(7, &config);
        assert!(!sensor.read().valid);
    }
}
