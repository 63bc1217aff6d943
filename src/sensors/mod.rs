//! Sensor subsystem — individual channel drivers and the aggregating
//! [`SensorHub`].
//!
//! The hub owns every channel driver and produces one [`SensorSnapshot`]
//! per control tick. A snapshot carries the filtered physical values
//! together with per-channel validity: consumers must check validity
//! before treating a value as fact.

pub mod current;
pub mod filter;
pub mod pressure;
pub mod voltage;

use crate::config::SystemConfig;
use crate::pins;
use current::CurrentSensor;
use pressure::PressureSensor;
use voltage::VoltageSensor;

/// One control cycle's worth of filtered, range-validated readings.
#[derive(Debug, Clone, Copy)]
pub struct SensorSnapshot {
    /// Filtered current on channel 1 (Amperes).
    pub current_1_a: f32,
    /// Filtered current on channel 2 (Amperes).
    pub current_2_a: f32,
    /// Max of the two channels — the value protection classifies on.
    pub current_max_a: f32,
    /// Both channels inside the plausible range.
    pub current_valid: bool,
    /// Filtered supply voltage (Volts).
    pub voltage_v: f32,
    pub voltage_valid: bool,
    /// Filtered manifold pressure (bar gauge; negative = vacuum).
    pub pressure_bar: f32,
    pub pressure_valid: bool,
}

impl SensorSnapshot {
    /// A snapshot representing quiet, nominal operation. Handy as a test
    /// fixture and as the pre-first-read state.
    pub fn nominal() -> Self {
        Self {
            current_1_a: 0.0,
            current_2_a: 0.0,
            current_max_a: 0.0,
            current_valid: true,
            voltage_v: 12.0,
            voltage_valid: true,
            pressure_bar: 0.0,
            pressure_valid: true,
        }
    }
}

/// Aggregates all channel drivers and produces a unified snapshot.
pub struct SensorHub {
    current_1: CurrentSensor,
    current_2: CurrentSensor,
    voltage: VoltageSensor,
    pressure: PressureSensor,
}

impl SensorHub {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            current_1: CurrentSensor::new(pins::CURRENT_1_ADC_CH, config),
            current_2: CurrentSensor::new(pins::CURRENT_2_ADC_CH, config),
            voltage: VoltageSensor::new(pins::VCC_SENSE_ADC_CH, config),
            pressure: PressureSensor::new(pins::MAP_ADC_CH, config),
        }
    }

    /// Read every channel. An out-of-range channel stays in the snapshot
    /// (stale-but-bounded value for logging) with its validity cleared —
    /// a flaky sensor must degrade output, never crash the loop.
    pub fn read_all(&mut self) -> SensorSnapshot {
        let c1 = self.current_1.read();
        let c2 = self.current_2.read();
        let v = self.voltage.read();
        let p = self.pressure.read();

        SensorSnapshot {
            current_1_a: c1.value,
            current_2_a: c2.value,
            current_max_a: c1.value.max(c2.value),
            current_valid: c1.valid && c2.valid,
            voltage_v: v.value,
            voltage_valid: v.valid,
            pressure_bar: p.value,
            pressure_valid: p.valid,
        }
    }
}
