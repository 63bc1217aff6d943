//! System configuration parameters
//!
//! All tunables for the pump controller are fixed at build time: the
//! struct is constructed once in `main()` (or by a test) and passed by
//! shared reference into every component. There is no runtime
//! configuration surface.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Pressure control (MAP sensor, bar gauge) ---
    /// Pressure at or below which the output sits at `output_fraction_min`
    pub map_low_setpoint_bar: f32,
    /// Pressure at or above which the output sits at `output_fraction_max`
    pub map_high_setpoint_bar: f32,
    /// Output fraction commanded at the low setpoint
    pub output_fraction_min: f32,
    /// Output fraction commanded at the high setpoint
    pub output_fraction_max: f32,
    /// EMA coefficient for the pressure channel (smaller = smoother)
    pub map_filter_alpha: f32,
    /// Atmospheric pressure used for the absolute→gauge conversion
    pub atmospheric_pressure_bar: f32,

    // --- Current sensing (ACS772, unidirectional) ---
    /// Sensor sensitivity in V/A
    pub acs772_sensitivity_v_per_a: f32,
    /// Measured sensor output at 0 A
    pub acs772_zero_current_v: f32,
    /// Absolute sensor maximum; instantaneous samples above this are invalid
    pub current_max_valid_a: f32,
    /// EMA coefficient for the current channel
    pub current_filter_alpha: f32,
    /// Samples averaged per read to reject PWM switching noise
    pub current_oversample_count: u8,
    /// Fixed delay between oversample reads
    pub current_oversample_delay_us: u32,

    // --- Voltage sensing (resistive divider) ---
    /// Divider ratio R2/(R1+R2); 1/11 for the 10k/1k divider
    pub voltage_divider_ratio: f32,
    /// EMA coefficient for the voltage channel
    pub voltage_filter_alpha: f32,
    /// Below this the voltage sensor is considered faulted
    pub voltage_min_valid_v: f32,
    /// Above this the voltage sensor is considered faulted
    pub voltage_max_valid_v: f32,

    // --- Voltage protection (percentage drop from baseline) ---
    /// Sag fraction of baseline that raises WARNING
    pub voltage_drop_warning_pct: f32,
    /// Sag fraction of baseline that raises CRITICAL
    pub voltage_drop_critical_pct: f32,
    /// Hysteresis band for voltage level transitions (Volts)
    pub voltage_hysteresis_v: f32,
    /// Baseline EMA coefficient (upward tracking only)
    pub baseline_alpha: f32,
    /// Baseline clamp range (plausible nominal supply)
    pub baseline_min_v: f32,
    pub baseline_max_v: f32,

    // --- Current protection ladder (Amperes) ---
    pub current_threshold_warning_a: f32,
    pub current_threshold_high_a: f32,
    pub current_threshold_critical_a: f32,
    pub current_threshold_fault_a: f32,
    /// Absolute ceiling: crossing this jumps straight to EMERGENCY
    pub current_emergency_ceiling_a: f32,
    /// Hysteresis band for current level transitions (Amperes)
    pub current_hysteresis_a: f32,

    // --- Actuation ---
    /// Maximum output-fraction change per control cycle
    pub output_rate_max_per_cycle: f32,
    /// Output floor while any fault-class protection level is active
    pub fault_minimum_fraction: f32,
    /// External safety input reads active when the GPIO level is low
    pub safety_input_active_low: bool,

    // --- ADC ---
    /// ADC reference voltage (full-scale)
    pub adc_reference_v: f32,

    // --- Timing ---
    /// Control loop tick period (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Status report interval (milliseconds)
    pub status_report_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Pressure control
            map_low_setpoint_bar: 0.2,
            map_high_setpoint_bar: 0.4,
            output_fraction_min: 0.70,
            output_fraction_max: 1.00,
            map_filter_alpha: 0.15,
            atmospheric_pressure_bar: 1.013,

            // Current sensing
            acs772_sensitivity_v_per_a: 0.040,
            acs772_zero_current_v: 0.6,
            current_max_valid_a: 50.0,
            current_filter_alpha: 0.25,
            current_oversample_count: 4,
            current_oversample_delay_us: 100,

            // Voltage sensing
            voltage_divider_ratio: 0.0909,
            voltage_filter_alpha: 1.0,
            voltage_min_valid_v: 7.0,
            voltage_max_valid_v: 16.0,

            // Voltage protection
            voltage_drop_warning_pct: 0.30,
            voltage_drop_critical_pct: 0.50,
            voltage_hysteresis_v: 0.5,
            baseline_alpha: 0.01,
            baseline_min_v: 10.0,
            baseline_max_v: 15.0,

            // Current protection
            current_threshold_warning_a: 25.0,
            current_threshold_high_a: 30.0,
            current_threshold_critical_a: 35.0,
            current_threshold_fault_a: 40.0,
            current_emergency_ceiling_a: 45.0,
            current_hysteresis_a: 2.0,

            // Actuation
            // 0.05/cycle at 20 Hz sweeps the full range in one second.
            output_rate_max_per_cycle: 0.05,
            fault_minimum_fraction: 0.50,
            safety_input_active_low: true,

            // ADC
            adc_reference_v: 5.0,

            // Timing
            control_loop_interval_ms: 50, // 20 Hz
            status_report_interval_ms: 1000,
        }
    }
}
