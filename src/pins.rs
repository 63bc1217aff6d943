//! GPIO / ADC channel assignments for the pump controller board.
//!
//! Single source of truth — every driver references this module rather
//! than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// MPX5700AP absolute pressure sensor (MAP).
pub const MAP_ADC_CH: u32 = 4;
/// ACS772 hall-effect current sensor, channel 1.
pub const CURRENT_1_ADC_CH: u32 = 2;
/// ACS772 hall-effect current sensor, channel 2.
pub const CURRENT_2_ADC_CH: u32 = 3;
/// Supply voltage sense (10k/1k resistive divider).
pub const VCC_SENSE_ADC_CH: u32 = 5;

// ---------------------------------------------------------------------------
// Digital I/O
// ---------------------------------------------------------------------------

/// External safety input (active-low, external pull-up).
pub const SAFETY_INPUT_GPIO: i32 = 7;

/// Pump PWM output, channel 1 (SSR gate).
pub const PUMP_PWM_1_GPIO: i32 = 3;
/// Pump PWM output, channel 2 (SSR gate, mirrors channel 1).
pub const PUMP_PWM_2_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC duty resolution (bits). 8-bit gives 0–255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// Carrier frequency for the pump outputs. The carrier itself is an
/// actuator-driver concern; the control core only ever deals in duty
/// fractions.
pub const PUMP_PWM_FREQ_HZ: u32 = 25_000;

/// LEDC channels for the two pump outputs.
pub const LEDC_CH_PUMP_1: u32 = 0;
pub const LEDC_CH_PUMP_2: u32 = 1;
