//! One-shot peripheral setup and raw hardware access.
//!
//! Configures ADC channels, GPIO directions, and the LEDC PWM timer
//! using raw ESP-IDF sys calls, then exposes thin read/write helpers.
//! Called once from `main()` before the control loop starts.
//!
//! ## Dual-target design
//!
//! On ESP-IDF the helpers touch real registers. On the host they read
//! and write process-local atomics so tests can inject raw samples with
//! `sim_set_adc` / `sim_set_gpio` and observe duty writes with
//! `sim_last_duty`.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed,
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed => write!(f, "LEDC timer/channel config failed"),
        }
    }
}

// ── Init ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_ledc()?;
    }
    info!("hw: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for channel in [
        pins::MAP_ADC_CH,
        pins::CURRENT_1_ADC_CH,
        pins::CURRENT_2_ADC_CH,
        pins::VCC_SENSE_ADC_CH,
    ] {
        // SAFETY: handle initialised above; init path is single-threaded.
        let ret = unsafe { adc_oneshot_config_channel(ADC1_HANDLE, channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }

    info!("hw: ADC1 configured (MAP, current x2, vcc sense)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: ADC1_HANDLE is written once during init_adc() before this is
    // called; single-threaded main-loop access guaranteed.
    let ret = unsafe { adc_oneshot_read(ADC1_HANDLE, channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::SAFETY_INPUT_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: boot-time configuration of a dedicated input pin.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    info!("hw: safety input configured (GPIO{})", pins::SAFETY_INPUT_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // One shared timer for both pump channels.
    // SAFETY: called from the single main-task init path.
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::PUMP_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    if unsafe { ledc_timer_config(&timer) } != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed);
    }

    for (channel, gpio) in [
        (pins::LEDC_CH_PUMP_1, pins::PUMP_PWM_1_GPIO),
        (pins::LEDC_CH_PUMP_2, pins::PUMP_PWM_2_GPIO),
    ] {
        let cfg = ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: gpio,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        if unsafe { ledc_channel_config(&cfg) } != ESP_OK as i32 {
            return Err(HwInitError::LedcInitFailed);
        }
    }

    info!("hw: LEDC configured (pump outputs CH0/CH1 @ 25 kHz)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Busy-wait for the fixed inter-sample oversampling delay. Bounded and
/// deterministic; the only place the control loop is allowed to stall.
#[cfg(target_os = "espidf")]
pub fn delay_us(us: u32) {
    // SAFETY: esp_rom_delay_us is a calibrated busy-wait, safe anywhere.
    unsafe { esp_rom_delay_us(us) };
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};

    // Wider than the physical unit so host tests can use scratch channels.
    const ADC_CHANNELS: usize = 16;
    const LEDC_CHANNELS: usize = 2;

    pub static ADC: [AtomicU16; ADC_CHANNELS] = [const { AtomicU16::new(0) }; ADC_CHANNELS];
    pub static GPIO: AtomicBool = AtomicBool::new(true);
    pub static DUTY: [AtomicU8; LEDC_CHANNELS] = [const { AtomicU8::new(0) }; LEDC_CHANNELS];

    pub fn adc_read(channel: u32) -> u16 {
        ADC.get(channel as usize)
            .map_or(0, |a| a.load(Ordering::Relaxed))
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> u16 {
    sim::adc_read(channel)
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    sim::GPIO.load(core::sync::atomic::Ordering::Relaxed)
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(channel: u32, duty: u8) {
    if let Some(d) = sim::DUTY.get(channel as usize) {
        d.store(duty, core::sync::atomic::Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_us(_us: u32) {}

/// Inject a raw ADC sample for `channel` (host/test only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: u32, raw: u16) {
    if let Some(a) = sim::ADC.get(channel as usize) {
        a.store(raw, core::sync::atomic::Ordering::Relaxed);
    }
}

/// Set the simulated level of every digital input (host/test only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gpio(high: bool) {
    sim::GPIO.store(high, core::sync::atomic::Ordering::Relaxed);
}

/// Last duty written to an LEDC channel (host/test only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_last_duty(channel: u32) -> u8 {
    sim::DUTY
        .get(channel as usize)
        .map_or(0, |d| d.load(core::sync::atomic::Ordering::Relaxed))
}
