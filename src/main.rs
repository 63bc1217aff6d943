//! PumpGuard firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  HubSensors      PumpActuator    GpioSafety              │
//! │  (SensorPort)    (ActuatorPort)  (SafetyInputPort)       │
//! │  LogEventSink    MonotonicTime                           │
//! │  (DiagnosticsSink)                                       │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ──────────────        │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │           PumpService (pure logic)             │      │
//! │  │  Protection ladders · Setpoint · Blender       │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::{error, info};

use pumpguard::adapters::{GpioSafety, HubSensors, LogEventSink, MonotonicTime, PumpActuator};
use pumpguard::app::PumpService;
use pumpguard::config::SystemConfig;
use pumpguard::drivers::hw;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("PumpGuard v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripheral init ────────────────────────────────────
    if let Err(e) = hw::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let config = SystemConfig::default();

    // ── 3. Construct adapters + service ───────────────────────
    let sensors = HubSensors::new(&config);
    let actuator = PumpActuator::new();
    let safety = GpioSafety::new(&config);
    let sink = LogEventSink::new();
    let time = MonotonicTime::new();

    let mut service = PumpService::new(&config, sensors, actuator, safety, sink);

    info!(
        "System ready. Control loop at {} ms, status every {} ms.",
        config.control_loop_interval_ms, config.status_report_interval_ms
    );

    // ── 4. Control loop ───────────────────────────────────────
    let mut last_report_ms = time.now_ms();

    loop {
        let now_ms = time.now_ms();

        if let Err(e) = service.tick(now_ms) {
            // A failed actuator write leaves the previous duty on the
            // pins; keep looping so protection stays live.
            error!("tick failed: {}", e);
        }

        if now_ms.wrapping_sub(last_report_ms) >= config.status_report_interval_ms {
            info!("{}", service.status());
            last_report_ms = now_ms;
        }

        FreeRtos::delay_ms(config.control_loop_interval_ms);
    }
}
