//! Monotonic millisecond tick source.
//!
//! Ticks are `u32` and wrap (~49.7 days); every consumer computes
//! intervals with `wrapping_sub`, so the wrap is harmless. On the
//! target this reads the ESP high-resolution timer; on the host it
//! counts from process start.

pub struct MonotonicTime {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn now_ms(&self) -> u32 {
        // SAFETY: esp_timer_get_time reads a monotonic hardware counter.
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        (us / 1000) as u32
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}
