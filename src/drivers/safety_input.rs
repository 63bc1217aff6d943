//! External safety input: a polled digital line (inertia switch, kill
//! switch, or an upstream controller's output-enable).
//!
//! Polarity is configurable; the default wiring pulls the line up and
//! a closed switch grounds it, so active-low means "low = cut power".

use crate::config::SystemConfig;
use crate::drivers::hw;
use crate::pins;

pub struct SafetyInput {
    active_low: bool,
}

impl SafetyInput {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            active_low: config.safety_input_active_low,
        }
    }

    /// True while the line demands the outputs be cut.
    pub fn engaged(&self) -> bool {
        let level = hw::gpio_read(pins::SAFETY_INPUT_GPIO);
        if self.active_low { !level } else { level }
    }
}
