//! Pressure-derived output setpoint.
//!
//! Maps manifold pressure to a target output fraction with a clamped
//! piecewise-linear curve: flat at the minimum below the low setpoint,
//! flat at the maximum above the high setpoint, linear in between. More
//! boost means more heat to move, so the pump tracks pressure directly.

use crate::config::SystemConfig;

pub struct SetpointMapper {
    low_bar: f32,
    high_bar: f32,
    min_fraction: f32,
    max_fraction: f32,
}

impl SetpointMapper {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            low_bar: config.map_low_setpoint_bar,
            high_bar: config.map_high_setpoint_bar,
            min_fraction: config.output_fraction_min,
            max_fraction: config.output_fraction_max,
        }
    }

    /// Target output fraction for the given gauge pressure. An invalid
    /// pressure channel falls back to the maximum: overcooling is the
    /// safe failure direction.
    pub fn target(&self, pressure_bar: f32, valid: bool) -> f32 {
        if !valid {
            return self.max_fraction;
        }
        if pressure_bar <= self.low_bar {
            return self.min_fraction;
        }
        if pressure_bar >= self.high_bar {
            return self.max_fraction;
        }
        let t = (pressure_bar - self.low_bar) / (self.high_bar - self.low_bar);
        self.min_fraction + t * (self.max_fraction - self.min_fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> SetpointMapper {
        SetpointMapper::new(&SystemConfig::default())
    }

    #[test]
    fn idle_vacuum_commands_minimum() {
        let m = mapper();
        assert!((m.target(-0.5, true) - 0.70).abs() < f32::EPSILON);
        assert!((m.target(0.0, true) - 0.70).abs() < f32::EPSILON);
        assert!((m.target(0.2, true) - 0.70).abs() < f32::EPSILON);
    }

    #[test]
    fn full_boost_commands_maximum() {
        let m = mapper();
        assert!((m.target(0.4, true) - 1.00).abs() < f32::EPSILON);
        assert!((m.target(1.5, true) - 1.00).abs() < f32::EPSILON);
    }

    #[test]
    fn midpoint_interpolates() {
        let m = mapper();
        let mid = m.target(0.3, true);
        assert!((mid - 0.85).abs() < 0.001, "expected 0.85, got {mid}");
    }

    #[test]
    fn invalid_pressure_falls_back_to_maximum() {
        let m = mapper();
        assert!((m.target(0.0, false) - 1.00).abs() < f32::EPSILON);
    }

    #[test]
    fn output_is_monotonic_in_pressure() {
        let m = mapper();
        let mut prev = m.target(-1.0, true);
        for i in 0..=100 {
            let p = -1.0 + i as f32 * 0.05;
            let t = m.target(p, true);
            assert!(t >= prev);
            prev = t;
        }
    }
}
