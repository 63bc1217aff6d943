//! Actuation blender: folds the pressure-derived target, every
//! protection limit, the external safety input, and slew limiting into
//! one output fraction per tick.
//!
//! Priority order, highest first:
//!
//! 1. external safety engaged → output 0 this very tick;
//! 2. emergency active → jump to the limited target immediately, no
//!    slew (waiting out a ramp during a hard over-current is wrong);
//! 3. otherwise slew-limit toward `target × min(limits)`, then clamp
//!    to `[floor, 1]`.
//!
//! The floor keeps a fault-class response from silencing the pump
//! outright; it is zero only in normal operation, under external
//! safety, or in a shutdown-enabled emergency.

use crate::config::SystemConfig;

/// Snap distance: closer than this to the target, stop ramping.
const SLEW_SNAP: f32 = 0.001;

/// Final command for one control tick, as handed to the actuator port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorCommand {
    /// Duty fraction to drive, 0.0..=1.0.
    pub output_fraction: f32,
    /// Pressure-derived target before limiting.
    pub target_fraction: f32,
    /// Most restrictive protection limit this tick.
    pub effective_limit: f32,
    /// True when slew limiting was bypassed (safety cut or emergency).
    pub bypassed_slew: bool,
}

impl ActuatorCommand {
    /// All-stop command; also the pre-first-tick state.
    pub fn off() -> Self {
        Self {
            output_fraction: 0.0,
            target_fraction: 0.0,
            effective_limit: 1.0,
            bypassed_slew: true,
        }
    }
}

pub struct ActuationBlender {
    max_step: f32,
    previous: f32,
}

impl ActuationBlender {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            max_step: config.output_rate_max_per_cycle,
            previous: 0.0,
        }
    }

    /// Blend one tick. `limits` carries every active protection limit
    /// factor; `floor` is the minimum fraction the caller demands (0 in
    /// normal operation).
    pub fn blend(
        &mut self,
        target: f32,
        limits: &[f32],
        floor: f32,
        safety_engaged: bool,
        emergency: bool,
    ) -> ActuatorCommand {
        let effective_limit = limits.iter().copied().fold(1.0_f32, f32::min).clamp(0.0, 1.0);
        let raw = (target * effective_limit).clamp(0.0, 1.0);

        let (output, bypassed) = if safety_engaged {
            (0.0, true)
        } else if emergency {
            (raw.max(floor), true)
        } else {
            (self.slew(raw).clamp(floor, 1.0), false)
        };

        self.previous = output;
        ActuatorCommand {
            output_fraction: output,
            target_fraction: target,
            effective_limit,
            bypassed_slew: bypassed,
        }
    }

    fn slew(&self, raw: f32) -> f32 {
        let delta = raw - self.previous;
        if delta.abs() < SLEW_SNAP {
            raw
        } else {
            self.previous + delta.clamp(-self.max_step, self.max_step)
        }
    }

    pub fn previous(&self) -> f32 {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blender() -> ActuationBlender {
        ActuationBlender::new(&SystemConfig::default())
    }

    #[test]
    fn ramps_toward_target_at_rate_limit() {
        let mut b = blender();
        let c = b.blend(0.70, &[1.0, 1.0], 0.0, false, false);
        assert!((c.output_fraction - 0.05).abs() < f32::EPSILON);

        let c = b.blend(0.70, &[1.0, 1.0], 0.0, false, false);
        assert!((c.output_fraction - 0.10).abs() < f32::EPSILON);
    }

    #[test]
    fn settles_exactly_on_target() {
        let mut b = blender();
        for _ in 0..40 {
            b.blend(0.70, &[1.0], 0.0, false, false);
        }
        let c = b.blend(0.70, &[1.0], 0.0, false, false);
        assert!((c.output_fraction - 0.70).abs() < f32::EPSILON);
    }

    #[test]
    fn most_restrictive_limit_wins() {
        let mut b = blender();
        let c = b.blend(1.0, &[0.85, 0.60, 1.0], 0.0, false, false);
        assert!((c.effective_limit - 0.60).abs() < f32::EPSILON);
    }

    #[test]
    fn safety_cut_is_immediate() {
        let mut b = blender();
        for _ in 0..40 {
            b.blend(1.0, &[1.0], 0.0, false, false);
        }
        assert!(b.previous() > 0.9);

        let c = b.blend(1.0, &[1.0], 0.0, true, false);
        assert!((c.output_fraction - 0.0).abs() < f32::EPSILON);
        assert!(c.bypassed_slew);
    }

    #[test]
    fn safety_cut_beats_fault_floor() {
        let mut b = blender();
        let c = b.blend(1.0, &[0.5], 0.5, true, false);
        assert!((c.output_fraction - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn emergency_bypasses_slew() {
        let mut b = blender();
        for _ in 0..40 {
            b.blend(1.0, &[1.0], 0.0, false, false);
        }
        // Emergency with a 0.5 limit lands on 0.5 in one tick, not 0.05
        // steps.
        let c = b.blend(1.0, &[0.5], 0.5, false, true);
        assert!((c.output_fraction - 0.5).abs() < f32::EPSILON);
        assert!(c.bypassed_slew);
    }

    #[test]
    fn emergency_shutdown_reaches_zero() {
        let mut b = blender();
        for _ in 0..40 {
            b.blend(1.0, &[1.0], 0.0, false, false);
        }
        let c = b.blend(1.0, &[0.0], 0.0, false, true);
        assert!((c.output_fraction - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fault_floor_holds_output_up() {
        let mut b = blender();
        for _ in 0..40 {
            b.blend(1.0, &[1.0], 0.0, false, false);
        }
        // Target drops to near-zero under a fault floor of 0.5: the
        // output ramps down but never below the floor.
        for _ in 0..40 {
            let c = b.blend(0.05, &[0.5], 0.5, false, false);
            assert!(c.output_fraction >= 0.5);
        }
        assert!((b.previous() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn recovery_from_cut_ramps_back_up() {
        let mut b = blender();
        b.blend(1.0, &[1.0], 0.0, true, false);
        assert!((b.previous() - 0.0).abs() < f32::EPSILON);

        let c = b.blend(1.0, &[1.0], 0.0, false, false);
        assert!((c.output_fraction - 0.05).abs() < f32::EPSILON);
        assert!(!c.bypassed_slew);
    }

    #[test]
    fn output_always_in_unit_range() {
        let mut b = blender();
        for i in 0..200 {
            let target = (i as f32 * 0.37).sin().abs() * 1.5;
            let limit = (i as f32 * 0.13).cos().abs();
            let c = b.blend(target, &[limit], 0.0, i % 17 == 0, i % 23 == 0);
            assert!((0.0..=1.0).contains(&c.output_fraction));
        }
    }
}
