//! Stick physics
//!
//! An inverted pendulum: upright is an unstable equilibrium, so once the
//! stick leans, gravity keeps pulling it further over. All quantities are per
//! fixed tick.

use super::state::{Environment, Stick};
use crate::consts::{FALL_MAX_ANGLE, FALL_MIN_ANGLE, STICK_UPRIGHT};
use crate::tuning::Tuning;

/// Advance the stick by one tick.
///
/// Wind and gravity are skipped during the grace period; damping never is.
pub fn integrate(stick: &mut Stick, env: &Environment, in_grace_period: bool, tuning: &Tuning) {
    if !in_grace_period {
        stick.angular_vel += env.wind_strength * env.wind_direction;
        stick.angular_vel += tuning.gravity * (stick.angle - STICK_UPRIGHT).sin();
    }

    stick.angular_vel *= tuning.damping;
    stick.angle += stick.angular_vel;
}

/// Impulse from the player sliding the disc by `dx` pixels
pub fn counterbalance(stick: &mut Stick, dx: f32, friction: f32, tuning: &Tuning) {
    stick.angular_vel += dx * tuning.counterbalance_gain * friction;
}

/// Stick is past either fall threshold
pub fn has_fallen(stick: &Stick) -> bool {
    stick.angle < FALL_MIN_ANGLE || stick.angle > FALL_MAX_ANGLE
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_upright_is_equilibrium() {
        let tuning = Tuning::default();
        let env = Environment::default();
        let mut stick = Stick::default();

        for _ in 0..600 {
            integrate(&mut stick, &env, false, &tuning);
        }
        assert_eq!(stick.angle, STICK_UPRIGHT);
        assert_eq!(stick.angular_vel, 0.0);
    }

    #[test]
    fn test_gravity_increases_lean() {
        let tuning = Tuning::default();
        let env = Environment::default();
        let mut stick = Stick {
            angle: STICK_UPRIGHT + 0.05,
            angular_vel: 0.0,
        };

        integrate(&mut stick, &env, false, &tuning);
        assert!(stick.angular_vel > 0.0);
        assert!(stick.angle > STICK_UPRIGHT + 0.05);
    }

    #[test]
    fn test_grace_period_suspends_wind_and_gravity() {
        let tuning = Tuning::default();
        let env = Environment {
            wind_strength: 0.003,
            ..Default::default()
        };
        let mut stick = Stick {
            angle: STICK_UPRIGHT + 0.3,
            angular_vel: 0.01,
        };

        integrate(&mut stick, &env, true, &tuning);
        // Only damping touched the velocity
        assert!((stick.angular_vel - 0.01 * 0.995).abs() < 1e-7);
    }

    #[test]
    fn test_wind_pushes_along_direction() {
        let tuning = Tuning::default();
        let env = Environment {
            wind_strength: 0.002,
            wind_direction: -1.0,
            ..Default::default()
        };
        let mut stick = Stick::default();

        integrate(&mut stick, &env, false, &tuning);
        assert!((stick.angular_vel - (-0.002 * 0.995)).abs() < 1e-7);
    }

    #[test]
    fn test_counterbalance_scaled_by_friction() {
        let tuning = Tuning::default();
        let mut clear = Stick::default();
        let mut snow = Stick::default();

        counterbalance(&mut clear, 10.0, 1.0, &tuning);
        counterbalance(&mut snow, 10.0, 0.95, &tuning);

        assert!((clear.angular_vel - 0.003).abs() < 1e-7);
        assert!(snow.angular_vel < clear.angular_vel);
    }

    #[test]
    fn test_fall_thresholds() {
        let at = |angle| Stick {
            angle,
            angular_vel: 0.0,
        };
        assert!(!has_fallen(&at(STICK_UPRIGHT)));
        assert!(!has_fallen(&at(FALL_MIN_ANGLE)));
        assert!(has_fallen(&at(FALL_MIN_ANGLE - 0.01)));
        assert!(has_fallen(&at(FALL_MAX_ANGLE + 0.01)));
    }

    proptest! {
        #[test]
        fn prop_damping_decays_monotonically(vel in -0.5f32..0.5) {
            let tuning = Tuning { gravity: 0.0, ..Default::default() };
            let env = Environment::default();
            let mut stick = Stick { angle: STICK_UPRIGHT, angular_vel: vel };

            let mut previous = stick.angular_vel.abs();
            for _ in 0..500 {
                integrate(&mut stick, &env, false, &tuning);
                let current = stick.angular_vel.abs();
                prop_assert!(current <= previous);
                previous = current;
            }
            prop_assert!(previous <= vel.abs() * 0.995f32.powi(400));
        }
    }
}
