//! Hierarchical transform composition.
//!
//! Every frame each body turns its [`OrbitalParameters`] and the current
//! simulation time into two matrices:
//!
//! ```text
//! non_spin = parent_non_spin * R_up(t * orbit_speed) * T(offset) * R_up(tilt)
//! spin     = non_spin * R_up(t * spin_speed) * S(scale)
//! ```
//!
//! Children only ever read `non_spin`, so a moon follows its planet around
//! the star without turning with the planet's day. Scale comes last so
//! orbit radius and tilt stay in unscaled units.
//!
//! Time is `f64`. Each angle is wrapped into `[0, 2π)` before it is
//! narrowed to `f32` for glam, so orbits stay smooth at large `t`.

use std::f64::consts::TAU;

use glam::{Mat4, Vec3};

use crate::body::OrbitalParameters;

/// Axis of orbit revolution, tilt and spin.
pub const UP: Vec3 = Vec3::Y;

/// The pair of matrices computed for a body each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transforms {
    /// Placement excluding spin and scale. Read by dependent bodies.
    pub non_spin: Mat4,
    /// `non_spin` with spin and scale applied. Submitted for rendering.
    pub spin: Mat4,
}

impl Transforms {
    pub const IDENTITY: Self = Self {
        non_spin: Mat4::IDENTITY,
        spin: Mat4::IDENTITY,
    };

    /// World-space centre of the body.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.non_spin.w_axis.truncate()
    }
}

impl Default for Transforms {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotation angle after `t` seconds at `speed` radians per second.
#[inline]
pub fn angle_at(t: f64, speed: f32) -> f32 {
    (t * f64::from(speed)).rem_euclid(TAU) as f32
}

/// Placement of a body relative to its pivot at time `t`.
///
/// A stationary body skips the revolution entirely and sits at its offset.
pub fn placement(orbit: &OrbitalParameters, t: f64) -> Mat4 {
    let base = Mat4::from_translation(orbit.local_offset) * Mat4::from_axis_angle(UP, orbit.axial_tilt);
    if orbit.is_stationary() {
        base
    } else {
        Mat4::from_axis_angle(UP, angle_at(t, orbit.orbit_speed)) * base
    }
}

/// Compute both transforms of a body at simulation time `t`.
///
/// `parent_non_spin` must be the parent's non-spin matrix for the same
/// frame; pass `None` for bodies pivoting on the world origin.
pub fn compose(orbit: &OrbitalParameters, t: f64, parent_non_spin: Option<&Mat4>) -> Transforms {
    let local = placement(orbit, t);
    let non_spin = match parent_non_spin {
        Some(parent) => *parent * local,
        None => local,
    };
    let spin = non_spin * Mat4::from_axis_angle(UP, angle_at(t, orbit.spin_speed)) * Mat4::from_scale(orbit.scale);

    Transforms { non_spin, spin }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-4;

    fn earth() -> OrbitalParameters {
        OrbitalParameters::circular(60.0, 0.5)
            .with_spin(0.7)
            .with_tilt(23.5_f32.to_radians())
    }

    #[test]
    fn test_regression_half_turn() {
        let orbit = OrbitalParameters::circular(10.0, PI);
        let transforms = compose(&orbit, 1.0, None);
        assert!(transforms.position().abs_diff_eq(Vec3::new(-10.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn test_stationary_is_time_invariant() {
        let orbit = OrbitalParameters {
            local_offset: Vec3::new(3.0, 1.0, -2.0),
            axial_tilt: 0.4,
            spin_speed: 1.3,
            ..OrbitalParameters::STATIONARY
        };
        let at_zero = compose(&orbit, 0.0, None).non_spin;
        for t in [0.5, 17.0, 1234.5] {
            assert!(compose(&orbit, t, None).non_spin.abs_diff_eq(at_zero, EPS));
        }
    }

    #[test]
    fn test_orbit_is_periodic() {
        let orbit = earth();
        let period = TAU / f64::from(orbit.orbit_speed);
        let a = compose(&orbit, 2.3, None).position();
        let b = compose(&orbit, 2.3 + period, None).position();
        assert!(a.abs_diff_eq(b, 1e-3));
    }

    #[test]
    fn test_orbit_is_smooth_at_large_t() {
        let orbit = OrbitalParameters::circular(10.0, 1.0);
        let t = 6.0e5;
        let a = compose(&orbit, t, None).position();
        let b = compose(&orbit, t + 0.01, None).position();
        // One hundredth of a second moves the body about 0.1 units.
        let step = a.distance(b);
        assert!((step - 0.1).abs() < 1e-3, "step {step}");
    }

    #[test]
    fn test_angle_wraps() {
        assert!((angle_at(1.0, PI) - PI).abs() < 1e-6);
        assert!(angle_at(1.0e9, 3.0) <= std::f32::consts::TAU);
        assert!(angle_at(1.0e9, -3.0) >= 0.0);
        assert_eq!(angle_at(123.0, 0.0), 0.0);
    }

    #[test]
    fn test_orbit_radius_is_preserved() {
        let orbit = earth();
        for t in [0.0, 1.0, 2.5, 9.0] {
            let distance = compose(&orbit, t, None).position().length();
            assert!((distance - 60.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_scale_does_not_move_centre() {
        let small = earth().with_uniform_scale(1.0);
        let large = earth().with_uniform_scale(4.0);
        let a = compose(&small, 3.0, None);
        let b = compose(&large, 3.0, None);

        assert!(a.spin.w_axis.abs_diff_eq(b.spin.w_axis, EPS));
        assert!(a.non_spin.abs_diff_eq(b.non_spin, EPS));

        let len_a = a.spin.x_axis.truncate().length();
        let len_b = b.spin.x_axis.truncate().length();
        assert!((len_b / len_a - 4.0).abs() < EPS);
    }

    #[test]
    fn test_spin_is_not_in_non_spin() {
        let still = earth().with_spin(0.0);
        let spinning = earth().with_spin(5.0);
        let a = compose(&still, 1.7, None);
        let b = compose(&spinning, 1.7, None);

        assert!(a.non_spin.abs_diff_eq(b.non_spin, EPS));
        assert!(!a.spin.abs_diff_eq(b.spin, EPS));
    }

    #[test]
    fn test_zero_scale_is_finite() {
        let orbit = earth().with_uniform_scale(0.0);
        let transforms = compose(&orbit, 1.0, None);
        assert!(transforms.spin.is_finite());
        assert!(transforms.non_spin.is_finite());
    }

    #[test]
    fn test_parent_is_premultiplied() {
        let parent = compose(&earth(), 2.0, None);
        let moon = OrbitalParameters::circular(3.0, 5.0).with_uniform_scale(0.1);
        let child = compose(&moon, 2.0, Some(&parent.non_spin));

        let expected = parent.non_spin * placement(&moon, 2.0);
        assert!(child.non_spin.abs_diff_eq(expected, EPS));

        let distance = child.position().distance(parent.position());
        assert!((distance - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_identity_parent_is_noop() {
        let moon = OrbitalParameters::circular(2.0, PI);
        let with_parent = compose(&moon, 1.0, Some(&Mat4::IDENTITY));
        let without = compose(&moon, 1.0, None);
        assert!(with_parent.spin.abs_diff_eq(without.spin, EPS));
        assert!(with_parent.position().abs_diff_eq(Vec3::new(-2.0, 0.0, 0.0), EPS));
    }
}
