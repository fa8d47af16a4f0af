//! The motion model: pure functions from (dot, elapsed time, regime) to a
//! canvas position and a rendered radius.
//!
//! Both regimes are stateless (no velocity, no integration), so any time
//! can be evaluated in any order: the same inputs always produce the same
//! output, and seeking/scrubbing is free.

use glam::DVec2;

use crate::dot::Dot;

/// Rendered dot radius never drops below one pixel.
const MIN_DOT_SIZE: f64 = 1.0;
/// Scale of the decaying assembly wobble.
const DRIFT_GAIN: f64 = 0.6;

/// Which of the two motion curves is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Dots interpolate from `start` to `end` with decaying wobble.
    Assembling,
    /// Dots orbit their `start` anchor on an elliptical path.
    Scattered,
}

impl Regime {
    /// The other regime.
    pub fn flipped(self) -> Self {
        match self {
            Regime::Assembling => Regime::Scattered,
            Regime::Scattered => Regime::Assembling,
        }
    }

    /// True for [`Regime::Assembling`].
    pub fn is_assembling(self) -> bool {
        matches!(self, Regime::Assembling)
    }
}

#[inline]
fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    let x = clamp01(t);
    x * x * (3.0 - 2.0 * x)
}

/// Current canvas position of a dot.
///
/// Assembling: double-smoothstep interpolation from `start` to `end` plus a
/// wobble that peaks at departure and vanishes as the dot settles.
/// Scattered: an elliptical Lissajous-like orbit around the `start` anchor,
/// phase-shifted per dot by `delay` and `angle`.
pub fn position(d: &Dot, elapsed: f64, regime: Regime, assemble_time: f64) -> DVec2 {
    match regime {
        Regime::Assembling => {
            let t = clamp01((elapsed - d.delay) / assemble_time);
            let k = smoothstep(smoothstep(t));
            let drift = (1.0 - k) * (1.0 - k) * d.sway * DRIFT_GAIN;
            let base = d.start.lerp(d.end, k);
            DVec2::new(
                base.x + (d.angle + k * 6.0).sin() * drift,
                base.y + (d.angle * 0.8 + k * 5.0).cos() * drift * 0.6,
            )
        }
        Regime::Scattered => {
            let tt = elapsed + d.delay;
            d.start
                + DVec2::new(
                    (d.angle + tt * d.speed).cos() * d.orbit,
                    (d.angle * 0.8 + tt * d.speed * 1.2).sin() * d.orbit,
                )
        }
    }
}

/// Current rendered radius of a dot: the base size under a gentle pulse
/// (assembling) or breath (scattered), floored at one pixel.
pub fn size(d: &Dot, elapsed: f64, regime: Regime) -> f64 {
    let multiplier = match regime {
        Regime::Assembling => {
            0.96 + 0.04 * (0.5 + 0.5 * ((elapsed + d.delay) * 0.8).sin())
        }
        Regime::Scattered => {
            let tt = elapsed + d.delay;
            0.9 + 0.1 * (0.5 + 0.5 * (tt * (0.6 + d.speed)).sin())
        }
    };
    (d.base_size * multiplier).max(MIN_DOT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stipple_core::color::Rgb;

    const ASSEMBLE_TIME: f64 = 2.4;

    fn dot() -> Dot {
        Dot {
            start: DVec2::new(100.0, 200.0),
            end: DVec2::new(400.0, 120.0),
            base_size: 2.0,
            delay: 0.35,
            color: Rgb {
                r: 0.8,
                g: 0.4,
                b: 0.2,
            },
            sway: 6.0,
            angle: 1.2,
            speed: 0.4,
            orbit: 40.0,
        }
    }

    // -- Regime --

    #[test]
    fn flipped_swaps_regimes() {
        assert_eq!(Regime::Assembling.flipped(), Regime::Scattered);
        assert_eq!(Regime::Scattered.flipped(), Regime::Assembling);
        assert_eq!(Regime::Assembling.flipped().flipped(), Regime::Assembling);
    }

    // -- Assembling positions --

    #[test]
    fn assembling_starts_exactly_at_start_when_sway_is_zero() {
        let d = Dot { sway: 0.0, ..dot() };
        // elapsed == delay means t = 0, k = 0, and the wobble term is zeroed
        // by sway, so the position is the interpolation origin bit for bit.
        let p = position(&d, d.delay, Regime::Assembling, ASSEMBLE_TIME);
        assert_eq!(p, d.start);
    }

    #[test]
    fn assembling_before_delay_holds_at_start() {
        let d = Dot { sway: 0.0, ..dot() };
        let p = position(&d, 0.0, Regime::Assembling, ASSEMBLE_TIME);
        assert_eq!(p, d.start);
    }

    #[test]
    fn assembling_converges_to_end() {
        let d = dot();
        // Past delay + assemble_time: k = 1, drift = 0, wobble gone.
        let p = position(
            &d,
            d.delay + ASSEMBLE_TIME + 0.01,
            Regime::Assembling,
            ASSEMBLE_TIME,
        );
        assert!(
            p.distance(d.end) < 1e-9,
            "position {p} did not converge to end {}",
            d.end
        );
    }

    #[test]
    fn assembling_midway_is_strictly_between_endpoints_plus_wobble() {
        let d = dot();
        let p = position(
            &d,
            d.delay + ASSEMBLE_TIME / 2.0,
            Regime::Assembling,
            ASSEMBLE_TIME,
        );
        // Midway k = 0.5, so drift = 0.25 * sway * 0.6 bounds each axis.
        let drift = 0.25 * d.sway * 0.6;
        let midpoint = d.start.lerp(d.end, 0.5);
        let offset = p - midpoint;
        assert!(offset.x.abs() <= drift + 1e-9, "x wobble {}", offset.x);
        assert!(offset.y.abs() <= drift * 0.6 + 1e-9, "y wobble {}", offset.y);
    }

    #[test]
    fn assembling_wobble_peaks_at_departure() {
        let d = dot();
        let at_departure = position(&d, d.delay, Regime::Assembling, ASSEMBLE_TIME);
        // With full sway the departure position is start plus the wobble
        // offset at k = 0: (sin(angle) * drift, cos(0.8 angle) * drift * 0.6).
        let drift = d.sway * 0.6;
        let expected = d.start
            + DVec2::new(
                d.angle.sin() * drift,
                (d.angle * 0.8).cos() * drift * 0.6,
            );
        assert!(at_departure.distance(expected) < 1e-12);
    }

    // -- Scattered positions --

    #[test]
    fn scattered_orbit_stays_within_orbit_radius_box() {
        let d = dot();
        for i in 0..200 {
            let t = i as f64 * 0.13;
            let p = position(&d, t, Regime::Scattered, ASSEMBLE_TIME);
            let offset = p - d.start;
            assert!(offset.x.abs() <= d.orbit + 1e-9, "x offset {}", offset.x);
            assert!(offset.y.abs() <= d.orbit + 1e-9, "y offset {}", offset.y);
        }
    }

    #[test]
    fn scattered_orbit_actually_moves() {
        let d = dot();
        let a = position(&d, 0.0, Regime::Scattered, ASSEMBLE_TIME);
        let b = position(&d, 1.0, Regime::Scattered, ASSEMBLE_TIME);
        assert!(a.distance(b) > 1.0, "orbit barely moved: {a} -> {b}");
    }

    // -- Statelessness --

    #[test]
    fn evaluation_order_does_not_matter() {
        let d = dot();
        let late = position(&d, 5.0, Regime::Scattered, ASSEMBLE_TIME);
        let _early = position(&d, 1.0, Regime::Scattered, ASSEMBLE_TIME);
        let late_again = position(&d, 5.0, Regime::Scattered, ASSEMBLE_TIME);
        assert_eq!(late, late_again);
    }

    // -- Sizes --

    #[test]
    fn size_is_floored_at_one_pixel_for_tiny_dots() {
        let d = Dot {
            base_size: 0.4,
            ..dot()
        };
        for i in 0..100 {
            let t = i as f64 * 0.37;
            assert_eq!(size(&d, t, Regime::Assembling), 1.0);
            assert_eq!(size(&d, t, Regime::Scattered), 1.0);
        }
    }

    #[test]
    fn assembling_size_pulses_within_four_percent() {
        let d = dot();
        for i in 0..200 {
            let t = i as f64 * 0.11;
            let s = size(&d, t, Regime::Assembling);
            assert!(
                (d.base_size * 0.96..=d.base_size).contains(&s),
                "size {s} outside pulse band at t={t}"
            );
        }
    }

    #[test]
    fn scattered_size_breathes_within_ten_percent() {
        let d = dot();
        for i in 0..200 {
            let t = i as f64 * 0.11;
            let s = size(&d, t, Regime::Scattered);
            assert!(
                (d.base_size * 0.9..=d.base_size).contains(&s),
                "size {s} outside breath band at t={t}"
            );
        }
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn size_never_drops_below_the_floor(
                base_size in 0.0_f64..10.0,
                delay in 0.0_f64..1.0,
                speed in 0.22_f64..0.55,
                elapsed in -100.0_f64..1000.0,
            ) {
                let d = Dot { base_size, delay, speed, ..dot() };
                prop_assert!(size(&d, elapsed, Regime::Assembling) >= 1.0);
                prop_assert!(size(&d, elapsed, Regime::Scattered) >= 1.0);
            }

            #[test]
            fn assembling_position_is_finite_for_any_time(
                elapsed in -100.0_f64..1000.0,
                sway in 3.0_f64..9.0,
            ) {
                let d = Dot { sway, ..dot() };
                let p = position(&d, elapsed, Regime::Assembling, ASSEMBLE_TIME);
                prop_assert!(p.is_finite(), "non-finite position {p}");
            }

            #[test]
            fn scattered_position_never_leaves_the_orbit_box(
                elapsed in -100.0_f64..1000.0,
                orbit in 1.0_f64..200.0,
            ) {
                let d = Dot { orbit, ..dot() };
                let offset = position(&d, elapsed, Regime::Scattered, ASSEMBLE_TIME) - d.start;
                prop_assert!(offset.x.abs() <= orbit + 1e-9);
                prop_assert!(offset.y.abs() <= orbit + 1e-9);
            }
        }
    }
}
