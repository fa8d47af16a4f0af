//! The dot population and its factory.
//!
//! A [`Dot`] carries two interpolation endpoints plus the fixed motion
//! parameters drawn at creation. The factory spawns one dot per sampled
//! target, with every random draw flowing through the caller's seeded
//! generator so a fixed seed reproduces the whole population.

use glam::DVec2;
use stipple_core::color::Rgb;
use stipple_core::prng::Xorshift64;

use crate::params::PortraitParams;

/// Scatter points live on a filled disk of this fraction of the canvas
/// half-minimum, centered on the canvas.
pub const SCATTER_RADIUS: f64 = 0.72;

/// Luminance scaling of the base size: darker dots render larger.
const SIZE_DARK_BASE: f64 = 0.9;
const SIZE_DARK_GAIN: f64 = 0.45;
/// Initial per-dot animation stagger, in seconds.
const DELAY_MAX: f64 = 1.0;
/// Assembly wobble amplitude range.
const SWAY_MIN: f64 = 3.0;
const SWAY_MAX: f64 = 9.0;
/// Orbit radius range as fractions of the canvas half-minimum.
const ORBIT_MIN: f64 = 0.12;
const ORBIT_MAX: f64 = 0.32;
/// Orbit angular speed range, in radians per second.
const SPEED_MIN: f64 = 0.22;
const SPEED_MAX: f64 = 0.55;

/// One particle of the portrait.
///
/// `start` and `end` are the only fields rewritten after creation (the
/// transition controller re-anchors them on every regime toggle, along with
/// a tighter `delay`); everything else persists for the dot's lifetime.
#[derive(Debug, Clone)]
pub struct Dot {
    /// Interpolation origin; also the orbit anchor in the scattered regime.
    pub start: DVec2,
    /// Interpolation destination.
    pub end: DVec2,
    /// Base radius in pixels, luminance-scaled at creation.
    pub base_size: f64,
    /// Animation phase offset in seconds.
    pub delay: f64,
    /// Fixed color, sampled and enhanced from the source image.
    pub color: Rgb,
    /// Assembly wobble amplitude.
    pub sway: f64,
    /// Seeds both the wobble phase and the orbit phase.
    pub angle: f64,
    /// Orbit angular speed.
    pub speed: f64,
    /// Orbit radius in pixels.
    pub orbit: f64,
}

/// Spawns one dot per target/color pair.
///
/// Each dot gets a fresh scatter point on the canvas disk; `assemble`
/// decides the orientation of the endpoints. A population born assembling
/// travels scatter to target; one born scattered anchors at its target and
/// drifts toward a scatter point on the next toggle.
pub fn spawn_population(
    targets: &[DVec2],
    colors: &[Rgb],
    canvas: DVec2,
    assemble: bool,
    params: &PortraitParams,
    rng: &mut Xorshift64,
) -> Vec<Dot> {
    let center = canvas * 0.5;
    let half_min = canvas.min_element() * 0.5;

    targets
        .iter()
        .zip(colors.iter())
        .map(|(&target, &color)| {
            let scatter = rng.next_disk(center, half_min * SCATTER_RADIUS);
            let base = rng.next_range(params.dot_size_min, params.dot_size_max);
            let k = SIZE_DARK_BASE + (1.0 - color.luminance()) * SIZE_DARK_GAIN;
            Dot {
                start: if assemble { scatter } else { target },
                end: if assemble { target } else { scatter },
                base_size: base * k,
                delay: rng.next_range(0.0, DELAY_MAX),
                color,
                sway: rng.next_range(SWAY_MIN, SWAY_MAX),
                angle: rng.next_angle(),
                speed: rng.next_range(SPEED_MIN, SPEED_MAX),
                orbit: rng.next_range(half_min * ORBIT_MIN, half_min * ORBIT_MAX),
            }
        })
        .collect()
}
