//! The portrait controller: one object owns the whole simulation state
//! (population, reference geometry, regime, clock) and exposes command
//! methods (`build`, `toggle`, the rebuild gate) for input handling plus
//! pure read methods for the renderer. There are no ambient globals and no
//! internal locking; all mutation happens on the caller's single update
//! context.

use glam::DVec2;
use log::debug;
use stipple_core::color::Rgb;
use stipple_core::prng::Xorshift64;

use crate::dot::{self, Dot, SCATTER_RADIUS};
use crate::motion::{self, Regime};
use crate::params::PortraitParams;
use crate::sampler::{self, RgbaFrame};

/// Glow halo radius as a multiple of the dot radius.
pub const GLOW_SCALE: f64 = 3.0;
/// Glow halo opacity.
pub const GLOW_OPACITY: f64 = 0.08;
/// Opacity of ambient-noise fallback dots.
pub const NOISE_OPACITY: f64 = 0.25;

/// Canvases thinner than this in either axis are rejected outright.
const MIN_CANVAS_SIDE: f64 = 2.0;
/// A rebuild is warranted once either axis moves by more than this.
const REBUILD_THRESHOLD: f64 = 1.0;
/// Delay stagger reassigned on toggle, tighter than at creation so
/// transitions feel snappy.
const TOGGLE_DELAY_MAX: f64 = 0.18;
/// One ambient-noise dot per this much canvas area.
const NOISE_AREA_PER_DOT: f64 = 4500.0;
/// Ambient-noise dot radius range.
const NOISE_SIZE_MIN: f64 = 0.6;
const NOISE_SIZE_MAX: f64 = 1.6;

/// One dot as the renderer should draw it this frame.
#[derive(Debug, Clone, Copy)]
pub struct DotSprite {
    pub position: DVec2,
    pub radius: f64,
    pub color: Rgb,
}

/// One dot of the ambient-noise fallback (drawn white at [`NOISE_OPACITY`]).
#[derive(Debug, Clone, Copy)]
pub struct NoiseDot {
    pub position: DVec2,
    pub radius: f64,
}

/// Owns and animates the dot population.
///
/// Drive it with [`build`](Self::build) when a decoded image and a canvas
/// are available, [`toggle`](Self::toggle) on user taps, and read
/// [`frame`](Self::frame) every display tick. Timestamps come from the
/// host's monotonic clock; the system never reads time itself.
pub struct PortraitSystem {
    params: PortraitParams,
    rng: Xorshift64,
    /// Last built canvas size; zero until the first successful build.
    canvas: DVec2,
    /// Reference geometry: stable across toggles, replaced by `build`.
    targets: Vec<DVec2>,
    colors: Vec<Rgb>,
    dots: Vec<Dot>,
    regime: Regime,
    /// Origin of the current regime's time axis.
    anim_start: f64,
    /// Coalescing cell for the needs-rebuild signal.
    pending_canvas: Option<DVec2>,
}

impl PortraitSystem {
    /// Creates an empty system in the scattered regime.
    ///
    /// `seed` drives every random draw the system will ever make; a fixed
    /// seed reproduces populations exactly, production callers can seed
    /// from entropy.
    pub fn new(params: PortraitParams, seed: u64) -> Self {
        Self {
            params,
            rng: Xorshift64::new(seed),
            canvas: DVec2::ZERO,
            targets: Vec::new(),
            colors: Vec::new(),
            dots: Vec::new(),
            regime: Regime::Scattered,
            anim_start: 0.0,
            pending_canvas: None,
        }
    }

    /// The parameters this system was built with.
    pub fn params(&self) -> &PortraitParams {
        &self.params
    }

    /// The active motion regime.
    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// Seconds since the current regime's time axis began.
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.anim_start
    }

    /// Number of dots in the population.
    pub fn dot_count(&self) -> usize {
        self.dots.len()
    }

    /// True when there is nothing to draw; the caller should render
    /// [`ambient_noise`](Self::ambient_noise) instead of a frozen frame.
    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    /// The dot population, in target order.
    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    /// Signals that the canvas has a (possibly new) size.
    ///
    /// Accepts when either axis moved by more than one unit since the last
    /// built-or-pending size (a fresh system accepts any valid canvas);
    /// rapid resizes coalesce into the single pending cell, so per-frame
    /// calls at a settled size are rejected and cannot schedule redundant
    /// rebuilds. The draw path calls this instead of mutating anything else.
    pub fn request_rebuild(&mut self, canvas: DVec2) -> bool {
        if canvas.x < MIN_CANVAS_SIDE || canvas.y < MIN_CANVAS_SIDE {
            return false;
        }
        let reference = self.pending_canvas.unwrap_or(self.canvas);
        let moved = (canvas.x - reference.x).abs() > REBUILD_THRESHOLD
            || (canvas.y - reference.y).abs() > REBUILD_THRESHOLD;
        if moved {
            self.pending_canvas = Some(canvas);
        }
        moved
    }

    /// Drains the pending rebuild request, if any.
    ///
    /// The update context calls this off the frame path and feeds the size
    /// into [`build`](Self::build) together with a freshly decoded frame.
    pub fn take_pending_canvas(&mut self) -> Option<DVec2> {
        self.pending_canvas.take()
    }

    /// (Re)samples the image and regenerates the population.
    ///
    /// The current regime is preserved (a rebuild mid-assembly stays
    /// assembling) but the clock restarts. Returns `false` and leaves all
    /// prior state in place when the canvas is degenerate or nothing
    /// survives sampling (all-transparent image); the caller keeps showing
    /// whatever it showed before, or the ambient fallback.
    pub fn build(&mut self, frame: &RgbaFrame, canvas: DVec2, now: f64) -> bool {
        if canvas.x < MIN_CANVAS_SIDE || canvas.y < MIN_CANVAS_SIDE {
            debug!("build skipped: degenerate canvas {canvas}");
            return false;
        }
        let sampled = sampler::sample_frame(frame, canvas, &self.params);
        if sampled.is_empty() {
            debug!("build skipped: image produced no samples");
            return false;
        }

        self.canvas = canvas;
        self.targets = sampled.targets;
        self.colors = sampled.colors;
        self.dots = dot::spawn_population(
            &self.targets,
            &self.colors,
            canvas,
            self.regime.is_assembling(),
            &self.params,
            &mut self.rng,
        );
        self.anim_start = now;
        debug!(
            "built {} dots on {}x{} canvas",
            self.dots.len(),
            canvas.x,
            canvas.y
        );
        true
    }

    /// Flips the motion regime, preserving each dot's on-screen position.
    ///
    /// Every dot's current position, evaluated under the outgoing regime
    /// with its old delay, becomes its new `start`. The new `end` is the
    /// stored target when entering [`Regime::Assembling`], or a fresh disk
    /// point when entering [`Regime::Scattered`] (scatter points are
    /// re-randomized on every toggle; targets never are). Delays are
    /// redrawn from a tighter range and the clock restarts.
    pub fn toggle(&mut self, now: f64) {
        let next = self.regime.flipped();

        if self.dots.is_empty() || self.targets.is_empty() {
            self.regime = next;
            self.anim_start = now;
            self.respawn(now);
            return;
        }

        let t_now = self.elapsed(now);
        let center = self.canvas * 0.5;
        let scatter_radius = self.canvas.min_element() * 0.5 * SCATTER_RADIUS;
        let assemble_time = self.params.assemble_time;

        for i in 0..self.dots.len() {
            let frozen = motion::position(&self.dots[i], t_now, self.regime, assemble_time);
            let end = if next.is_assembling() {
                self.targets[i]
            } else {
                self.rng.next_disk(center, scatter_radius)
            };
            let delay = self.rng.next_range(0.0, TOGGLE_DELAY_MAX);
            let d = &mut self.dots[i];
            d.start = frozen;
            d.end = end;
            d.delay = delay;
        }

        self.regime = next;
        self.anim_start = now;
        debug!("toggled to {:?}", self.regime);
    }

    /// Rebuilds the population from the stored reference geometry, if any.
    fn respawn(&mut self, now: f64) {
        if self.targets.is_empty() {
            return;
        }
        self.dots = dot::spawn_population(
            &self.targets,
            &self.colors,
            self.canvas,
            self.regime.is_assembling(),
            &self.params,
            &mut self.rng,
        );
        self.anim_start = now;
    }

    /// Per-frame snapshot: every dot's current position, radius, and color,
    /// in stable target order. Pure and allocation-free, safe to call at
    /// display-refresh cadence.
    pub fn frame(&self, now: f64) -> impl Iterator<Item = DotSprite> + '_ {
        let elapsed = self.elapsed(now);
        let regime = self.regime;
        let assemble_time = self.params.assemble_time;
        self.dots.iter().map(move |d| DotSprite {
            position: motion::position(d, elapsed, regime, assemble_time),
            radius: motion::size(d, elapsed, regime),
            color: d.color,
        })
    }

    /// A batch of ambient-noise dots covering the canvas, for the fallback
    /// the caller renders while the population is empty. Density is one dot
    /// per ~4500 px²; redrawing a fresh batch each frame gives a flickering
    /// static look.
    pub fn ambient_noise(&mut self, canvas: DVec2) -> Vec<NoiseDot> {
        if canvas.x < MIN_CANVAS_SIDE || canvas.y < MIN_CANVAS_SIDE {
            return Vec::new();
        }
        let count = (canvas.x * canvas.y / NOISE_AREA_PER_DOT) as usize;
        (0..count)
            .map(|_| NoiseDot {
                position: DVec2::new(
                    self.rng.next_range(0.0, canvas.x),
                    self.rng.next_range(0.0, canvas.y),
                ),
                radius: self.rng.next_range(NOISE_SIZE_MIN, NOISE_SIZE_MAX),
            })
            .collect()
    }
}
