//! Image sampling: turns a decoded RGBA buffer into a weighted,
//! color-sampled point cloud in canvas space.
//!
//! The sampler strides the pixel grid, discards transparent pixels, weights
//! the survivors by gamma-corrected luminance and Sobel edge response, thins
//! them deterministically to the dot cap, and maps the result to canvas
//! coordinates with stable per-pixel jitter. Everything here is pure: the
//! same frame, canvas, and parameters always produce the same cloud.

use glam::DVec2;
use log::debug;
use stipple_core::color::{enhance, Rgb};
use stipple_core::prng::pixel_jitter;
use stipple_core::CoreError;

use crate::params::PortraitParams;

/// Gain applied to the raw Sobel magnitude before clamping to [0, 1].
const SOBEL_GAIN: f64 = 0.9;
/// Importance weight of gamma-corrected luminance.
const WEIGHT_LUMA: f64 = 0.45;
/// Importance weight of edge response.
const WEIGHT_GRAD: f64 = 0.55;
/// Slight overscan so the scaled image covers the canvas without letterbox gaps.
const OVERSCAN: f64 = 1.02;

/// A borrowed, already-decoded RGBA8 pixel buffer.
///
/// Construction validates that the buffer length matches
/// `width * height * 4`, so all interior accesses are in bounds.
#[derive(Debug, Clone, Copy)]
pub struct RgbaFrame<'a> {
    width: usize,
    height: usize,
    data: &'a [u8],
}

impl<'a> RgbaFrame<'a> {
    /// Wraps a decoded RGBA8 buffer.
    ///
    /// Returns `CoreError::InvalidDimensions` if either dimension is zero,
    /// or `CoreError::BufferSizeMismatch` if `data.len() != width * height * 4`.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions);
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(CoreError::InvalidDimensions)?;
        if data.len() != expected {
            return Err(CoreError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// RGBA at `(x, y)` as floats in [0, 1].
    fn rgba(&self, x: usize, y: usize) -> [f64; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.data[i] as f64 / 255.0,
            self.data[i + 1] as f64 / 255.0,
            self.data[i + 2] as f64 / 255.0,
            self.data[i + 3] as f64 / 255.0,
        ]
    }

    /// Raw (un-gamma'd) Rec.709 luminance at `(x, y)`, ignoring alpha.
    fn luma(&self, x: usize, y: usize) -> f64 {
        let [r, g, b, _] = self.rgba(x, y);
        Rgb { r, g, b }.luminance()
    }
}

/// One strided pixel that survived the alpha cut. Sampler-internal.
#[derive(Debug, Clone, Copy)]
struct Sample {
    x: usize,
    y: usize,
    color: Rgb,
    /// Gamma-corrected luminance.
    v: f64,
    /// Sobel edge magnitude in [0, 1].
    grad: f64,
}

/// The reference geometry dots animate toward: one canvas-space point and
/// one enhanced color per surviving sample, in emission order.
#[derive(Debug, Clone, Default)]
pub struct SampledImage {
    pub targets: Vec<DVec2>,
    pub colors: Vec<Rgb>,
}

impl SampledImage {
    /// Number of sampled points.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when nothing survived sampling (caller should fall back to
    /// ambient noise instead of a frozen frame).
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Importance of a sample: brighter and edgier pixels matter more.
fn weight(s: &Sample) -> f64 {
    WEIGHT_LUMA * s.v + WEIGHT_GRAD * s.grad
}

/// Sobel gradient magnitude at `(x, y)` from the 3x3 raw-luminance
/// neighborhood. Pixels on the one-pixel border get 0.
fn sobel_mag(frame: &RgbaFrame, x: usize, y: usize) -> f64 {
    if x == 0 || y == 0 || x + 1 >= frame.width() || y + 1 >= frame.height() {
        return 0.0;
    }
    let l = |xx: usize, yy: usize| frame.luma(xx, yy);
    let (a, b, c) = (l(x - 1, y - 1), l(x, y - 1), l(x + 1, y - 1));
    let (d, f) = (l(x - 1, y), l(x + 1, y));
    let (g, h, i) = (l(x - 1, y + 1), l(x, y + 1), l(x + 1, y + 1));
    let gx = (c + 2.0 * f + i) - (a + 2.0 * d + g);
    let gy = (g + 2.0 * h + i) - (a + 2.0 * b + c);
    ((gx.abs() + gy.abs()) * SOBEL_GAIN).clamp(0.0, 1.0)
}

/// Weighted systematic subsampling down to `cap` samples.
///
/// Accumulates weights in scan order and emits a sample each time the
/// running sum crosses `total / cap`, which favors high-weight pixels
/// without random dropout and is deterministic given sample order. If
/// rounding leaves fewer than `cap` emitted, the result is padded with the
/// unused samples in scan order until `cap` is reached.
fn subsample(samples: Vec<Sample>, cap: usize) -> Vec<Sample> {
    if samples.len() <= cap {
        return samples;
    }
    let total: f64 = samples.iter().map(weight).sum::<f64>() + 1e-6;
    let step = total / cap as f64;

    let mut picked = Vec::with_capacity(cap);
    let mut taken = vec![false; samples.len()];
    let mut acc = 0.0;
    let mut threshold = step;
    for (i, s) in samples.iter().enumerate() {
        acc += weight(s);
        if acc >= threshold {
            picked.push(*s);
            taken[i] = true;
            threshold += step;
            if picked.len() == cap {
                break;
            }
        }
    }
    if picked.len() < cap {
        for (i, s) in samples.iter().enumerate() {
            if picked.len() == cap {
                break;
            }
            if !taken[i] {
                picked.push(*s);
            }
        }
    }
    picked
}

/// Samples a frame into canvas-space targets and colors.
///
/// Returns an empty [`SampledImage`] when no pixel passes the alpha
/// threshold; the caller decides how to fall back.
pub fn sample_frame(frame: &RgbaFrame, canvas: DVec2, params: &PortraitParams) -> SampledImage {
    let w = frame.width();
    let h = frame.height();
    let step = params.sample_step.max(1);

    let mut samples = Vec::with_capacity((w / step + 1) * (h / step + 1));
    for y in (0..h).step_by(step) {
        for x in (0..w).step_by(step) {
            let [r, g, b, a] = frame.rgba(x, y);
            if a <= params.alpha_threshold {
                continue;
            }
            let color = Rgb { r, g, b };
            let v = color.luminance().powf(params.value_gamma);
            let grad = sobel_mag(frame, x, y);
            samples.push(Sample {
                x,
                y,
                color,
                v,
                grad,
            });
        }
    }
    if samples.is_empty() {
        debug!("no pixel passed the alpha threshold; sampling yields nothing");
        return SampledImage::default();
    }

    let strided = samples.len();
    let picked = subsample(samples, params.max_dots);
    debug!("sampled {} pixels, kept {}", strided, picked.len());

    let iw = w as f64;
    let ih = h as f64;
    let scale = (canvas.x / iw).max(canvas.y / ih) * OVERSCAN;
    let ox = (canvas.x - iw * scale) / 2.0;
    let oy = (canvas.y - ih * scale) / 2.0;

    let mut targets = Vec::with_capacity(picked.len());
    let mut colors = Vec::with_capacity(picked.len());
    for s in &picked {
        let j = pixel_jitter(s.x as u32, s.y as u32);
        targets.push(DVec2::new(
            (s.x as f64 + j.x) * scale + ox,
            (s.y as f64 + j.y) * scale + oy,
        ));
        colors.push(enhance(s.color, params.sat_boost, params.value_gamma));
    }
    SampledImage { targets, colors }
}
