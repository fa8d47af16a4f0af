//! Color types and conversion functions for stipple.
//!
//! Provides two color types (`Rgb`, `Hsv`) and pure conversion functions
//! between them, plus the luminance and saturation/gamma helpers the
//! portrait pipeline derives dot sizes and colors from. All conversions are
//! pure functions. Uses `f64` throughout for precision.

use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"` for human-readable formats.
/// The hex round-trip has 8-bit quantization (1/255 precision loss),
/// which is acceptable since hex colors are inherently 8-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// HSV color: hue in [0, 1), saturation and value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Rgb {
    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `CoreError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Rgb, CoreError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return Err(CoreError::InvalidColor(format!(
                "expected 6 hex digits, got {}",
                hex.len()
            )));
        }
        let r = u8::from_str_radix(&hex[0..2], 16)
            .map_err(|e| CoreError::InvalidColor(format!("invalid red component: {e}")))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .map_err(|e| CoreError::InvalidColor(format!("invalid green component: {e}")))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .map_err(|e| CoreError::InvalidColor(format!("invalid blue component: {e}")))?;
        Ok(Rgb {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        })
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    ///
    /// Components are quantized to 8-bit (0–255) with rounding.
    pub fn to_hex(self) -> String {
        let r = (self.r.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (self.g.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (self.b.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Rec.709 luminance of the stored components: `0.2126 r + 0.7152 g + 0.0722 b`.
    pub fn luminance(self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Converts RGB to HSV.
///
/// Hue is in [0, 1); an achromatic color (zero chroma) gets hue 0 rather
/// than an indeterminate value.
pub fn rgb_to_hsv(c: Rgb) -> Hsv {
    let mx = c.r.max(c.g).max(c.b);
    let mn = c.r.min(c.g).min(c.b);
    let v = mx;
    let d = mx - mn;
    let s = if mx == 0.0 { 0.0 } else { d / mx };
    let mut h = 0.0;
    if d != 0.0 {
        h = if mx == c.r {
            (c.g - c.b) / d + if c.g < c.b { 6.0 } else { 0.0 }
        } else if mx == c.g {
            (c.b - c.r) / d + 2.0
        } else {
            (c.r - c.g) / d + 4.0
        };
        h /= 6.0;
        // Rounding can land exactly on 1.0 when g is barely below b.
        if h >= 1.0 {
            h -= 1.0;
        }
    }
    Hsv { h, s, v }
}

/// Converts HSV to RGB.
///
/// Hue is wrapped into [0, 1), so slightly out-of-range hues are valid input.
pub fn hsv_to_rgb(c: Hsv) -> Rgb {
    let h = c.h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = c.v * (1.0 - c.s);
    let q = c.v * (1.0 - c.s * f);
    let t = c.v * (1.0 - c.s * (1.0 - f));
    let (r, g, b) = match sector as u8 % 6 {
        0 => (c.v, t, p),
        1 => (q, c.v, p),
        2 => (p, c.v, t),
        3 => (p, q, c.v),
        4 => (t, p, c.v),
        _ => (c.v, p, q),
    };
    Rgb { r, g, b }
}

/// Boosts saturation and gamma-corrects value, returning the enriched RGB.
///
/// Saturation is multiplied by `sat_boost` and clamped to 1.0; value is
/// raised to `value_gamma` and clamped to [0, 1]. This is the fixed color
/// treatment applied to every sampled pixel before it becomes a dot color.
pub fn enhance(c: Rgb, sat_boost: f64, value_gamma: f64) -> Rgb {
    let hsv = rgb_to_hsv(c);
    hsv_to_rgb(Hsv {
        h: hsv.h,
        s: (hsv.s * sat_boost).min(1.0),
        v: hsv.v.powf(value_gamma).clamp(0.0, 1.0),
    })
}
