#![deny(unsafe_code)]
//! Core types for the stipple particle-portrait system.
//!
//! Provides the `Rgb`/`Hsv` color pipeline (conversions, luminance,
//! saturation/gamma enhancement), the `Xorshift64` deterministic PRNG with
//! disk/angle draws, the stateless `pixel_jitter` hash, parameter extraction
//! helpers, and the shared error type.

pub mod color;
pub mod error;
pub mod params;
pub mod prng;

pub use color::{Hsv, Rgb};
pub use error::CoreError;
pub use prng::Xorshift64;
