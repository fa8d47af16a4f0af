#![deny(unsafe_code)]
//! Image-to-particle portrait simulation.
//!
//! A field of colored dots assembles into a source image and scatters into
//! ambient orbiting, toggled by user input. The pipeline: [`sampler`] turns
//! a decoded RGBA frame into weighted, color-sampled targets; [`dot`] spawns
//! one particle per target with randomized motion parameters; [`motion`]
//! maps (dot, elapsed time, regime) to a position and radius, statelessly;
//! [`system::PortraitSystem`] owns the state and handles regime transitions
//! that preserve each dot's on-screen position.
//!
//! Rendering, image decoding, and the frame clock belong to the host: the
//! system consumes decoded pixels and timestamps, and exposes a per-frame
//! sprite iterator for whatever draws circles.

pub mod dot;
pub mod motion;
pub mod params;
pub mod sampler;
pub mod system;

pub use dot::Dot;
pub use motion::Regime;
pub use params::PortraitParams;
pub use sampler::{RgbaFrame, SampledImage};
pub use system::{DotSprite, NoiseDot, PortraitSystem, GLOW_OPACITY, GLOW_SCALE, NOISE_OPACITY};
