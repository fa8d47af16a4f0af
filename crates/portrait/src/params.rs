//! Tunable parameters for the portrait pipeline.

use serde_json::{json, Value};
use stipple_core::params::{param_bool, param_f64, param_usize};

/// Default pixel stride when sampling the source image.
const DEFAULT_SAMPLE_STEP: usize = 2;
/// Default cap on the dot population.
const DEFAULT_MAX_DOTS: usize = 14_000;
/// Default alpha cutoff below which a pixel is discarded.
const DEFAULT_ALPHA_THRESHOLD: f64 = 0.5;
/// Default saturation multiplier applied to sampled colors.
const DEFAULT_SAT_BOOST: f64 = 1.12;
/// Default gamma applied to luminance and to the HSV value channel.
const DEFAULT_VALUE_GAMMA: f64 = 0.90;
/// Default duration of the assembly interpolation, in seconds.
const DEFAULT_ASSEMBLE_TIME: f64 = 2.4;
/// Default base dot radius range, in pixels.
const DEFAULT_DOT_SIZE_MIN: f64 = 0.9;
const DEFAULT_DOT_SIZE_MAX: f64 = 2.6;
/// Glow halos are on by default.
const DEFAULT_GLOW: bool = true;

/// Parameters controlling sampling, color treatment, and animation timing.
///
/// Use [`Default`] for the values the portrait was tuned with. All values
/// can be overridden from a JSON object via [`PortraitParams::from_json`].
#[derive(Debug, Clone, Copy)]
pub struct PortraitParams {
    /// Pixel stride in both axes when sampling the source image.
    pub sample_step: usize,
    /// Hard cap on the dot population; excess samples are thinned by
    /// weighted systematic subsampling.
    pub max_dots: usize,
    /// Pixels with alpha at or below this threshold are discarded.
    pub alpha_threshold: f64,
    /// Saturation multiplier applied to every sampled color (clamped to 1).
    pub sat_boost: f64,
    /// Gamma applied to sampled luminance and the HSV value channel.
    pub value_gamma: f64,
    /// Duration of the assembly interpolation, in seconds.
    pub assemble_time: f64,
    /// Base dot radius range, in pixels, before luminance scaling.
    pub dot_size_min: f64,
    pub dot_size_max: f64,
    /// Whether the renderer should draw a glow halo behind each dot.
    pub glow: bool,
}

impl Default for PortraitParams {
    fn default() -> Self {
        Self {
            sample_step: DEFAULT_SAMPLE_STEP,
            max_dots: DEFAULT_MAX_DOTS,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            sat_boost: DEFAULT_SAT_BOOST,
            value_gamma: DEFAULT_VALUE_GAMMA,
            assemble_time: DEFAULT_ASSEMBLE_TIME,
            dot_size_min: DEFAULT_DOT_SIZE_MIN,
            dot_size_max: DEFAULT_DOT_SIZE_MAX,
            glow: DEFAULT_GLOW,
        }
    }
}

impl PortraitParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    ///
    /// `sample_step` is clamped to at least 1 so a zero stride can never
    /// reach the sampler.
    pub fn from_json(params: &Value) -> Self {
        Self {
            sample_step: param_usize(params, "sample_step", DEFAULT_SAMPLE_STEP).max(1),
            max_dots: param_usize(params, "max_dots", DEFAULT_MAX_DOTS),
            alpha_threshold: param_f64(params, "alpha_threshold", DEFAULT_ALPHA_THRESHOLD),
            sat_boost: param_f64(params, "sat_boost", DEFAULT_SAT_BOOST),
            value_gamma: param_f64(params, "value_gamma", DEFAULT_VALUE_GAMMA),
            assemble_time: param_f64(params, "assemble_time", DEFAULT_ASSEMBLE_TIME),
            dot_size_min: param_f64(params, "dot_size_min", DEFAULT_DOT_SIZE_MIN),
            dot_size_max: param_f64(params, "dot_size_max", DEFAULT_DOT_SIZE_MAX),
            glow: param_bool(params, "glow", DEFAULT_GLOW),
        }
    }

    /// Current parameter values as a JSON object.
    pub fn params(&self) -> Value {
        json!({
            "sample_step": self.sample_step,
            "max_dots": self.max_dots,
            "alpha_threshold": self.alpha_threshold,
            "sat_boost": self.sat_boost,
            "value_gamma": self.value_gamma,
            "assemble_time": self.assemble_time,
            "dot_size_min": self.dot_size_min,
            "dot_size_max": self.dot_size_max,
            "glow": self.glow,
        })
    }

    /// Schema describing all available parameters, their types, ranges, and defaults.
    pub fn param_schema() -> Value {
        json!({
            "sample_step": {
                "type": "integer",
                "default": DEFAULT_SAMPLE_STEP,
                "min": 1,
                "max": 8,
                "description": "Pixel stride in both axes when sampling the source image"
            },
            "max_dots": {
                "type": "integer",
                "default": DEFAULT_MAX_DOTS,
                "min": 100,
                "max": 50000,
                "description": "Hard cap on the dot population"
            },
            "alpha_threshold": {
                "type": "number",
                "default": DEFAULT_ALPHA_THRESHOLD,
                "min": 0.0,
                "max": 1.0,
                "description": "Pixels with alpha at or below this are discarded"
            },
            "sat_boost": {
                "type": "number",
                "default": DEFAULT_SAT_BOOST,
                "min": 1.0,
                "max": 2.0,
                "description": "Saturation multiplier applied to sampled colors"
            },
            "value_gamma": {
                "type": "number",
                "default": DEFAULT_VALUE_GAMMA,
                "min": 0.5,
                "max": 1.0,
                "description": "Gamma applied to luminance and the HSV value channel"
            },
            "assemble_time": {
                "type": "number",
                "default": DEFAULT_ASSEMBLE_TIME,
                "min": 0.5,
                "max": 10.0,
                "description": "Duration of the assembly interpolation in seconds"
            },
            "dot_size_min": {
                "type": "number",
                "default": DEFAULT_DOT_SIZE_MIN,
                "min": 0.5,
                "max": 5.0,
                "description": "Lower bound of the base dot radius in pixels"
            },
            "dot_size_max": {
                "type": "number",
                "default": DEFAULT_DOT_SIZE_MAX,
                "min": 0.5,
                "max": 10.0,
                "description": "Upper bound of the base dot radius in pixels"
            },
            "glow": {
                "type": "boolean",
                "default": DEFAULT_GLOW,
                "description": "Whether the renderer should draw a glow halo behind each dot"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_matches_tuned_constants() {
        let p = PortraitParams::default();
        assert_eq!(p.sample_step, 2);
        assert_eq!(p.max_dots, 14_000);
        assert!((p.alpha_threshold - 0.5).abs() < f64::EPSILON);
        assert!((p.sat_boost - 1.12).abs() < f64::EPSILON);
        assert!((p.value_gamma - 0.90).abs() < f64::EPSILON);
        assert!((p.assemble_time - 2.4).abs() < f64::EPSILON);
        assert!((p.dot_size_min - 0.9).abs() < f64::EPSILON);
        assert!((p.dot_size_max - 2.6).abs() < f64::EPSILON);
        assert!(p.glow);
    }

    #[test]
    fn from_json_overrides_selected_keys() {
        let p = PortraitParams::from_json(&json!({
            "max_dots": 2000,
            "assemble_time": 1.2,
            "glow": false,
        }));
        assert_eq!(p.max_dots, 2000);
        assert!((p.assemble_time - 1.2).abs() < f64::EPSILON);
        assert!(!p.glow);
        // Untouched keys keep their defaults.
        assert_eq!(p.sample_step, 2);
        assert!((p.sat_boost - 1.12).abs() < f64::EPSILON);
    }

    #[test]
    fn from_json_empty_object_is_default() {
        let p = PortraitParams::from_json(&json!({}));
        let d = PortraitParams::default();
        assert_eq!(p.sample_step, d.sample_step);
        assert_eq!(p.max_dots, d.max_dots);
        assert_eq!(p.glow, d.glow);
    }

    #[test]
    fn from_json_clamps_zero_sample_step() {
        let p = PortraitParams::from_json(&json!({"sample_step": 0}));
        assert_eq!(p.sample_step, 1);
    }

    #[test]
    fn params_round_trips_through_from_json() {
        let original = PortraitParams {
            sample_step: 3,
            max_dots: 500,
            alpha_threshold: 0.25,
            sat_boost: 1.3,
            value_gamma: 0.8,
            assemble_time: 3.0,
            dot_size_min: 1.0,
            dot_size_max: 2.0,
            glow: false,
        };
        let restored = PortraitParams::from_json(&original.params());
        assert_eq!(restored.sample_step, original.sample_step);
        assert_eq!(restored.max_dots, original.max_dots);
        assert!((restored.alpha_threshold - original.alpha_threshold).abs() < f64::EPSILON);
        assert!((restored.assemble_time - original.assemble_time).abs() < f64::EPSILON);
        assert_eq!(restored.glow, original.glow);
    }

    #[test]
    fn param_schema_describes_every_param() {
        let schema = PortraitParams::param_schema();
        for key in [
            "sample_step",
            "max_dots",
            "alpha_threshold",
            "sat_boost",
            "value_gamma",
            "assemble_time",
            "dot_size_min",
            "dot_size_max",
            "glow",
        ] {
            assert!(schema.get(key).is_some(), "schema missing {key}");
            assert!(
                schema[key].get("default").is_some(),
                "schema {key} missing default"
            );
        }
    }
}
