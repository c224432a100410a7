use crate::PoseError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters for one assembly pass.
///
/// Missing fields in JSON fall back to [`AssemblyConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Minimum confidence a peak must exceed.
    pub peak_threshold: f32,
    /// Side of the square peak window, odd and at least 3.
    pub window_size: usize,
    /// Maximum peaks kept per part type.
    pub max_parts_per_type: usize,
    /// Samples taken along each candidate limb.
    pub num_integral_samples: usize,
    /// Minimum affinity score a matched limb must exceed.
    pub link_threshold: f32,
    /// Maximum skeletons produced per frame.
    pub max_objects: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            peak_threshold: 0.1,
            window_size: 5,
            max_parts_per_type: 2,
            num_integral_samples: 7,
            link_threshold: 0.1,
            max_objects: 100,
        }
    }
}

impl AssemblyConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PoseError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PoseError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_peak_threshold(mut self, threshold: f32) -> Self {
        self.peak_threshold = threshold;
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_max_parts_per_type(mut self, max_parts: usize) -> Self {
        self.max_parts_per_type = max_parts;
        self
    }

    pub fn with_num_integral_samples(mut self, samples: usize) -> Self {
        self.num_integral_samples = samples;
        self
    }

    pub fn with_link_threshold(mut self, threshold: f32) -> Self {
        self.link_threshold = threshold;
        self
    }

    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    pub fn validate(&self) -> Result<(), PoseError> {
        if self.window_size < 3 || self.window_size % 2 == 0 {
            return Err(PoseError::Config(format!(
                "window_size must be odd and >= 3, got {}",
                self.window_size
            )));
        }
        if self.max_parts_per_type == 0 {
            return Err(PoseError::Config("max_parts_per_type must be > 0".to_string()));
        }
        if self.num_integral_samples == 0 {
            return Err(PoseError::Config("num_integral_samples must be > 0".to_string()));
        }
        if self.max_objects == 0 {
            return Err(PoseError::Config("max_objects must be > 0".to_string()));
        }
        if !self.peak_threshold.is_finite() || !self.link_threshold.is_finite() {
            return Err(PoseError::Config(format!(
                "thresholds must be finite, got peak={} link={}",
                self.peak_threshold, self.link_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AssemblyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_even_window_rejected() {
        let err = AssemblyConfig::default()
            .with_window_size(4)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("window_size"));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let config = AssemblyConfig::default().with_link_threshold(f32::NAN);
        assert!(matches!(config.validate(), Err(PoseError::Config(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AssemblyConfig::from_json_str(r#"{ "max_objects": 4 }"#).unwrap();
        assert_eq!(config.max_objects, 4);
        assert_eq!(config.window_size, 5);
        assert_eq!(config.num_integral_samples, 7);
    }
}
