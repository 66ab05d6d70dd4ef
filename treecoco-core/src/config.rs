// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant;
use crate::error::TreeCocoError;
use crate::io::CocoCategory;

/// Settings shared by every pipeline stage
///
/// Every field has a default matching the simulator output, so a JSON
/// configuration file only needs the fields it changes.
///
/// # Examples
///
/// ```
/// use treecoco_core::config::PipelineConfig;
///
/// let config: PipelineConfig = serde_json::from_str(r#"{"total_pixels": 1024}"#).unwrap();
///
/// assert_eq!(config.total_pixels, 1024);
/// assert_eq!(config.noise_threshold, 5);
/// assert_eq!(config.sentinel, [245, 155, 66]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Pixel count of every dataset image (width * height)
    pub total_pixels: u64,

    /// Masks with a smaller black pixel fraction are removed
    pub min_black_fraction: f64,

    /// Masks with a larger black pixel fraction are removed
    pub max_black_fraction: f64,

    /// Channel values at or below this are background noise
    pub noise_threshold: u8,

    /// Colour used to isolate tree silhouettes
    pub sentinel: [u8; 3],

    /// Marker preceding the tree id in single tree file names
    pub object_marker: String,

    /// COCO `info.description`
    pub description: String,

    /// The single COCO category every annotation belongs to
    pub category: CocoCategory,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            total_pixels: constant::DEFAULT_TOTAL_PIXELS,
            min_black_fraction: constant::DEFAULT_MIN_BLACK_FRACTION,
            max_black_fraction: constant::DEFAULT_MAX_BLACK_FRACTION,
            noise_threshold: constant::DEFAULT_NOISE_THRESHOLD,
            sentinel: constant::DEFAULT_SENTINEL,
            object_marker: constant::DEFAULT_OBJECT_MARKER.to_string(),
            description: constant::DEFAULT_DESCRIPTION.to_string(),
            category: CocoCategory {
                id: constant::DEFAULT_CATEGORY_ID,
                name: constant::DEFAULT_CATEGORY_NAME.to_string(),
            },
        }
    }
}

impl PipelineConfig {
    /// Open a configuration from a JSON file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a JSON configuration
    pub fn open<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, TreeCocoError> {
        let path = path.as_ref();

        let mut file = File::open(path)
            .map_err(|err| TreeCocoError::ConfigError(format!("{}: {}", path.display(), err)))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|err| TreeCocoError::ConfigError(format!("{}: {}", path.display(), err)))?;

        let config: PipelineConfig = serde_json::from_str(&contents)
            .map_err(|err| TreeCocoError::ConfigError(format!("{}: {}", path.display(), err)))?;

        config.check()?;
        Ok(config)
    }

    /// Reject settings no dataset could satisfy
    pub fn check(&self) -> Result<(), TreeCocoError> {
        if self.total_pixels == 0 {
            return Err(TreeCocoError::ConfigError(
                "total_pixels must be positive".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.min_black_fraction)
            || !(0.0..=1.0).contains(&self.max_black_fraction)
            || self.min_black_fraction > self.max_black_fraction
        {
            return Err(TreeCocoError::ConfigError(
                "black fractions must satisfy 0 <= min <= max <= 1".to_string(),
            ));
        }

        if self.sentinel.iter().all(|&v| v <= self.noise_threshold) {
            return Err(TreeCocoError::ConfigError(
                "sentinel colour must be brighter than the noise threshold".to_string(),
            ));
        }

        if self.object_marker.is_empty() {
            return Err(TreeCocoError::ConfigError(
                "object_marker cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether a mask with this black pixel fraction is kept
    ///
    /// Both bounds are inclusive.
    pub fn accepts_black_fraction(&self, fraction: f64) -> bool {
        fraction >= self.min_black_fraction && fraction <= self.max_black_fraction
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(PipelineConfig::default().check(), Ok(()));
    }

    #[test]
    fn test_black_fraction_bounds_inclusive() {
        let config = PipelineConfig::default();

        assert!(config.accepts_black_fraction(0.2));
        assert!(config.accepts_black_fraction(0.99));
        assert!(!config.accepts_black_fraction(0.19));
        assert!(!config.accepts_black_fraction(0.995));
    }

    #[test]
    fn test_open_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"description": "Test", "noise_threshold": 10}"#).unwrap();

        let config = PipelineConfig::open(&path).unwrap();

        assert_eq!(config.description, "Test");
        assert_eq!(config.noise_threshold, 10);
        assert_eq!(config.total_pixels, 589_824);
        assert_eq!(config.category.name, "tree");
    }

    #[test]
    fn test_open_rejects_unknown_and_invalid() {
        let dir = tempfile::tempdir().unwrap();

        let unknown = dir.path().join("unknown.json");
        std::fs::write(&unknown, r#"{"threshold": 10}"#).unwrap();
        assert!(matches!(
            PipelineConfig::open(&unknown),
            Err(TreeCocoError::ConfigError(_))
        ));

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, r#"{"min_black_fraction": 0.9, "max_black_fraction": 0.1}"#)
            .unwrap();
        assert!(matches!(
            PipelineConfig::open(&invalid),
            Err(TreeCocoError::ConfigError(_))
        ));
    }
}
