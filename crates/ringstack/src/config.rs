//! JSON configuration for [`crate::VisionPipeline`].

use std::{fs, path::Path};

use ringstack_core::{AllowedRegion, ColorRange};
use ringstack_detect::DetectorParams;
use ringstack_geometry::CameraParams;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Everything needed to build a pipeline. Missing sections take defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub camera: CameraParams,
    pub detector: DetectorParams,
    /// Initial HSV range; tunable at runtime.
    pub color: ColorRange,
    /// Initial allowed region; tunable at runtime.
    pub region: AllowedRegion,
}

impl PipelineConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Preset tracking the red wobble goal instead of the orange rings.
    pub fn wobble() -> Self {
        Self {
            color: ColorRange::WOBBLE,
            ..Self::default()
        }
    }
}
