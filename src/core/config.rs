//! Runtime knobs shared by every panel.

use crate::playback::SpeedBounds;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::path::{Path, PathBuf};
#[cfg(feature = "serde")]
use thiserror::Error;

#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VizConfig {
    /// Range of the speed control, shared by every playback panel.
    pub speed: SpeedBounds,
    pub learning_interval_ms: u32,
    pub patterns_interval_ms: u32,
    pub processing_interval_ms: u32,
    /// Length of the "realistic" vectors on the patterns panel.
    pub realistic_dims: usize,
    /// Length of the random vectors on the token initialization panel.
    pub token_dims: usize,
    pub seed: u64,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            speed: SpeedBounds::default(),
            learning_interval_ms: 2000,
            patterns_interval_ms: 2000,
            processing_interval_ms: 3000,
            realistic_dims: 50,
            token_dims: 8,
            seed: 0x5EED_0F_B00C,
        }
    }
}

impl VizConfig {
    /// Normalise user-supplied values so every panel can rely on them.
    pub fn validate(mut self) -> Self {
        let mut speed = self.speed;
        if speed.min_ms > speed.max_ms {
            std::mem::swap(&mut speed.min_ms, &mut speed.max_ms);
        }
        speed.min_ms = speed.min_ms.max(1);
        speed.max_ms = speed.max_ms.max(speed.min_ms);
        speed.step_ms = speed.step_ms.max(1);
        self.speed = speed;

        self.learning_interval_ms = speed.clamp(self.learning_interval_ms);
        self.patterns_interval_ms = speed.clamp(self.patterns_interval_ms);
        self.processing_interval_ms = speed.clamp(self.processing_interval_ms);
        self.realistic_dims = self.realistic_dims.max(1);
        self.token_dims = self.token_dims.max(1);
        self
    }

    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(text).map(Self::validate)
    }

    /// Load `path`; a missing file yields the defaults.
    #[cfg(feature = "serde")]
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
