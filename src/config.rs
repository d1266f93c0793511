use std::collections::HashSet;
use serde::Deserialize;
use crate::animation::{ProgressController, TreeState};
use crate::error::ConfigError;

/// A photo to hang on the tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhotoEntry {
    pub id: String,
    pub url: String,
}

impl PhotoEntry {
    pub fn new(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
        }
    }
}

/// Bauble population sizes
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BaubleCounts {
    pub balls: usize,
    pub boxes: usize,
    pub lights: usize,
}

impl Default for BaubleCounts {
    fn default() -> Self {
        Self {
            balls: 150,
            boxes: 40,
            lights: 60,
        }
    }
}

/// Scene configuration, loadable from YAML.
///
/// Every field is optional in the YAML input; omitted fields fall back to the
/// values of the default scene.
///
/// ```yaml
/// foliage_count: 8000
/// baubles:
///   balls: 100
/// photos:
///   - id: "xmas-2023"
///     url: "photos/2023.jpg"
/// initial_state: chaos
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub foliage_count: usize,
    pub baubles: BaubleCounts,
    pub photos: Vec<PhotoEntry>,
    /// Progress damping rate in 1/s
    pub damping: f32,
    pub initial_state: TreeState,
    /// Blend orientations across the 0.5 threshold instead of snapping
    pub orientation_blend: bool,
    /// Fixed RNG seed for reproducible layouts
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            foliage_count: 12_000,
            baubles: BaubleCounts::default(),
            photos: default_photos(),
            damping: ProgressController::DEFAULT_DAMPING,
            initial_state: TreeState::Formed,
            orientation_blend: false,
            seed: None,
        }
    }
}

fn default_photos() -> Vec<PhotoEntry> {
    (1..=8)
        .map(|i| PhotoEntry {
            id: format!("photo-{}", i),
            url: format!("photos/{}.jpg", i),
        })
        .collect()
}

impl SceneConfig {
    /// Parse and validate from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.damping.is_finite() || self.damping <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "damping must be a positive finite rate, got {}",
                self.damping
            )));
        }

        let mut seen = HashSet::new();
        for photo in &self.photos {
            if photo.url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("photo '{}' has an empty url", photo.id)));
            }
            if !seen.insert(photo.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate photo id '{}'", photo.id)));
            }
        }

        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_photos(mut self, photos: Vec<PhotoEntry>) -> Self {
        self.photos = photos;
        self
    }

    pub fn with_initial_state(mut self, state: TreeState) -> Self {
        self.initial_state = state;
        self
    }

    /// Progress controller at rest in the configured initial state
    pub fn progress_controller(&self) -> ProgressController {
        ProgressController::new(self.initial_state).with_damping(self.damping)
    }
}
