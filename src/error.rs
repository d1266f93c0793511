use thiserror::Error;

/// Failure to build a [`SceneConfig`](crate::config::SceneConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid scene config: {0}")]
    Invalid(String),
}

/// Failure to obtain a usable photo texture.
///
/// Never reaches the animation core: the photo store logs it and swaps in a
/// placeholder image.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetLoadError {
    #[error("failed to fetch '{path}': {reason}")]
    Network { path: String, reason: String },

    #[error("failed to decode '{path}': {reason}")]
    Decode { path: String, reason: String },

    #[error("'{path}' has unusable dimensions {width}x{height} ({len} bytes)")]
    Dimensions {
        path: String,
        width: u32,
        height: u32,
        len: usize,
    },

    #[error("no photo with id {0}")]
    UnknownPhoto(usize),
}
