//! Pipeline Settings

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the pretrained regressor
pub const DEFAULT_MODEL_PATH: &str = "models/bkz_std6_gradient.onnx";

/// Environment variable prefix, e.g. `RESISTIVITY_MODEL_PATH`
pub const ENV_PREFIX: &str = "RESISTIVITY";

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Pretrained ONNX model
    pub model_path: PathBuf,

    /// Directory for generated output files (system temp dir if unset)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Tracing filter directive
    pub log_level: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            output_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load defaults, then the optional config file, then `RESISTIVITY_*` env vars
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("model_path", DEFAULT_MODEL_PATH)?
            .set_default("log_level", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }
}
