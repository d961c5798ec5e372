use anyhow::{Context as _, Result};
use hop_analysis_core::PipelineConfig;
use std::fs;
use std::path::Path;

pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => {
            let config_str = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&config_str)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

pub fn default_config_toml() -> Result<String> {
    Ok(toml::to_string_pretty(&PipelineConfig::default())?)
}
