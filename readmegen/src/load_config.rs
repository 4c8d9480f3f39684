/// `load_config` module: Loads an optional static YAML config and maps it, together
/// with CLI overrides, onto the core [`GenerateConfig`].
///
/// This is the only place where user YAML is parsed. Secrets never live in the file;
/// the API key is read from the environment by [`crate::llm::LLMClient::new_from_env`].
///
/// # Accepted schema
/// ```yaml
/// model:
///   name: gpt-4o-mini
///   base_url: https://api.openai.com/v1
///   timeout_secs: 120            # per scoring request
///   synthesis_timeout_secs: 600  # README synthesis request
/// assess:
///   concurrency: 8
///   relevance: 3
/// output:
///   file_name: README.generated.md
///   include_readme: false
/// ```
/// Every key is optional.
///
/// # Errors
/// All errors use `anyhow::Error` and surface at the CLI boundary.
use anyhow::Result;
use readmegen_core::config::GenerateConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub model: ModelSection,
    pub assess: AssessSection,
    pub output: OutputSection,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub name: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub synthesis_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssessSection {
    pub concurrency: Option<usize>,
    pub relevance: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub file_name: Option<String>,
    pub include_readme: Option<bool>,
}

/// Flag values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub relevance: Option<u8>,
    pub include_readme: bool,
    pub concurrency: Option<usize>,
    pub output_file: Option<String>,
}

/// Loads a static YAML config file (no secrets).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    if config_content.trim().is_empty() {
        info!(config_path = ?path_ref, "Config file is empty, using defaults");
        return Ok(CliConfig::default());
    }

    match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

/// Load the file when one was given, defaults otherwise.
pub fn load_optional(path: Option<&PathBuf>) -> Result<CliConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(CliConfig::default()),
    }
}

/// Merge defaults, file values and flags into the run configuration.
pub fn build_generate_config(
    root: &Path,
    file: &CliConfig,
    overrides: &Overrides,
) -> GenerateConfig {
    let mut config = GenerateConfig::new(root);
    if let Some(relevance) = overrides.relevance.or(file.assess.relevance) {
        config.relevance = relevance;
    }
    if let Some(concurrency) = overrides.concurrency.or(file.assess.concurrency) {
        config.assess.concurrency = concurrency;
    }
    if let Some(secs) = file.model.timeout_secs {
        config.assess.request_timeout = Duration::from_secs(secs);
    }
    config.include_readme = overrides.include_readme || file.output.include_readme.unwrap_or(false);
    if let Some(name) = overrides
        .output_file
        .clone()
        .or_else(|| file.output.file_name.clone())
    {
        config.output_file = name;
    }
    config
}
