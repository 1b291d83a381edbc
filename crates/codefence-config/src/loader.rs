use jsonc_parser::{parse_to_serde_value, ParseOptions};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Config, ConfigError};

const API_URL_ENV: &str = "GITHUB_API_URL";

/// Environment variable the Actions runner uses for an input, e.g.
/// `what-to-update` becomes `INPUT_WHAT-TO-UPDATE`.
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Collects configuration from, lowest priority first: a JSONC file, the
/// runner environment, and explicit overrides.
pub struct ConfigLoader {
    config: Config,
    config_paths: Vec<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            config_paths: Vec::new(),
        }
    }

    pub fn load_from_str(&mut self, content: &str) -> Result<(), ConfigError> {
        let config = parse_jsonc(content, Path::new("<inline>"))?;
        self.config.merge(config);
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse_jsonc(&content, path)?;
        self.config.merge(config);
        self.config_paths.push(path.to_path_buf());
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(())
    }

    /// Reads action inputs through `lookup`, which maps a variable name to
    /// its value. Blank values count as absent.
    pub fn load_from_inputs<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = read_input(&lookup, API_URL_ENV) {
            config.api_url = Some(url);
        }

        let input = |name: &str| read_input(&lookup, &input_env_name(name));
        config.language = input("language").or(config.language);
        config.github_token = input("github-token").or(config.github_token);
        config.api_url = input("api-url").or(config.api_url);
        config.log_level = input("log-level").or(config.log_level);
        if let Some(raw) = input("silent") {
            config.silent = Some(parse_boolean_input("silent", &raw)?);
        }
        if let Some(raw) = input("what-to-update") {
            config.what_to_update = Some(parse_multiline_input(&raw));
        }

        self.config.merge(config);
        Ok(())
    }

    pub fn apply(&mut self, overrides: Config) {
        self.config.merge(overrides);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    pub fn finish(self) -> Config {
        self.config
    }
}

fn read_input<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// YAML 1.2 core-schema booleans, the only spellings the runner accepts.
fn parse_boolean_input(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        _ => Err(ConfigError::InvalidBoolean {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_multiline_input(value: &str) -> Vec<String> {
    value
        .split(['\n', ','])
        .map(|item| item.trim().to_ascii_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_jsonc(content: &str, path: &Path) -> Result<Config, ConfigError> {
    let parse_options = ParseOptions {
        allow_trailing_commas: true,
        ..Default::default()
    };
    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let parsed = parse_to_serde_value(content, &parse_options)
        .map_err(|e| parse_error(e.to_string()))?;
    let Some(value) = parsed else {
        return Ok(Config::default());
    };
    serde_json::from_value(value).map_err(|e| parse_error(e.to_string()))
}
