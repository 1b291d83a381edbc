use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use codefence_core::TargetKind;

use crate::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Raw, layered configuration. Every field is optional so sources can be
/// merged; see [`Config::resolve`] for the validated form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub what_to_update: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", alias = "api_url")]
    pub api_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", alias = "log_level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Later values win.
    pub fn merge(&mut self, other: Config) {
        merge_option_replace(&mut self.language, other.language);
        merge_option_replace(&mut self.silent, other.silent);
        merge_option_replace(&mut self.what_to_update, other.what_to_update);
        merge_option_replace(&mut self.github_token, other.github_token);
        merge_option_replace(&mut self.api_url, other.api_url);
        merge_option_replace(&mut self.log_level, other.log_level);
    }

    /// Validates the merged configuration. The token is only demanded when
    /// `require_token` is set, so local commands can run without one.
    pub fn resolve(&self, require_token: bool) -> Result<ActionConfig, ConfigError> {
        let language = non_empty(self.language.as_deref())
            .ok_or(ConfigError::Missing("language"))?
            .to_string();

        let github_token = match non_empty(self.github_token.as_deref()) {
            Some(token) => Some(token.to_string()),
            None if require_token => return Err(ConfigError::Missing("github-token")),
            None => None,
        };

        let api_url = non_empty(self.api_url.as_deref()).unwrap_or(DEFAULT_API_URL);
        Url::parse(api_url).map_err(|e| ConfigError::InvalidUrl {
            url: api_url.to_string(),
            reason: e.to_string(),
        })?;

        let what_to_update = match &self.what_to_update {
            Some(items) => UpdateTargets::parse(items),
            None => UpdateTargets::all(),
        };

        Ok(ActionConfig {
            language,
            silent: self.silent.unwrap_or(false),
            what_to_update,
            github_token,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

fn merge_option_replace<T>(target: &mut Option<T>, source: Option<T>) {
    if let Some(value) = source {
        *target = Some(value);
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateTarget {
    Issue,
    PullRequest,
    All,
}

impl UpdateTarget {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "issue" => Some(UpdateTarget::Issue),
            "pull_request" => Some(UpdateTarget::PullRequest),
            "all" => Some(UpdateTarget::All),
            _ => None,
        }
    }
}

/// Which event kinds a run is allowed to touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTargets(Vec<UpdateTarget>);

impl UpdateTargets {
    pub fn all() -> Self {
        Self(vec![UpdateTarget::All])
    }

    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn parse<S: AsRef<str>>(items: &[S]) -> Self {
        let mut targets = Vec::new();
        for item in items {
            let item = item.as_ref().trim();
            if item.is_empty() {
                continue;
            }
            match UpdateTarget::parse(item) {
                Some(target) if !targets.contains(&target) => targets.push(target),
                Some(_) => {}
                None => warn!(value = %item, "ignoring unknown what-to-update entry"),
            }
        }
        Self(targets)
    }

    pub fn allows(&self, kind: TargetKind) -> bool {
        self.0.iter().any(|target| match target {
            UpdateTarget::All => true,
            UpdateTarget::Issue => kind == TargetKind::Issue,
            UpdateTarget::PullRequest => kind == TargetKind::PullRequest,
        })
    }

    pub fn targets(&self) -> &[UpdateTarget] {
        &self.0
    }
}

impl FromIterator<UpdateTarget> for UpdateTargets {
    fn from_iter<I: IntoIterator<Item = UpdateTarget>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Validated configuration, built once per run and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionConfig {
    pub language: String,
    pub silent: bool,
    pub what_to_update: UpdateTargets,
    pub github_token: Option<String>,
    pub api_url: String,
}

impl ActionConfig {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            silent: false,
            what_to_update: UpdateTargets::all(),
            github_token: None,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn with_targets(mut self, targets: UpdateTargets) -> Self {
        self.what_to_update = targets;
        self
    }
}
