use anyhow::Context;
use std::path::Path;

use codefence_config::{Config, ConfigLoader};
use codefence_github::{sync_code_blocks, EventContext, GithubClient, SyncOutcome};
use codefence_util::set_output;

/// Values given on the command line; they beat the config file and inputs.
#[derive(Debug, Default)]
pub(crate) struct RunOverrides {
    pub(crate) language: Option<String>,
    pub(crate) silent: bool,
    pub(crate) what_to_update: Vec<String>,
    pub(crate) token: Option<String>,
    pub(crate) api_url: Option<String>,
}

impl RunOverrides {
    fn into_config(self) -> Config {
        Config {
            language: self.language,
            silent: self.silent.then_some(true),
            what_to_update: (!self.what_to_update.is_empty()).then_some(self.what_to_update),
            github_token: self.token,
            api_url: self.api_url,
            log_level: None,
        }
    }
}

/// File, then environment, then `overrides`.
pub(crate) fn load_config(config_path: Option<&Path>, overrides: Config) -> anyhow::Result<Config> {
    load_config_with(config_path, overrides, codefence_config::env_lookup)
}

fn load_config_with<F>(
    config_path: Option<&Path>,
    overrides: Config,
    lookup: F,
) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut loader = ConfigLoader::new();
    if let Some(path) = config_path {
        loader
            .load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
    }
    loader
        .load_from_inputs(lookup)
        .context("Failed to read action inputs")?;
    loader.apply(overrides);
    Ok(loader.finish())
}

pub(crate) async fn run_action(
    config_path: Option<&Path>,
    event: Option<&str>,
    overrides: RunOverrides,
) -> anyhow::Result<SyncOutcome> {
    let config = load_config(config_path, overrides.into_config())?.resolve(true)?;
    let context = EventContext::from_env(event)?;
    tracing::debug!(
        event = %context.event_name,
        actor = %context.actor,
        silent = config.silent,
        "resolved run context"
    );

    let token = config
        .github_token
        .as_deref()
        .context("Input required and not supplied: github-token")?;
    let client = GithubClient::new(&config.api_url, token)?;

    let outcome = sync_code_blocks(&client, &config, &context).await?;
    set_output("fixes", &outcome.fixes.to_string()).context("Failed to set the fixes output")?;
    Ok(outcome)
}
