use clap::Parser;
use std::process::ExitCode;

mod cli;
mod local;
mod run;

use cli::{Cli, Commands};
use codefence_config::Config;
use codefence_util::{default_log_dir, init_tracing, set_failed, LogLevel};
use local::{handle_check_command, handle_fix_command};
use run::{load_config, run_action, RunOverrides};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .clone()
        .or_else(|| {
            // Errors resurface when the command loads its config.
            load_config(cli.config.as_deref(), Config::default())
                .ok()
                .and_then(|config| config.log_level)
        })
        .filter(|l| !l.trim().is_empty())
        .map(|l| LogLevel::parse(&l))
        .or_else(|| {
            std::env::var("RUNNER_DEBUG")
                .is_ok_and(|v| v == "1")
                .then_some(LogLevel::Debug)
        });
    let log_dir = cli
        .log_dir
        .clone()
        .map(|dir| dir.unwrap_or_else(default_log_dir));
    let _log_guard = init_tracing(level, log_dir.as_deref());

    let result = match cli.command {
        Commands::Run {
            event,
            language,
            silent,
            what_to_update,
            token,
            api_url,
        } => {
            let overrides = RunOverrides {
                language,
                silent,
                what_to_update,
                token,
                api_url,
            };
            run_action(cli.config.as_deref(), event.as_deref(), overrides)
                .await
                .map(|_| ExitCode::SUCCESS)
        }
        Commands::Check { file, format } => handle_check_command(&file, format),
        Commands::Fix {
            file,
            language,
            write,
        } => handle_fix_command(cli.config.as_deref(), &file, language, write),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            let message = format!("{err:#}");
            tracing::error!("{}", message);
            set_failed(&message);
            ExitCode::FAILURE
        }
    }
}
