use anyhow::Context;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use codefence_config::Config;
use codefence_core::{find_missing_lang_blocks, fix_code_blocks, Finding};

use crate::cli::CheckFormat;
use crate::run::load_config;

fn read_markdown(file: &Path) -> anyhow::Result<String> {
    fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

pub(crate) fn render_report(findings: &[Finding], format: CheckFormat) -> anyhow::Result<String> {
    match format {
        CheckFormat::Text => Ok(findings
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join("\n")),
        CheckFormat::Json => Ok(serde_json::to_string_pretty(findings)?),
    }
}

pub(crate) fn handle_check_command(file: &Path, format: CheckFormat) -> anyhow::Result<ExitCode> {
    Ok(if check_file(file, format)? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Prints the report and returns whether the file is clean.
fn check_file(file: &Path, format: CheckFormat) -> anyhow::Result<bool> {
    let body = read_markdown(file)?;
    let findings = find_missing_lang_blocks(&body);
    let report = render_report(&findings, format)?;
    if !report.is_empty() {
        println!("{}", report);
    }

    if findings.is_empty() {
        tracing::info!(file = %file.display(), "All code blocks have language specified.");
        Ok(true)
    } else {
        tracing::info!(
            file = %file.display(),
            count = findings.len(),
            "code blocks without a language"
        );
        Ok(false)
    }
}

pub(crate) fn handle_fix_command(
    config_path: Option<&Path>,
    file: &Path,
    language: Option<String>,
    write: bool,
) -> anyhow::Result<ExitCode> {
    let config = load_config(
        config_path,
        Config {
            language,
            ..Default::default()
        },
    )?
    .resolve(false)?;

    let body = read_markdown(file)?;
    let result = fix_code_blocks(&body, &config.language);

    if write {
        if result.fixed {
            fs::write(file, &result.body)
                .with_context(|| format!("Failed to write {}", file.display()))?;
        }
    } else {
        print!("{}", result.body);
    }

    tracing::info!(
        file = %file.display(),
        language = %config.language,
        "Fixed {} missing code block language(s).",
        result.fix_count
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_report() {
        let findings = find_missing_lang_blocks("```\nls -la\n```\n\n```\n```");
        let report = render_report(&findings, CheckFormat::Text).unwrap();
        assert_eq!(
            report,
            "Line 1: Missing language for code block. Code starts with: \"ls -la\"\n\
             Line 5: Missing language for code block. Code starts with: \"\""
        );
    }

    #[test]
    fn test_json_report() {
        let findings = find_missing_lang_blocks("```\nls\n```");
        let report = render_report(&findings, CheckFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value[0]["line"], 1);
        assert_eq!(value[0]["preview"], "ls");
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(render_report(&[], CheckFormat::Text).unwrap(), "");
    }

    #[test]
    fn test_fix_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "# Title\n\n```\ncargo build\n```\n").unwrap();

        handle_fix_command(None, &path, Some("sh".to_string()), true).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# Title\n\n```sh\ncargo build\n```\n"
        );
    }

    #[test]
    fn test_check_file() {
        let dir = tempfile::tempdir().unwrap();
        let clean = dir.path().join("clean.md");
        fs::write(&clean, "```toml\na = 1\n```\n").unwrap();
        assert!(check_file(&clean, CheckFormat::Text).unwrap());

        let dirty = dir.path().join("dirty.md");
        fs::write(&dirty, "```\na = 1\n```\n").unwrap();
        assert!(!check_file(&dirty, CheckFormat::Json).unwrap());

        assert!(check_file(&dir.path().join("missing.md"), CheckFormat::Text).is_err());
    }
}
