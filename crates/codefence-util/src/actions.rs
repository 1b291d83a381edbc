//! Workflow commands understood by the GitHub Actions runner.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";
const OUTPUT_DELIMITER: &str = "ghadelimiter_codefence";

pub fn is_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Sets a step output. Writes to the `GITHUB_OUTPUT` file when the runner
/// provides one, otherwise falls back to the legacy stdout command.
pub fn set_output(name: &str, value: &str) -> io::Result<()> {
    match std::env::var_os(OUTPUT_FILE_ENV).filter(|p| !p.is_empty()) {
        Some(path) => append_output(Path::new(&path), name, value),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout)?;
            writeln!(
                stdout,
                "::set-output name={}::{}",
                escape_property(name),
                escape_data(value)
            )
        }
    }
}

/// Emits an error annotation. The caller decides the exit status.
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}

pub(crate) fn append_output(path: &Path, name: &str, value: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if value.contains('\n') {
        if value.contains(OUTPUT_DELIMITER) || name.contains(OUTPUT_DELIMITER) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "output value contains the delimiter",
            ));
        }
        writeln!(file, "{name}<<{OUTPUT_DELIMITER}\n{value}\n{OUTPUT_DELIMITER}")
    } else {
        writeln!(file, "{name}={value}")
    }
}

pub(crate) fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub(crate) fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
