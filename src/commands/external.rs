use std::io::Write;
use std::process::ExitStatus;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use tokio::process::Command;
use tracing::{debug, info};

/// Split a configured program line such as `code --wait` into program and
/// arguments.
pub fn parse_program(command: &str) -> Result<(String, Vec<String>)> {
    let mut words =
        shell_words::split(command).wrap_err_with(|| format!("Invalid command line: {command}"))?;
    if words.is_empty() {
        return Err(eyre!("No program configured"));
    }
    let program = words.remove(0);
    Ok((program, words))
}

/// Write `content` to a temporary `.json` file and run `command` on it,
/// waiting for it to exit. The file is removed afterwards.
///
/// The caller hands the terminal over before calling this.
pub async fn run_external(command: &str, content: &str) -> Result<ExitStatus> {
    let (program, args) = parse_program(command)?;

    let mut file = tempfile::Builder::new()
        .prefix("lazyaliyun-")
        .suffix(".json")
        .tempfile()
        .wrap_err("Failed to create temporary file")?;
    file.write_all(content.as_bytes())?;
    file.flush()?;

    debug!(program = %program, path = %file.path().display(), "Opening external program");
    let status = Command::new(&program)
        .args(&args)
        .arg(file.path())
        .status()
        .await
        .wrap_err_with(|| format!("Failed to run {program}"))?;
    info!(program = %program, %status, "External program exited");
    Ok(status)
}
