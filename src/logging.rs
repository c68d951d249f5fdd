//! Logging setup
//!
//! Everything logs through the `log` facade. `init` installs a fern
//! dispatcher that writes every record to the log file and mirrors warnings
//! (or everything, in verbose mode) to stderr so the menu output stays clean.

use std::fs;
use std::path::Path;

use log::LevelFilter;

/// Installs the global logger
///
/// # Arguments
/// * `log_file` - File receiving all records at `Info` and above (`Debug` when verbose)
/// * `verbose` - Mirror everything to stderr instead of warnings only
///
/// If the log file cannot be opened the logger still installs with stderr only.
pub fn init(log_file: &Path, verbose: bool) -> Result<(), fern::InitError> {
    let file_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let stderr_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(file_level)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn)
        .chain(
            fern::Dispatch::new()
                .level(stderr_level)
                .chain(std::io::stderr()),
        );

    match open_log_file(log_file) {
        Ok(file) => dispatch = dispatch.chain(file),
        Err(e) => eprintln!("Cannot open log file {}: {}", log_file.display(), e),
    }

    dispatch.apply()?;
    log::debug!("Logging initialized, file: {}", log_file.display());
    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fern::log_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_parent_dirs() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("logs").join("nested").join("app.log");

        open_log_file(&path).expect("Log file should open");

        assert!(path.exists(), "Log file should be created");
    }
}
