// src/logging.rs
use chrono::Local;
use log::LevelFilter;
use std::fs;
use std::path::Path;

/// Sends all log output to `path`; the terminal belongs to the UI.
pub fn setup_logger(path: &Path, level: LevelFilter) -> Result<(), fern::InitError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .chain(fern::log_file(path)?)
        .apply()?;
    Ok(())
}
