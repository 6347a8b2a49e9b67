//! Log setup
//!
//! Records go through the `log` facade to `env_logger`, which writes each
//! line to stderr and to a size-rotated log file.

use crate::config::LogConfig;

use eyre::{Context, Result};
use file_rotate::{ContentLimit, FileRotate, compression::Compression, suffix::AppendCount};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};

/// Install the global logger
///
/// `LOG_LEVEL` in the environment wins over `config.level`.
///
/// # Errors
/// Returns an error if the log file cannot be opened or a logger is
/// already installed
pub fn init(config: &LogConfig) -> Result<()> {
    let file = open_log_file(config)
        .with_context(|| format!("Failed to open log file: {}", config.file.display()))?;

    let env = env_logger::Env::default().filter_or("LOG_LEVEL", config.level.as_str());
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(Tee(io::stderr(), file))))
        .try_init()
        .context("Failed to install logger")?;

    Ok(())
}

/// Open the log file for appending, creating parent directories as needed
///
/// The file rolls over to `file.1` once a write has pushed it past
/// `max_bytes`; older files shift up to `file.N` with `N = max_files`
/// and anything beyond that is deleted.
pub fn open_log_file(config: &LogConfig) -> io::Result<FileRotate<AppendCount>> {
    let path = &config.file;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    // FileRotate swallows open errors, so surface them here
    OpenOptions::new().create(true).append(true).open(path)?;

    Ok(FileRotate::new(
        path,
        AppendCount::new(config.max_files.max(1)),
        ContentLimit::BytesSurpassed(config.max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    ))
}

/// Writes every buffer to both writers
struct Tee<A, B>(A, B);

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_all(buf)?;
        self.1.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()?;
        self.1.flush()
    }
}
