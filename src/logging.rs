use std::{fs::File, io::Write, path::Path};

use anyhow::Context;
use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::cli::LogLevel;

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

/// Logs to `log_file` (truncated) when given, to stderr otherwise.
pub fn init_logger(level: LogLevel, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        })
        .filter_level(level.into());

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Could not create log file: {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder.try_init()?;
    Ok(())
}
