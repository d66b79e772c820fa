//! Stderr logging for the CLI.
//!
//! The library never installs a logger; the `lolp` binary calls
//! [`initialize`] once at startup with the level chosen by `--loglevel`.

use std::io::stderr;

use anyhow::Context;
use clap::ValueEnum;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use fern::Dispatch;
use log::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    #[default]
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

pub fn initialize(level: LogLevel) -> anyhow::Result<()> {
    let colors = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    Dispatch::new()
        .level(level.into())
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{level}] {message}",
                level = colors.color(record.level()),
                message = message,
            ))
        })
        .chain(stderr())
        .apply()
        .context("installing logger")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_maps_to_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Debug), LevelFilter::Debug);
        assert_eq!(LevelFilter::from(LogLevel::default()), LevelFilter::Error);
    }
}
