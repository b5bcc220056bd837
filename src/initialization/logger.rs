//! Logger initialization.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Record};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Initializes the global logger with the given level and format.
///
/// `RUST_LOG` is read first; `level` then overrides it for this crate and as
/// the default, while the database and HTTP stacks stay capped at info.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a global logger is already set.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug toggl_trello_kpi trello-csv
/// toggl_trello_kpi --log-level debug --log-format json store-trello
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder
        .filter_level(level)
        .filter_module("sqlx", LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Info)
        .filter_module("hyper", LevelFilter::Info)
        .filter_module("hyper_util", LevelFilter::Info)
        .filter_module(env!("CARGO_CRATE_NAME"), level);

    match format {
        LogFormat::Json => builder.format(write_json),
        LogFormat::Plain => {
            colored::control::set_override(true);
            builder.format(write_plain)
        }
    };

    builder.try_init()?;
    Ok(())
}

/// `{"ts":<epoch ms>,"level":"INFO","target":"...","msg":"..."}`
fn write_json(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    let line = serde_json::json!({
        "ts": chrono::Utc::now().timestamp_millis(),
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    });
    writeln!(buf, "{line}")
}

fn write_plain(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    writeln!(
        buf,
        "{} {} [{}] {}",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        record.target().cyan(),
        colored_level(record.level()),
        record.args()
    )
}

fn colored_level(level: Level) -> ColoredString {
    let name = level.as_str();
    match level {
        Level::Error => name.red().bold(),
        Level::Warn => name.yellow(),
        Level::Info => name.green(),
        Level::Debug => name.blue(),
        Level::Trace => name.purple(),
    }
}
