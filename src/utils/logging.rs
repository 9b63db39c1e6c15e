use crate::error::AppError;
use crate::models::{MonthKey, MonthWindow};
use env_logger::{Builder, Target};
use log::{Level, LevelFilter, SetLoggerError};
use std::env;
use std::io::Write;

pub fn parse_level(value: &str) -> LevelFilter {
    match value.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

pub fn init_logging() -> Result<(), SetLoggerError> {
    let log_level = parse_level(&env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()));

    let mut builder = Builder::from_default_env();

    builder.format(|buf, record| {
        let timestamp = buf.timestamp();
        let target = record.target();

        match record.level() {
            Level::Info => writeln!(buf, "{} [INFO] [{}]: {}", timestamp, target, record.args()),
            level => writeln!(
                buf,
                "{} [{}] [{}:{}] {}: {}",
                timestamp,
                level,
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                target,
                record.args()
            ),
        }
    });

    if env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production" {
        builder.filter_module("reqwest", LevelFilter::Warn);
        builder.filter_module("hyper", LevelFilter::Warn);
    }

    // stdout carries the agenda output
    builder.filter_level(log_level).target(Target::Stderr).try_init()
}

pub fn log_source_request(source: &str, window: &MonthWindow) {
    log::debug!(
        "[Calendar] {} request {} .. {}",
        source,
        window.time_min(),
        window.time_max()
    );
}

pub fn log_month_index(month: MonthKey, events_count: usize, days_count: usize, duration_ms: u64) {
    log::info!(
        "[Calendar] Indexed {} events on {} days for {} in {}ms",
        events_count,
        days_count,
        month,
        duration_ms
    );
}

pub fn log_fetch_error(month: MonthKey, error: &AppError) {
    log::warn!("[Calendar] Loading {} failed: {}", month, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_level("ERROR"), LevelFilter::Error);
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }
}
