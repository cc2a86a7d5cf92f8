use crate::config::LoggingConfig;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::fs::OpenOptions;

const DEFAULT_LOG_PATH: &str = "wsctl.log";

pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info, // Default to Info for any other value
    }
}

pub fn setup_logger(logging: &LoggingConfig) -> Result<(), log::SetLoggerError> {
    let log_level = parse_level(logging.level());

    let colors = ColoredLevelConfig::new()
        .trace(Color::BrightBlack)
        .debug(Color::BrightBlue)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);

    let base_config = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(log_level);

    let log_path = logging.file().unwrap_or(DEFAULT_LOG_PATH);

    match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => {
            base_config.chain(file).apply()?;
        }
        Err(e) => {
            eprintln!("Warning: Failed to open log file '{log_path}': {e}");
            eprintln!("Logging to stderr instead.");
            base_config.chain(std::io::stderr()).apply()?;
        }
    }

    log::info!("Logger initialized with level: {}", logging.level());
    Ok(())
}
