use std::fs::{self, File};

use colored::Colorize;
use common::env_config::Config;

/// Installs the global logger: colored lines on stderr, plain copies in the
/// optional log file.
pub fn setup(config: &Config) -> Result<(), fern::InitError> {
    let level = parse_level(&config.log_level);

    let mut dispatch = fern::Dispatch::new()
        .level(level)
        .level_for("reqwest", log::LevelFilter::Warn)
        .level_for("hyper", log::LevelFilter::Off)
        .level_for("hyper_util", log::LevelFilter::Off);

    if config.console_logging_enabled {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    let color = match record.level() {
                        log::Level::Info => "green",
                        log::Level::Warn => "yellow",
                        log::Level::Error => "red",
                        log::Level::Debug => "magenta",
                        log::Level::Trace => "bright black",
                    };
                    out.finish(format_args!(
                        "{}[{}][{}] {}",
                        chrono::Local::now().format("[%H:%M:%S]"),
                        record.target(),
                        record.level().to_string().color(color),
                        message
                    ))
                })
                .chain(std::io::stderr()),
        );
    }

    if let Some(path) = &config.log_file {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(fern::InitError::Io)?;
            }
        }
        if !path.exists() {
            File::create(path).map_err(fern::InitError::Io)?;
        }
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{}[{}][{}] {}",
                        chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                        record.target(),
                        record.level(),
                        message
                    ))
                })
                .chain(fern::log_file(path)?),
        );
    }

    dispatch.apply()?;
    Ok(())
}

/// Maps a level name to a filter; unknown names mean `Info`.
pub fn parse_level(level: &str) -> log::LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "off" => log::LevelFilter::Off,
        "error" => log::LevelFilter::Error,
        "warn" | "warning" => log::LevelFilter::Warn,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("DEBUG"), log::LevelFilter::Debug);
        assert_eq!(parse_level(" warning "), log::LevelFilter::Warn);
        assert_eq!(parse_level("off"), log::LevelFilter::Off);
        assert_eq!(parse_level("chatty"), log::LevelFilter::Info);
    }
}
