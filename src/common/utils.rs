use std::str::FromStr;

use colored::Colorize;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use solana_sdk::pubkey::Pubkey;

use crate::common::constants::PROJECT_NAME;
use crate::markets::errors::DlmmError;

pub fn from_str(input: &str) -> Result<Pubkey, DlmmError> {
    Pubkey::from_str(input.trim()).map_err(|_| DlmmError::InvalidPubkey {
        value: input.to_string(),
    })
}

/// Installs the global logger. Everything goes to stderr: stdout is the protocol channel.
pub fn setup_logger(debug: bool) -> Result<(), fern::InitError> {
    let colors = ColoredLevelConfig {
        trace: Color::Cyan,
        debug: Color::Magenta,
        info: Color::Green,
        warn: Color::Red,
        error: Color::BrightRed,
        ..ColoredLevelConfig::new()
    };

    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}] {}",
                chrono::Local::now()
                    .format("[%H:%M:%S]")
                    .to_string()
                    .dimmed(),
                colors.color(record.level()),
                message
            ))
        })
        .level(LevelFilter::Warn)
        .level_for(PROJECT_NAME, level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}
