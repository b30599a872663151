use std::env;
use std::str::FromStr;

use crate::core::app::ENV_PREFIX;
use crate::core::render::OutputFormat;
use crate::core::segment::DEFAULT_MIN_HEURISTIC_LEN;

const DEFAULT_WIDTH: usize = 80;
const DEFAULT_SAMPLE_RATE: u32 = 24_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Minimum length of a heuristic (unfenced) code block.
    pub min_code_len: usize,
    pub format: OutputFormat,
    /// Wrap width for text output; 0 disables wrapping.
    pub width: usize,
    /// PCM sample rate assumed by `wav` when no mime type is given.
    pub sample_rate: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_code_len: DEFAULT_MIN_HEURISTIC_LEN,
            format: OutputFormat::Text,
            width: DEFAULT_WIDTH,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { var: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { var, value } => {
                write!(f, "{} has an invalid value: {:?}", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from environment. Unset variables keep their defaults.
pub fn load() -> Result<Config, ConfigError> {
    from_lookup(|name| env::var(name).ok())
}

/// Build a config from any variable source (the environment, or a map in tests).
pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Config::default();
    Ok(Config {
        min_code_len: parse_var(&lookup, "MIN_CODE_LEN")?.unwrap_or(defaults.min_code_len),
        format: parse_var(&lookup, "FORMAT")?.unwrap_or(defaults.format),
        width: parse_var(&lookup, "WIDTH")?.unwrap_or(defaults.width),
        sample_rate: parse_var(&lookup, "SAMPLE_RATE")?.unwrap_or(defaults.sample_rate),
    })
}

fn parse_var<T, F>(lookup: &F, suffix: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let var = format!("{}{}", ENV_PREFIX, suffix);
    match lookup(&var) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => {
            let parsed = value.trim().parse();
            parsed
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue { var, value })
        }
    }
}
