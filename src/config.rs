use std::path::Path;

use config::{Config, ConfigError, Environment, File, Value, ValueKind};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Key under which sanitizer options live in a configuration source.
pub const SECTION: &str = "sanitizer";

/// Base name of the optional configuration file looked up in the working directory.
pub const FILE_NAME: &str = "pathward";

/// Prefix for environment overrides, e.g. `PATHWARD_SANITIZER__PERCENT_DECODE=true`.
pub const ENV_PREFIX: &str = "PATHWARD";

/// A single decode substitution: every match of `pattern` is replaced with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DecodeRule {
    pub pattern: String,
    pub replacement: String,
}

impl DecodeRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        DecodeRule {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Caller-supplied sanitizer options.
///
/// Every field is optional. Absent or empty fields fall back to the built-in
/// defaults when a [`Sanitizer`](crate::Sanitizer) is built; the options
/// value itself is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Options {
    /// Ordered substitutions applied before any other step.
    pub decode: Option<Vec<DecodeRule>>,
    /// Separator-bounded parent-directory segment, replaced with `/`.
    pub parent_directory_pattern: Option<String>,
    /// Characters stripped from the final output.
    pub disallowed_char_pattern: Option<String>,
    /// Fully percent-decode the input before the decode rules run.
    pub percent_decode: Option<bool>,
}

impl Options {
    /// Loads options from an optional file and `PATHWARD_*` environment variables.
    ///
    /// Without an explicit path, `pathward.{toml,yaml,json,...}` in the working
    /// directory is used if it exists. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(FILE_NAME).required(false),
        };
        let config = Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?;

        let options = Self::from_config(&config)?;
        tracing::debug!("Loaded sanitizer options: {:?}", options);
        Ok(options)
    }

    /// Reads the `sanitizer` section of an already built configuration.
    /// A missing section means all defaults.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.get::<Value>(SECTION) {
            Ok(value) => Self::from_value(value),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Interprets a dynamically typed configuration value.
    ///
    /// Nil and the empty string mean "no configuration". A table is
    /// deserialized into options. Anything else is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        if is_blank(&value.kind) {
            return Ok(Self::default());
        }
        if !matches!(value.kind, ValueKind::Table(_)) {
            return Err(Error::InvalidConfiguration(format!(
                "expected a table of sanitizer options, found {}",
                kind_name(&value.kind)
            )));
        }
        value
            .try_deserialize()
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Only nil and `""` count as "no configuration"; `false`, `0` and arrays are rejected.
fn is_blank(kind: &ValueKind) -> bool {
    match kind {
        ValueKind::Nil => true,
        ValueKind::String(s) => s.is_empty(),
        _ => false,
    }
}

fn kind_name(kind: &ValueKind) -> &'static str {
    match kind {
        ValueKind::Nil => "nothing",
        ValueKind::Boolean(_) => "a boolean",
        ValueKind::String(_) => "a string",
        ValueKind::Table(_) => "a table",
        ValueKind::Array(_) => "an array",
        _ => "a number",
    }
}
