use thiserror::Error;

/// Errors raised while building a sanitizer from caller-supplied configuration.
///
/// Path input itself never produces an error: adversarial text is reduced
/// to a safe value instead. `InvalidPattern` is the invalid-configuration
/// case where a pattern fails to compile, split out to keep the regex error.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration value is not a table of options, or a pattern
    /// would match empty text.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A configured pattern does not compile.
    #[error("Invalid pattern for `{field}`: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    /// Reading the configuration sources failed.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_message() {
        let err = Error::InvalidConfiguration("expected a table, found integer".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: expected a table, found integer"
        );
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let source = regex::Regex::new("[").unwrap_err();
        let err = Error::InvalidPattern { field: "disallowed_char_pattern", source };
        assert!(err.to_string().starts_with("Invalid pattern for `disallowed_char_pattern`"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
