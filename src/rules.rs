use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::config::{DecodeRule, Options};
use crate::error::{Error, Result};

/// Lowercase percent-encodings of `.`, `/` and `\`, applied in this order.
pub const DEFAULT_DECODE: &[(&str, &str)] = &[("%2e", "."), ("%2f", "/"), ("%5c", "\\")];

/// A `..` segment with a separator on both sides.
pub const DEFAULT_PARENT_DIRECTORY_PATTERN: &str = r"[/\\]\.\.[/\\]";

pub const DEFAULT_DISALLOWED_CHAR_PATTERN: &str = r#"[:$!'"@+`|=]"#;

/// The compiled rule set of a sanitizer: caller options merged over the defaults.
#[derive(Debug, Clone)]
pub struct Rules {
    decode: Vec<(Regex, String)>,
    parent_directory: Regex,
    disallowed_chars: Regex,
    percent_decode: bool,
}

impl Rules {
    /// Compiles the built-in defaults.
    pub fn defaults() -> Self {
        Self::merge(&Options::default()).expect("built-in sanitizer patterns compile")
    }

    /// Builds a new rule set from `options`, taking the default for every
    /// field that is absent or empty.
    pub fn merge(options: &Options) -> Result<Self> {
        let decode = match options.decode.as_deref() {
            Some(rules) if !rules.is_empty() => rules
                .iter()
                .map(|DecodeRule { pattern, replacement }| {
                    compile("decode", pattern, false).map(|regex| (regex, replacement.clone()))
                })
                .collect::<Result<Vec<_>>>()?,
            _ => DEFAULT_DECODE
                .iter()
                .map(|(pattern, replacement)| {
                    compile("decode", pattern, false).map(|regex| (regex, replacement.to_string()))
                })
                .collect::<Result<Vec<_>>>()?,
        };

        let parent_directory = compile(
            "parent_directory_pattern",
            non_empty(&options.parent_directory_pattern)
                .unwrap_or(DEFAULT_PARENT_DIRECTORY_PATTERN),
            false,
        )?;
        let disallowed_chars = compile(
            "disallowed_char_pattern",
            non_empty(&options.disallowed_char_pattern)
                .unwrap_or(DEFAULT_DISALLOWED_CHAR_PATTERN),
            true,
        )?;

        Ok(Rules {
            decode,
            parent_directory,
            disallowed_chars,
            percent_decode: options.percent_decode.unwrap_or(false),
        })
    }

    /// Applies the optional full percent-decode, then every decode rule in
    /// order, each over the whole output of the previous one.
    pub fn decode(&self, text: &str) -> String {
        let mut text = if self.percent_decode {
            percent_decode_fully(text)
        } else {
            text.to_owned()
        };
        for (pattern, replacement) in &self.decode {
            text = pattern.replace_all(&text, replacement.as_str()).into_owned();
        }
        text
    }

    /// Replaces parent-directory segments with `/` until none are left.
    ///
    /// Matches never overlap, so `/../../` needs a second round once the first
    /// replacement has exposed the next separator.
    pub fn strip_parent_directories(&self, mut text: String) -> String {
        for _ in 0..=text.len() {
            let next = self.parent_directory.replace_all(&text, "/");
            if next == text.as_str() {
                break;
            }
            text = next.into_owned();
        }
        text
    }

    pub fn strip_disallowed(&self, text: &str) -> String {
        self.disallowed_chars.replace_all(text, "").into_owned()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn compile(field: &'static str, pattern: &str, allow_empty_match: bool) -> Result<Regex> {
    let regex = Regex::new(pattern).map_err(|source| Error::InvalidPattern { field, source })?;
    if !allow_empty_match && regex.is_match("") {
        return Err(Error::InvalidConfiguration(format!(
            "pattern for `{}` matches empty text: {:?}",
            field, pattern
        )));
    }
    Ok(regex)
}

/// Percent-decodes until nothing changes, so `%252e` ends up as `.`.
/// Every round that changes the text shortens it.
fn percent_decode_fully(text: &str) -> String {
    let mut current = text.to_owned();
    loop {
        let decoded = percent_decode_str(&current).decode_utf8_lossy().into_owned();
        if decoded == current {
            return current;
        }
        current = decoded;
    }
}
