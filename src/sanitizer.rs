use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use config::Value;

use crate::config::Options;
use crate::error::Result;
use crate::rules::Rules;
use crate::util;

static SHARED: LazyLock<Sanitizer> = LazyLock::new(|| Sanitizer {
    rules: Rules::defaults(),
});

/// Turns untrusted text into a relative path that is safe to join onto a trusted base.
///
/// The output never contains a `..` segment or a backslash, never starts or
/// ends with `/`, and contains no disallowed characters. A `Sanitizer` holds
/// only compiled rules and can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    rules: Rules,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::shared().clone()
    }
}

impl Sanitizer {
    /// Compiles `options` merged over the built-in defaults.
    pub fn new(options: &Options) -> Result<Self> {
        Ok(Sanitizer {
            rules: Rules::merge(options)?,
        })
    }

    /// Builds a sanitizer from a dynamically typed configuration value.
    /// Fails with `InvalidConfiguration` unless the value is nil, empty or a table.
    pub fn from_value(value: Value) -> Result<Self> {
        Self::new(&Options::from_value(value)?)
    }

    /// The process-wide sanitizer with the default rules, built on first use.
    pub fn shared() -> &'static Sanitizer {
        &SHARED
    }

    /// Sanitizes `input`, taking its `Display` text.
    ///
    /// Runs the full pass until its output no longer changes. Filtering
    /// characters at the end of a pass can expose new structure (`..=/`
    /// becomes `../`), and the next pass removes it. With the default rules
    /// every pass that changes the text makes it shorter or replaces a
    /// backslash, so the loop ends within the budget. A configuration that
    /// keeps growing the text gets the empty path.
    pub fn sanitize(&self, input: impl Display) -> String {
        let raw = input.to_string();
        let budget = 2 * raw.chars().count() + 2;

        let mut current = raw.clone();
        for round in 1..=budget {
            let next = self.pass(&current);
            if next == current {
                if next != raw {
                    tracing::debug!("Sanitized path {:?} -> {:?}", raw, next);
                }
                return next;
            }
            tracing::trace!("Pass {} rewrote {:?} -> {:?}", round, current, next);
            current = next;
        }

        tracing::warn!(
            "Sanitizing {:?} did not settle after {} passes, using an empty path",
            raw,
            budget
        );
        String::new()
    }

    /// Sanitizes `input` and joins it onto `base`.
    ///
    /// The result is `base` itself or a path below it. If the platform would
    /// read the sanitized text as anything but plain names, `base` is returned.
    pub fn join(&self, base: impl AsRef<Path>, input: impl Display) -> PathBuf {
        let base = base.as_ref();
        let relative = self.sanitize(input);
        util::join_confined(base, &relative).unwrap_or_else(|| {
            tracing::warn!(
                "Sanitized path {:?} is not a plain relative path, falling back to {:?}",
                relative,
                base
            );
            base.to_path_buf()
        })
    }

    fn pass(&self, text: &str) -> String {
        let decoded = self.rules.decode(text);
        let rooted = util::root(&decoded);
        let untraversed = self.rules.strip_parent_directories(rooted);
        let collapsed = util::collapse_separators(&untraversed);
        let normalized = util::normalize(&collapsed);
        let trimmed = util::trim_separators(&normalized);
        // Normalizing again as a relative path catches anything trimming exposed.
        let relative = util::normalize(trimmed);
        self.rules.strip_disallowed(&relative)
    }
}
