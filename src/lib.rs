//! Sanitizes untrusted path text so it can be joined onto a trusted base
//! directory without escaping it.
//!
//! ```
//! assert_eq!(pathward::sanitize("../../etc/passwd"), "etc/passwd");
//! assert_eq!(pathward::sanitize("%2e%2e%2fetc%2fpasswd"), "etc/passwd");
//! assert_eq!(pathward::sanitize(500), "500");
//! ```

pub mod config;
pub mod error;
pub mod rules;
pub mod sanitizer;
pub mod util;

use std::fmt::Display;
use std::path::{Path, PathBuf};

pub use crate::config::{DecodeRule, Options};
pub use crate::error::{Error, Result};
pub use crate::sanitizer::Sanitizer;

/// Sanitizes `input` with the default rules.
pub fn sanitize(input: impl Display) -> String {
    Sanitizer::shared().sanitize(input)
}

/// Sanitizes `input` with `options` merged over the default rules.
///
/// Build a [`Sanitizer`] once instead when the same options serve many calls.
pub fn sanitize_with(input: impl Display, options: &Options) -> Result<String> {
    Ok(Sanitizer::new(options)?.sanitize(input))
}

/// Sanitizes `input` with the default rules and joins it onto `base`.
pub fn join(base: impl AsRef<Path>, input: impl Display) -> PathBuf {
    Sanitizer::shared().join(base, input)
}
