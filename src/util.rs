use std::path::{Component, Path, PathBuf};

/// Both `/` and `\` separate path segments in untrusted input.
pub fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Gives the text exactly one leading `/`: a leading separator of either kind
/// is swapped for `/`, otherwise `/` is prepended.
pub fn root(text: &str) -> String {
    let rest = text.strip_prefix(is_separator).unwrap_or(text);
    format!("/{}", rest)
}

/// Replaces every run of separators with a single `/`.
pub fn collapse_separators(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if is_separator(c) {
            if !in_run {
                out.push('/');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Lexically normalizes `/`-separated text.
///
/// Empty and `.` segments are dropped and `..` removes the segment before it.
/// A `..` with nothing left to remove is discarded, so the result never climbs
/// above its starting point. A leading `/` is kept; the empty path stays empty.
pub fn normalize(text: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in text.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }
    let joined = segments.join("/");
    if text.starts_with('/') {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Strips trailing separators, then leading ones.
pub fn trim_separators(text: &str) -> &str {
    text.trim_end_matches(is_separator)
        .trim_start_matches(is_separator)
}

/// Joins `relative` onto `base` if the platform reads it as plain file names only.
///
/// Returns `None` when `relative` would be taken as a root, a drive prefix or
/// a `.`/`..` component.
pub fn join_confined(base: &Path, relative: &str) -> Option<PathBuf> {
    if relative.is_empty() {
        return Some(base.to_path_buf());
    }
    let path = Path::new(relative);
    if path
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        Some(base.join(path))
    } else {
        None
    }
}
