//! Filename counter: derive the next free number from a folder listing
//! and format sequential filenames.
//!
//! Names look like `prefix + digits + suffix + extension`. Matching is
//! case-insensitive and purely literal: the prefix and `suffix + extension`
//! anchor the digit span, nothing else is parsed.

use std::path::Path;

/// Extension of every image we write.
pub const IMAGE_EXTENSION: &str = ".jpg";

/// Minimum number of digits in a formatted counter.
pub const DEFAULT_PAD_WIDTH: usize = 4;

/// Extracts the counter from a single filename, if it matches the pattern.
///
/// The span between the anchors must be non-empty, all ASCII digits, and
/// fit in a `u64`. Leading zeros are accepted, so `"0007"` and `"7"` both
/// parse to 7.
pub fn parse_counter(name: &str, prefix: &str, suffix: &str, extension: &str) -> Option<u64> {
    let name = name.to_lowercase();
    let prefix = prefix.to_lowercase();
    let tail = format!("{}{}", suffix, extension).to_lowercase();

    if !name.starts_with(&prefix) || !name.ends_with(&tail) {
        return None;
    }
    // Prefix and tail may overlap on short names
    if name.len() < prefix.len() + tail.len() {
        return None;
    }

    let digits = &name[prefix.len()..name.len() - tail.len()];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Scans `dir` (non-recursively) and returns one more than the highest
/// counter found, or 1 when nothing matches or `dir` is not a directory.
pub fn next_counter(dir: &Path, prefix: &str, suffix: &str, extension: &str) -> u64 {
    if !dir.is_dir() {
        return 1;
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("[NAMING] Cannot list {}: {}", dir.display(), e);
            return 1;
        }
    };

    let highest = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            parse_counter(&name.to_string_lossy(), prefix, suffix, extension)
        })
        .max();

    log::debug!(
        "[NAMING] Highest counter in {} is {:?}",
        dir.display(),
        highest
    );

    highest.map_or(1, |n| n.saturating_add(1))
}

/// Builds `prefix + counter + suffix + extension`, zero-padding the counter
/// to at least `pad_width` digits. Wider counters are never truncated.
pub fn format_filename(
    prefix: &str,
    counter: u64,
    suffix: &str,
    extension: &str,
    pad_width: usize,
) -> String {
    format!(
        "{}{:0width$}{}{}",
        prefix,
        counter,
        suffix,
        extension,
        width = pad_width
    )
}
