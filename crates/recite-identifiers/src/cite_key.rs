//! Citation key primitives
//!
//! Base keys are ASCII-folded lowercase `surname + year`. Collision
//! resolution appends letter suffixes starting at `b` so the first entry
//! keeps the bare key, then falls back to numeric suffixes.

use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Build a base citation key from a surname and year.
///
/// The surname is NFKD-folded to ASCII and lower-cased; missing surnames
/// fall back to "anon", missing years are omitted.
pub fn base_key(surname: Option<&str>, year: Option<i32>) -> String {
    let folded = surname
        .map(fold_for_key)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "anon".to_string());

    match year {
        Some(y) => format!("{}{}", folded, y),
        None => folded,
    }
}

/// Make a key unique against already-assigned keys.
///
/// `smith2023` collides to `smith2023b`, then `smith2023c`, and so on;
/// after `z` the suffix becomes a counter.
pub fn uniquify_key(base: &str, used: &HashSet<String>) -> String {
    if !used.contains(base) {
        return base.to_string();
    }

    for suffix in 'b'..='z' {
        let candidate = format!("{}{}", base, suffix);
        if !used.contains(&candidate) {
            return candidate;
        }
    }

    let mut counter = 2u32;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if !used.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Strip characters that are not valid in a citation key
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || *c == ':')
        .collect()
}

/// NFKD-fold to lowercase ASCII alphanumerics
fn fold_for_key(s: &str) -> String {
    s.nfkd()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}
