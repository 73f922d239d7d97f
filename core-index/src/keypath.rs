//! Key decomposition helpers
//!
//! Pure functions deriving display names, extensions, and ancestor
//! folder chains from flat object-store keys. The store has no native
//! directories; the folder hierarchy the index presents is synthesized
//! entirely from `/` separators in the keys.

/// Extract the lowercase extension from a key.
///
/// The dot must fall after the last path separator; a dot inside a
/// folder segment does not mark an extension. Keys ending in a bare dot
/// have no extension.
pub fn extension(key: &str) -> Option<String> {
    let segment = match key.rfind('/') {
        Some(idx) => &key[idx + 1..],
        None => key,
    };

    match segment.rfind('.') {
        Some(idx) if idx + 1 < segment.len() => Some(segment[idx + 1..].to_lowercase()),
        _ => None,
    }
}

/// The last non-empty `/`-delimited segment of a key, or the key itself
/// if it has no segments. Works for both file keys and trailing-slash
/// folder keys.
pub fn display_name(key: &str) -> String {
    key.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(key)
        .to_string()
}

/// Ordered `(folder_key, folder_name)` pairs for every proper ancestor
/// directory of `key`, shallowest first. Each folder key ends in `/`.
/// Root-level keys yield an empty list.
pub fn ancestor_folders(key: &str) -> Vec<(String, String)> {
    let trimmed = key.strip_suffix('/').unwrap_or(key);

    let mut ancestors = Vec::new();
    for (idx, ch) in trimmed.char_indices() {
        if ch == '/' {
            let folder_key = &trimmed[..=idx];
            ancestors.push((folder_key.to_string(), display_name(folder_key)));
        }
    }
    ancestors
}
