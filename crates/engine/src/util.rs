//! Small shared helpers.

/// Normalizes a raw comma-separated tag string.
///
/// Splits on commas, trims each entry, drops empties, and removes duplicates
/// keeping the first occurrence. Returns the rejoined list, which may be
/// empty.
pub fn normalize_tags(raw: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for tag in raw.split(',') {
        let tag = tag.trim();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen.join(",")
}
