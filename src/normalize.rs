/// Reduce a tournament name to its matching key: lowercase ASCII letters
/// and digits only. "Blue Key", "BlueKey" and "blue-key!!" share a key.
///
/// Folder names and reference table names must both go through this
/// function, or lookups silently stop matching.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
