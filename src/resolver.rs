//! Tournament folder name → reference table record.
//!
//! Folder names are typed by whoever uploaded the results, so they rarely
//! match the reference table verbatim: "Blue Key" vs "Blue Key Speech &
//! Debate Tournament", "2025 Glenbrooks" vs "Glenbrooks". Matching runs in
//! tiers, first hit wins.

use serde::Serialize;

use crate::datetable::{DateRecord, DateTable};
use crate::normalize::normalize;

/// Words dropped from both sides in the last matching tier. Already in
/// normalized form.
pub const NAME_SUFFIXES: &[&str] = &[
    "invitational",
    "invitation",
    "tournament",
    "classic",
    "memorial",
    "forum",
];

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Normalized names are equal
    Exact,
    /// One normalized name contains the other
    Substring,
    /// Containment after dropping [`NAME_SUFFIXES`]
    SuffixStripped,
}

/// Find the reference record for a tournament folder.
pub fn resolve<'t>(folder_name: &str, table: &'t DateTable) -> Option<&'t DateRecord> {
    resolve_with_tier(folder_name, table).map(|(record, _)| record)
}

/// Like [`resolve`], also reporting which tier matched.
///
/// Tiers 2 and 3 walk the table in order and take the first entry that
/// fits, so an earlier row can shadow a better one further down.
pub fn resolve_with_tier<'t>(
    folder_name: &str,
    table: &'t DateTable,
) -> Option<(&'t DateRecord, MatchTier)> {
    let key = normalize(folder_name);
    if key.is_empty() {
        return None;
    }

    if let Some(record) = table.get(&key) {
        return Some((record, MatchTier::Exact));
    }

    if let Some(record) = first_containing(&key, table.iter()) {
        return Some((record, MatchTier::Substring));
    }

    let stripped = strip_suffixes(&key);
    first_containing(
        &stripped,
        table.iter().map(|(k, r)| (strip_suffixes(k), r)),
    )
    .map(|record| (record, MatchTier::SuffixStripped))
}

/// First entry whose key contains `needle` or is contained in it.
/// Empty strings on either side never match.
fn first_containing<'t, K: AsRef<str>>(
    needle: &str,
    mut entries: impl Iterator<Item = (K, &'t DateRecord)>,
) -> Option<&'t DateRecord> {
    if needle.is_empty() {
        return None;
    }
    entries
        .find(|(k, _)| {
            let k: &str = k.as_ref();
            !k.is_empty() && (needle.contains(k) || k.contains(needle))
        })
        .map(|(_, record)| record)
}

/// Remove every occurrence of the common suffix words from a normalized
/// name.
pub fn strip_suffixes(key: &str) -> String {
    NAME_SUFFIXES
        .iter()
        .fold(key.to_string(), |acc, suffix| acc.replace(suffix, ""))
}
