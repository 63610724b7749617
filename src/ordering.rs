use std::cmp::Ordering;

use crate::types::TournamentDateBinding;

/// Order a season's tournaments chronologically.
///
/// Dated tournaments come first, earliest start date first. Undated ones
/// follow in name order. The sort is stable, so tournaments sharing a
/// start date keep their input order.
pub fn sort_bindings(mut bindings: Vec<TournamentDateBinding>) -> Vec<TournamentDateBinding> {
    bindings.sort_by(compare_bindings);
    bindings
}

pub fn compare_bindings(a: &TournamentDateBinding, b: &TournamentDateBinding) -> Ordering {
    match (a.resolved_date, b.resolved_date) {
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => collate_names(a.name(), b.name()),
    }
}

/// Dictionary-style name order: case-insensitive first, and on a tie the
/// lowercase spelling sorts before the uppercase one.
fn collate_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
