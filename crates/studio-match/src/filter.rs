//! Plain keyword filtering for the library and comparison views.
//!
//! Unlike ranking, the whole query must occur as one substring and input
//! order is kept.

use studio_core::types::{CompareCard, Dynasty, Material};

use crate::profile::normalize_text;
use crate::text::{card_text, MaterialText};

fn material_haystack(m: &Material) -> String {
    let t = MaterialText::build(m);
    [t.title, t.url, t.tags, t.people, t.events, t.excerpt, t.notes].join(" ")
}

/// Materials tagged with `dynasty` (if given) whose text contains `query`.
/// A blank query keeps everything that passes the era filter.
pub fn filter_materials<'a>(materials: &'a [Material], query: &str, dynasty: Option<Dynasty>) -> Vec<&'a Material> {
    let query = normalize_text(query);
    materials
        .iter()
        .filter(|m| dynasty.map_or(true, |d| m.dynasties.contains(&d)))
        .filter(|m| query.is_empty() || material_haystack(m).contains(&query))
        .collect()
}

/// Cards whose combined text contains `query`. A blank query keeps all.
pub fn filter_cards<'a>(cards: &'a [CompareCard], query: &str) -> Vec<&'a CompareCard> {
    let query = normalize_text(query);
    cards
        .iter()
        .filter(|c| query.is_empty() || card_text(c).contains(&query))
        .collect()
}
