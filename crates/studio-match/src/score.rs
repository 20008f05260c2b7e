//! Weighted substring scoring and ranking of materials and comparison cards.
//!
//! A query token "hits" a field when it occurs in the field's normalized
//! text. Each hit is worth `token_weight(token) × field weight`; shared
//! dimensions and eras add capped bonuses. Scores are rounded to one decimal
//! and candidates scoring `<= 0` are dropped. Results are sorted by
//! descending score with a stable sort, so ties keep candidate order.

use studio_core::traits::Ranker;
use studio_core::types::{
    CompareCard, CompareMatch, Credibility, Match, MatchReason, Material, MaterialMatch, Query,
};

use crate::profile::QueryProfile;
use crate::tables::DomainTables;
use crate::text::{card_text, MaterialText};

pub const MATERIAL_LIMIT: usize = 10;
pub const CARD_LIMIT: usize = 5;
pub const MAX_REASON_TOKENS: usize = 10;

const TITLE_WEIGHT: f64 = 8.0;
const PEOPLE_WEIGHT: f64 = 6.0;
const EVENTS_WEIGHT: f64 = 6.0;
const EXCERPT_WEIGHT: f64 = 4.0;
const NOTES_WEIGHT: f64 = 3.0;
const URL_BONUS: f64 = 1.0;
const MATERIAL_DIMENSION_BONUS: f64 = 6.0;
const MATERIAL_DYNASTY_BONUS: f64 = 4.0;
const CREDIBILITY_ADJUSTMENT: f64 = 1.0;

const CARD_FIELD_WEIGHT: f64 = 5.0;
const CARD_DYNASTY_BONUS: f64 = 3.0;
const CARD_DIMENSION_BONUS: f64 = 2.0;

const DIMENSION_CAP: usize = 3;
const DYNASTY_CAP: usize = 2;

/// Per-hit weight by token length in characters: longer tokens are more
/// specific.
pub fn token_weight(token: &str) -> f64 {
    match token.chars().count() {
        n if n >= 6 => 2.2,
        n if n >= 4 => 1.8,
        n if n >= 2 => 1.2,
        _ => 0.8,
    }
}

/// Tokens occurring in `hay`, in token order.
fn hits<'t>(hay: &str, tokens: &'t [String]) -> Vec<&'t str> {
    tokens
        .iter()
        .map(String::as_str)
        .filter(|t| !t.is_empty() && hay.contains(t))
        .collect()
}

fn weighted(hits: &[&str], field_weight: f64) -> f64 {
    hits.iter().map(|t| field_weight * token_weight(t)).sum()
}

fn round1(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

fn uniq_tokens(groups: &[&[&str]], cap: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for t in groups.iter().flat_map(|g| g.iter()) {
        if out.len() == cap {
            break;
        }
        if !out.iter().any(|o| o == t) {
            out.push((*t).to_string());
        }
    }
    out
}

fn capped<T>(mut v: Vec<T>, cap: usize) -> Vec<T> {
    v.truncate(cap);
    v
}

fn finish<R>(mut scored: Vec<Match<'_, R>>, limit: usize) -> Vec<Match<'_, R>> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}

/// Ranks library materials.
#[derive(Debug, Clone, Copy)]
pub struct MaterialRanker<'t> {
    tables: &'t DomainTables,
    default_limit: usize,
}

impl Default for MaterialRanker<'static> {
    fn default() -> Self {
        Self::new(DomainTables::standard())
    }
}

impl<'t> MaterialRanker<'t> {
    pub fn new(tables: &'t DomainTables) -> Self {
        Self { tables, default_limit: MATERIAL_LIMIT }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Score one material. `None` when nothing in the query relates to it
    /// or the rounded score is not positive.
    pub fn score(&self, profile: &QueryProfile, m: &Material) -> Option<(f64, MatchReason)> {
        let text = MaterialText::build(m);
        let tokens = &profile.tokens;

        let hits_title = hits(&text.title, tokens);
        let hits_people = hits(&text.people, tokens);
        let hits_events = hits(&text.events, tokens);
        let hits_excerpt = hits(&text.excerpt, tokens);
        let hits_notes = hits(&text.notes, tokens);
        let url_hit = !text.url.is_empty() && !hits(&text.url, tokens).is_empty();

        let mut score = weighted(&hits_title, TITLE_WEIGHT)
            + weighted(&hits_people, PEOPLE_WEIGHT)
            + weighted(&hits_events, EVENTS_WEIGHT)
            + weighted(&hits_excerpt, EXCERPT_WEIGHT)
            + weighted(&hits_notes, NOTES_WEIGHT);
        if url_hit {
            score += URL_BONUS;
        }

        let dim_hits = capped(
            profile.dimensions.iter().copied().filter(|d| m.dimensions.contains(d)).collect(),
            DIMENSION_CAP,
        );
        score += dim_hits.len() as f64 * MATERIAL_DIMENSION_BONUS;

        let dyn_hits = capped(
            profile.dynasties.iter().copied().filter(|d| m.dynasties.contains(d)).collect(),
            DYNASTY_CAP,
        );
        score += dyn_hits.len() as f64 * MATERIAL_DYNASTY_BONUS;

        // Credibility only adjusts records the query actually relates to.
        if score <= 0.0 {
            return None;
        }
        match m.credibility {
            Credibility::High => score += CREDIBILITY_ADJUSTMENT,
            Credibility::Low => score -= CREDIBILITY_ADJUSTMENT,
            Credibility::Medium => {}
        }

        let score = round1(score);
        if score <= 0.0 {
            return None;
        }

        let reason = MatchReason {
            tokens: uniq_tokens(
                &[
                    hits_title.as_slice(),
                    hits_people.as_slice(),
                    hits_events.as_slice(),
                    hits_excerpt.as_slice(),
                    hits_notes.as_slice(),
                ],
                MAX_REASON_TOKENS,
            ),
            dimensions: dim_hits,
            dynasties: dyn_hits,
        };
        Some((score, reason))
    }

    pub fn rank_profile<'a>(
        &self,
        profile: &QueryProfile,
        materials: &'a [Material],
        limit: usize,
    ) -> Vec<MaterialMatch<'a>> {
        let scored: Vec<MaterialMatch<'a>> = materials
            .iter()
            .filter_map(|m| {
                let (score, reason) = self.score(profile, m)?;
                tracing::trace!(id = %m.id, score, "material scored");
                Some(Match { record: m, score, reason })
            })
            .collect();
        tracing::debug!(
            tokens = profile.tokens.len(),
            candidates = materials.len(),
            matched = scored.len(),
            limit,
            "materials ranked"
        );
        finish(scored, limit)
    }
}

impl Ranker<Material> for MaterialRanker<'_> {
    fn default_limit(&self) -> usize {
        self.default_limit
    }

    fn rank<'a>(&self, query: &Query, candidates: &'a [Material], limit: Option<usize>) -> Vec<MaterialMatch<'a>> {
        let profile = QueryProfile::extract(query, self.tables);
        self.rank_profile(&profile, candidates, limit.unwrap_or(self.default_limit))
    }
}

/// Ranks comparison cards against one combined text field.
#[derive(Debug, Clone, Copy)]
pub struct CardRanker<'t> {
    tables: &'t DomainTables,
    default_limit: usize,
}

impl Default for CardRanker<'static> {
    fn default() -> Self {
        Self::new(DomainTables::standard())
    }
}

impl<'t> CardRanker<'t> {
    pub fn new(tables: &'t DomainTables) -> Self {
        Self { tables, default_limit: CARD_LIMIT }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn score(&self, profile: &QueryProfile, c: &CompareCard) -> Option<(f64, MatchReason)> {
        let hay = card_text(c);
        let hit_tokens = hits(&hay, &profile.tokens);
        let mut score = weighted(&hit_tokens, CARD_FIELD_WEIGHT);

        let dyn_hits = capped(
            profile.dynasties.iter().copied().filter(|d| c.dynasties.contains(d)).collect(),
            DYNASTY_CAP,
        );
        score += dyn_hits.len() as f64 * CARD_DYNASTY_BONUS;

        // Cards carry no dimension field; detect from their own text.
        let dim_hits = capped(
            self.tables
                .detect_dimensions(&hay)
                .into_iter()
                .filter(|d| profile.dimensions.contains(d))
                .collect(),
            DIMENSION_CAP,
        );
        score += dim_hits.len() as f64 * CARD_DIMENSION_BONUS;

        let score = round1(score);
        if score <= 0.0 {
            return None;
        }
        let reason = MatchReason {
            tokens: uniq_tokens(&[hit_tokens.as_slice()], MAX_REASON_TOKENS),
            dimensions: dim_hits,
            dynasties: dyn_hits,
        };
        Some((score, reason))
    }

    pub fn rank_profile<'a>(
        &self,
        profile: &QueryProfile,
        cards: &'a [CompareCard],
        limit: usize,
    ) -> Vec<CompareMatch<'a>> {
        let scored: Vec<CompareMatch<'a>> = cards
            .iter()
            .filter_map(|c| {
                let (score, reason) = self.score(profile, c)?;
                tracing::trace!(id = %c.id, score, "card scored");
                Some(Match { record: c, score, reason })
            })
            .collect();
        tracing::debug!(
            tokens = profile.tokens.len(),
            candidates = cards.len(),
            matched = scored.len(),
            limit,
            "cards ranked"
        );
        finish(scored, limit)
    }
}

impl Ranker<CompareCard> for CardRanker<'_> {
    fn default_limit(&self) -> usize {
        self.default_limit
    }

    fn rank<'a>(&self, query: &Query, candidates: &'a [CompareCard], limit: Option<usize>) -> Vec<CompareMatch<'a>> {
        let profile = QueryProfile::extract(query, self.tables);
        self.rank_profile(&profile, candidates, limit.unwrap_or(self.default_limit))
    }
}

/// Rank `materials` against `query` with the standard tables.
/// `limit` defaults to 10.
pub fn match_materials<'a>(query: &Query, materials: &'a [Material], limit: Option<usize>) -> Vec<MaterialMatch<'a>> {
    MaterialRanker::default().rank(query, materials, limit)
}

/// Rank comparison `cards` against `query` with the standard tables.
/// `limit` defaults to 5.
pub fn match_compare_cards<'a>(query: &Query, cards: &'a [CompareCard], limit: Option<usize>) -> Vec<CompareMatch<'a>> {
    CardRanker::default().rank(query, cards, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_weight_tiers() {
        assert_eq!(token_weight("a"), 0.8);
        assert_eq!(token_weight("财政"), 1.2);
        assert_eq!(token_weight("青苗法"), 1.2);
        assert_eq!(token_weight("王安石变"), 1.8);
        assert_eq!(token_weight("王安石变法与"), 2.2);
    }

    #[test]
    fn reason_tokens_dedupe_across_fields_and_cap() {
        let a = ["x1", "x2"];
        let b = ["x2", "x3"];
        assert_eq!(uniq_tokens(&[&a[..], &b[..]], 10), vec!["x1", "x2", "x3"]);
        assert_eq!(uniq_tokens(&[&a[..], &b[..]], 2), vec!["x1", "x2"]);
    }

    #[test]
    fn rounding_to_one_decimal() {
        assert_eq!(round1(9.600_000_000_000_001), 9.6);
        assert_eq!(round1(14.46), 14.5);
    }
}
