use studio_core::types::{CompareCard, Material};

use crate::profile::normalize_text;

/// Normalized text fields of a material, one per scoring field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialText {
    pub title: String,
    pub excerpt: String,
    pub notes: String,
    pub people: String,
    pub events: String,
    /// Source type, credibility, eras, dimensions and citation. Filter-only.
    pub tags: String,
    pub url: String,
}

impl MaterialText {
    pub fn build(m: &Material) -> Self {
        let citation = m
            .citation
            .as_ref()
            .map(|c| {
                [
                    c.work.as_str(),
                    c.locator.as_deref().unwrap_or(""),
                    c.canonical_url.as_deref().unwrap_or(""),
                ]
                .join(" ")
            })
            .unwrap_or_default();
        let citation = normalize_text(&citation);

        let mut tags: Vec<&str> = vec![m.source_type.label(), m.credibility.label()];
        tags.extend(m.dynasties.iter().map(|d| d.label()));
        tags.extend(m.dimensions.iter().map(|d| d.label()));
        tags.push(&citation);

        Self {
            title: normalize_text(&m.title),
            excerpt: normalize_text(m.excerpt.as_deref().unwrap_or("")),
            notes: normalize_text(m.notes.as_deref().unwrap_or("")),
            people: normalize_text(&m.people.join(" ")),
            events: normalize_text(&m.events.join(" ")),
            tags: normalize_text(&tags.join(" ")),
            url: normalize_text(m.url.as_deref().unwrap_or("")),
        }
    }
}

/// All text of a comparison card as one normalized haystack.
pub fn card_text(c: &CompareCard) -> String {
    let sources = c
        .sources
        .iter()
        .map(|s| format!("{} {}", s.title, s.url.as_deref().unwrap_or("")))
        .collect::<Vec<_>>()
        .join(" ");
    let dynasties = c.dynasties.iter().map(|d| d.label()).collect::<Vec<_>>().join(" ");
    let key_people = c.key_people.join(" ");

    normalize_text(
        &[
            c.topic_title.as_str(),
            c.event_title.as_str(),
            dynasties.as_str(),
            c.timeline.as_deref().unwrap_or(""),
            c.core_conflict.as_deref().unwrap_or(""),
            key_people.as_str(),
            c.outcome.as_deref().unwrap_or(""),
            c.controversies.as_deref().unwrap_or(""),
            sources.as_str(),
        ]
        .join(" "),
    )
}
