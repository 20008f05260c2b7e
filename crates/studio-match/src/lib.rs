//! studio-match
//!
//! Lexical relevance matching of library materials and comparison cards
//! against a hot topic or free-text query. See `profile` for tokenization,
//! `score` for ranking, and the example under `examples/` for CLI-like usage
//! during development.

pub mod filter;
pub mod profile;
pub mod score;
pub mod tables;
pub mod text;

pub use filter::{filter_cards, filter_materials};
pub use profile::QueryProfile;
pub use score::{match_compare_cards, match_materials, token_weight, CardRanker, MaterialRanker};
pub use tables::DomainTables;
