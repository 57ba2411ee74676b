//! Utility modules

pub mod fuzzy;

pub use fuzzy::{find_best_match, find_matches, normalize_text, similarity, FuzzyMatch};
