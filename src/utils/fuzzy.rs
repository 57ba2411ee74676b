//! Fuzzy matching utilities for spoken commands
//!
//! Recognizers often return near-misses ("jumps", "spinn"); these helpers
//! score candidates so the command layer can accept them.

use strsim::normalized_levenshtein;

/// Result of a fuzzy match with the matched value and score
#[derive(Debug, Clone)]
pub struct FuzzyMatch {
    pub value: String,
    pub score: f64,
}

/// Normalize recognizer output: lowercase, punctuation stripped,
/// whitespace collapsed
pub fn normalize_text(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Find matches in a list of candidates
///
/// Returns up to `n` matches with scores above `cutoff`
pub fn find_matches(
    search_term: &str,
    candidates: &[String],
    n: usize,
    cutoff: f64,
) -> Vec<FuzzyMatch> {
    let search_lower = normalize_text(search_term);

    let mut matches: Vec<FuzzyMatch> = Vec::new();

    // 1. Check for exact matches first
    for candidate in candidates {
        if candidate.to_lowercase() == search_lower {
            matches.push(FuzzyMatch {
                value: candidate.clone(),
                score: 1.0,
            });
        }
    }

    // 2. Fuzzy match using normalized_levenshtein
    for candidate in candidates {
        if matches.iter().any(|m| m.value == *candidate) {
            continue;
        }

        let score = normalized_levenshtein(&search_lower, &candidate.to_lowercase());
        if score >= cutoff {
            matches.push(FuzzyMatch {
                value: candidate.clone(),
                score,
            });
        }
    }

    // 3. Sort by score descending
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    matches.truncate(n);
    matches
}

/// Find the best match above a minimum score
///
/// Returns None if no match meets the cutoff
pub fn find_best_match(
    search_term: &str,
    candidates: &[String],
    cutoff: f64,
) -> Option<FuzzyMatch> {
    find_matches(search_term, candidates, 1, cutoff)
        .into_iter()
        .next()
}

/// Calculate similarity score between two strings
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Jump!  "), "jump");
        assert_eq!(normalize_text("Hello,   there."), "hello there");
    }

    #[test]
    fn test_find_matches() {
        let candidates = vec!["jump".to_string(), "spin".to_string(), "dance".to_string()];

        let matches = find_matches("jumps", &candidates, 5, 0.75);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, "jump");
        assert!(matches[0].score > 0.75);
    }

    #[test]
    fn test_find_best_match() {
        let candidates = vec!["wave".to_string(), "dance".to_string()];
        let best = find_best_match("Wave", &candidates, 0.8);
        assert_eq!(best.map(|m| m.score), Some(1.0));
        assert!(find_best_match("banana", &candidates, 0.8).is_none());
    }

    #[test]
    fn test_command_word_distances() {
        // Vocabulary words must stay far apart so near-misses resolve uniquely
        let words = ["hello", "wave", "jump", "spin", "dance"];
        for a in words {
            for b in words {
                if a != b {
                    assert!(similarity(a, b) < 0.5, "{} vs {}", a, b);
                }
            }
        }
        assert!(similarity("spinn", "spin") > 0.75);
    }
}
