//! Fuzzy matching of a user question against the planned Q&A.
//!
//! The score is a character-level Ratcliff/Obershelp ratio: find the
//! longest common substring, recurse on the pieces to either side, and
//! report `2 * matched / (len_a + len_b)`. Identical strings score 1.0,
//! strings with disjoint character sets score 0, and the measure is
//! symmetric.

use crate::plan::QaPair;

/// Best planned candidate for one user input, consumed immediately by
/// the engine's branching. `best` is `None` when no candidate exists.
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    pub best: Option<&'a QaPair>,
    pub score: f64,
}

/// Similarity of two strings in `[0, 1]`.
pub fn score(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let matched = matched_len(&a, &b);
    (2.0 * matched as f64) / ((a.len() + b.len()) as f64)
}

/// Total length of the matching blocks shared by `a` and `b`:
/// the longest common substring plus, recursively, whatever matches in
/// the unconsumed left and right remainders.
fn matched_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Longest common substring by DP over one rolling row.
    let mut best_len = 0;
    let mut best_a = 0;
    let mut best_b = 0;
    let mut prev = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                cur[j + 1] = prev[j] + 1;
                if cur[j + 1] > best_len {
                    best_len = cur[j + 1];
                    best_a = i + 1 - best_len;
                    best_b = j + 1 - best_len;
                }
            }
        }
        prev = cur;
    }

    if best_len == 0 {
        return 0;
    }

    best_len
        + matched_len(&a[..best_a], &b[..best_b])
        + matched_len(&a[best_a + best_len..], &b[best_b + best_len..])
}

/// Scores `query` against every candidate question and returns the
/// strictly best one. Ties keep the earliest candidate; an empty list
/// yields `(None, 0.0)`.
pub fn find_best<'a>(query: &str, candidates: &'a [QaPair]) -> MatchResult<'a> {
    let mut best = None;
    let mut best_score = 0.0;
    for pair in candidates {
        let s = score(query, &pair.question);
        if s > best_score {
            best_score = s;
            best = Some(pair);
        }
    }
    MatchResult {
        best,
        score: best_score,
    }
}
