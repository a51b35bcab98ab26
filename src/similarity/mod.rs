//! Token-based similarity scoring for semantic search fallback.
//!
//! A score in `[0, 1]` combines three signals:
//!
//! - **Exact terms** (weight 0.4): share of query tokens present in the candidate.
//! - **Partial terms** (weight 0.3): for every (query, candidate) token pair, 0.5 when the
//!   query token is contained in the candidate token and another 0.5 for the reverse, so
//!   equal tokens count 1.0. The sum is divided by the query token count and capped at 1.0
//!   (it saturates; many short tokens can push the raw sum well past 1).
//! - **Sequence** (weight 0.3): character diff ratio of the space-joined token strings.
//!
//! The score is not commutative: the exact and partial terms are normalized by the query
//! side only, so `similarity(a, b)` and `similarity(b, a)` differ whenever the token
//! counts differ.

use once_cell::sync::Lazy;
use regex::Regex;
use similar::TextDiff;

const EXACT_WEIGHT: f64 = 0.4;
const PARTIAL_WEIGHT: f64 = 0.3;
const SEQUENCE_WEIGHT: f64 = 0.3;
const PARTIAL_PAIR_CREDIT: f64 = 0.5;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Lowercase word tokens of `text`, first occurrence order, duplicates dropped
///
/// # Examples
///
/// ```
/// use filewise::similarity::tokenize;
///
/// assert_eq!(tokenize("My Resume - FINAL (v2)"), vec!["my", "resume", "final", "v2"]);
/// assert!(tokenize("--- !!").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tokens: Vec<String> = Vec::new();
    for m in WORD_RE.find_iter(&lower) {
        let token = m.as_str();
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// Score `candidate` against `query`; 0.0 when either side has no tokens
pub fn similarity(query: &[String], candidate: &[String]) -> f64 {
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    let score = EXACT_WEIGHT * exact_score(query, candidate)
        + PARTIAL_WEIGHT * partial_score(query, candidate)
        + SEQUENCE_WEIGHT * sequence_score(query, candidate);
    // Weighted float sum can land a hair above 1.0
    score.min(1.0)
}

/// Convenience wrapper tokenizing both texts first
pub fn text_similarity(query: &str, candidate: &str) -> f64 {
    similarity(&tokenize(query), &tokenize(candidate))
}

fn exact_score(query: &[String], candidate: &[String]) -> f64 {
    let shared = query.iter().filter(|q| candidate.contains(q)).count();
    shared as f64 / query.len() as f64
}

fn partial_score(query: &[String], candidate: &[String]) -> f64 {
    let mut sum = 0.0;
    for q in query {
        for c in candidate {
            if c.contains(q.as_str()) {
                sum += PARTIAL_PAIR_CREDIT;
            }
            if q.contains(c.as_str()) {
                sum += PARTIAL_PAIR_CREDIT;
            }
        }
    }
    (sum / query.len() as f64).min(1.0)
}

fn sequence_score(query: &[String], candidate: &[String]) -> f64 {
    let left = query.join(" ");
    let right = candidate.join(" ");
    f64::from(TextDiff::from_chars(left.as_str(), right.as_str()).ratio())
}
