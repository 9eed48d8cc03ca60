//! Fuzzy name ranking for "did you mean" suggestions.
//!
//! Scores are 0–1000 per candidate name against a whitespace-tokenized
//! query:
//!
//! 1. each distinct token contained in the name contributes
//!    `occurrences × token_len / total_token_len × 100`, capped at 100;
//! 2. the tokens appearing contiguously in query order add 300;
//! 3. the name starting with the first token adds 200;
//!
//! each bonus capped at the remaining headroom below 1000. Ties break by
//! more matched tokens, then by shorter name. Lengths are counted in
//! characters so CJK names weigh the same as ASCII ones.
//!
//! Token ranking needs whitespace to split on, so it cannot compare
//! unspaced lookalike names (shop items like "小心心" vs "大心心"). For
//! those, [`similarity_ratio`] scores two names character by character
//! on a 0–1 scale.

use std::collections::HashMap;

/// Lowercased whitespace tokens of a query. Empty queries yield no tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Match score of a (lowercased) name against query tokens.
pub fn match_score(name: &str, tokens: &[String]) -> f64 {
    let total_token_len: usize = tokens.iter().map(|t| char_len(t)).sum();
    if total_token_len == 0 {
        return 0.0;
    }

    let mut score = 0.0_f64;

    // Rule 1: per-token containment, weighted by length and occurrence
    // count, normalized so long tokens cannot dominate.
    let mut seen: Vec<&str> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if seen.contains(&token.as_str()) {
            continue;
        }
        seen.push(token);
        let count = occurrences(name, token);
        if count > 0 {
            let contribution =
                (count * char_len(token)) as f64 / total_token_len as f64 * 100.0;
            score += contribution.min(100.0);
        }
    }

    // Rule 2: all tokens contiguous in order is the strongest signal.
    let combined: String = tokens.concat();
    if name.contains(&combined) {
        score += 300.0_f64.min(1000.0 - score);
    }

    // Rule 3: name begins with the first token.
    if let Some(first) = tokens.first() {
        if name.starts_with(first.as_str()) {
            score += 200.0_f64.min(1000.0 - score);
        }
    }

    score.min(1000.0)
}

/// Character-level similarity of two names, in `0.0..=1.0`.
///
/// Computed as `2 × matching_chars / (len_a + len_b)`, where matching
/// characters are counted over the longest common run and, recursively,
/// the longest runs to either side of it. Identical names score 1.0,
/// names with no character in common 0.0. Case-insensitive; a cutoff of
/// 0.6 works well for "did you mean" suggestions.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let matches = matching_chars(&a, &b, 0, a.len(), 0, b.len());
    2.0 * matches as f64 / (a.len() + b.len()) as f64
}

fn matching_chars(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> usize {
    let (i, j, size) = longest_common_run(a, b, alo, ahi, blo, bhi);
    if size == 0 {
        return 0;
    }
    size + matching_chars(a, b, alo, i, blo, j)
        + matching_chars(a, b, i + size, ahi, j + size, bhi)
}

/// Longest run of identical characters between `a[alo..ahi]` and
/// `b[blo..bhi]`, as `(start_in_a, start_in_b, length)`. Earliest run wins
/// ties. `run_len[j]` tracks the run ending at `b[j]` for the current `i`.
fn longest_common_run(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0usize);
    let mut run_len: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut next: HashMap<usize, usize> = HashMap::new();
        for j in blo..bhi {
            if a[i] == b[j] {
                let len = j
                    .checked_sub(1)
                    .and_then(|prev| run_len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, len);
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        run_len = next;
    }
    best
}

/// Rank candidate names against a query, best match first.
///
/// Only names with a positive score are returned. Ordering: score
/// descending, matched-token count descending, name length ascending.
pub fn rank_names<'a, I>(query: &str, names: I) -> Vec<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(&str, f64, usize)> = names
        .into_iter()
        .filter_map(|name| {
            let lower = name.to_lowercase();
            let score = match_score(&lower, &tokens);
            if score > 0.0 {
                let matched = tokens.iter().filter(|t| lower.contains(t.as_str())).count();
                Some((name, score, matched))
            } else {
                None
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.2.cmp(&a.2))
            .then(char_len(a.0).cmp(&char_len(b.0)))
    });

    ranked.into_iter().map(|(name, score, _)| (name, score)).collect()
}
