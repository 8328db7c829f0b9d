//! # Similarity Ranking
//!
//! This module provides the recommendation logic over the static catalog:
//! - Title matching (case-insensitive substring, unioned with exact match).
//! - Single-query recommendation by similarity score.
//! - Personalized recommendation from a recency-weighted search history.

use crate::{catalog::Catalog, constants::RECOMMENDATION_LIMIT, types::RecommendedBook};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// The result of a single-title recommendation lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendations {
    /// No pivot title matched the query. Nothing was ranked.
    NotFound,
    /// At least one title matched. Holds up to `RECOMMENDATION_LIMIT` books,
    /// possibly fewer when ranked titles have no metadata row.
    Ranked(Vec<RecommendedBook>),
}

/// Normalizes free-text user input for title matching: trims, collapses runs
/// of whitespace to a single space and lowercases.
pub fn normalize_query(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Finds every pivot row whose title matches `needle`.
///
/// `needle` must already be lowercase. A title matches when it contains the
/// needle or equals it. The exact-match pass is a subset of the substring pass
/// and only kept so both criteria stay visible.
pub fn match_titles(catalog: &Catalog, needle: &str) -> BTreeSet<usize> {
    let lowered = catalog.lowered_titles();

    let substring_matches: BTreeSet<usize> = lowered
        .iter()
        .enumerate()
        .filter(|(_, title)| title.contains(needle))
        .map(|(i, _)| i)
        .collect();
    let exact_matches: BTreeSet<usize> = lowered
        .iter()
        .enumerate()
        .filter(|(_, title)| title.as_str() == needle)
        .map(|(i, _)| i)
        .collect();

    substring_matches.union(&exact_matches).copied().collect()
}

/// The weight of the `index`-th most recent search: `(1 / (index + 1))^2`.
pub fn recency_weight(index: usize) -> f64 {
    (1.0 / (index as f64 + 1.0)).powi(2)
}

/// Recommends books similar to the titles matching `query`.
///
/// Every similarity row of every matching title is pooled into one candidate
/// list and stable-sorted by descending score, so ties keep matrix column
/// order. Titles are taken in that order without repeats until the limit is
/// reached, then joined with the book table. Titles without metadata are
/// dropped after the cut, so fewer than the limit may come back.
pub fn recommend_by_title(catalog: &Catalog, query: &str) -> Recommendations {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return Recommendations::NotFound;
    }

    let matches = match_titles(catalog, &needle);
    if matches.is_empty() {
        debug!(query = %needle, "No pivot titles matched.");
        return Recommendations::NotFound;
    }
    debug!(query = %needle, matches = matches.len(), "Matched pivot titles.");

    let mut candidates: Vec<(usize, f64)> = Vec::with_capacity(matches.len() * catalog.len());
    for &row in &matches {
        if let Some(scores) = catalog.similarity_row(row) {
            candidates.extend(scores.iter().copied().enumerate());
        }
    }
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    let titles = catalog.titles();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut ranked: Vec<&str> = Vec::with_capacity(RECOMMENDATION_LIMIT);
    for (column, _) in candidates {
        let title = titles[column].as_str();
        if seen.insert(title) {
            ranked.push(title);
        }
        if ranked.len() >= RECOMMENDATION_LIMIT {
            break;
        }
    }

    let books = ranked
        .into_iter()
        .filter_map(|title| catalog.book(title))
        .map(RecommendedBook::from)
        .collect();
    Recommendations::Ranked(books)
}

/// Accumulates recency-weighted similarity totals over a search history,
/// most recent entry first.
///
/// Each entry contributes `recency_weight(i) * score` for every matching row
/// into a per-title running total shared across the whole history. Entries
/// that match nothing are skipped but still consume their position `i`.
/// The totals come back sorted descending; ties keep first-seen order.
pub fn score_history<'a, S: AsRef<str>>(
    catalog: &'a Catalog,
    history: &[S],
) -> Vec<(&'a str, f64)> {
    let titles = catalog.titles();
    let mut totals: Vec<(&'a str, f64)> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for (i, search) in history.iter().enumerate() {
        let needle = search.as_ref().to_lowercase();
        let weight = recency_weight(i);
        let matches = match_titles(catalog, &needle);
        if matches.is_empty() {
            debug!(search = %needle, "History entry matched nothing, skipping.");
            continue;
        }

        for &row in &matches {
            let Some(scores) = catalog.similarity_row(row) else {
                continue;
            };
            for (column, score) in scores.iter().enumerate() {
                let title = titles[column].as_str();
                let slot = *positions.entry(title).or_insert_with(|| {
                    totals.push((title, 0.0));
                    totals.len() - 1
                });
                totals[slot].1 += weight * score;
            }
        }
    }

    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals
}

/// Recommends books from a user's search history, most recent entry first.
///
/// Titles are taken from `score_history` in order, without repeats, and
/// joined with the book table until the limit of books with metadata is
/// reached.
pub fn recommend_personalized<S: AsRef<str>>(
    catalog: &Catalog,
    history: &[S],
) -> Vec<RecommendedBook> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut books = Vec::with_capacity(RECOMMENDATION_LIMIT);
    for (title, _) in score_history(catalog, history) {
        if !seen.insert(title) {
            continue;
        }
        if let Some(book) = catalog.book(title) {
            books.push(RecommendedBook::from(book));
        }
        if books.len() >= RECOMMENDATION_LIMIT {
            break;
        }
    }
    books
}
