//! # Ranking Logic Tests
//!
//! This file contains tests for single-title and personalized recommendations
//! over small, hand-checkable catalogs.

use bookrec::{
    constants::RECOMMENDATION_LIMIT,
    ranking::{match_titles, recommend_by_title, recommend_personalized, score_history},
    Recommendations,
};
use bookrec_test_utils::{sample_catalog, CatalogFixture};
use std::collections::HashSet;

fn titles_of(recommendations: &Recommendations) -> Vec<String> {
    match recommendations {
        Recommendations::Ranked(books) => books.iter().map(|b| b.title.clone()).collect(),
        Recommendations::NotFound => panic!("expected ranked recommendations, got NotFound"),
    }
}

#[test]
fn test_substring_query_unions_all_matching_titles() {
    // --- 1. Arrange ---
    let catalog = sample_catalog().build().unwrap();

    // --- 2. Act ---
    let matches = match_titles(&catalog, "harry potter");

    // --- 3. Assert ---
    // Neither title equals the query; both contain it.
    assert_eq!(matches.into_iter().collect::<Vec<_>>(), vec![0, 1]);
}

#[test]
fn test_exact_match_is_found() {
    let catalog = sample_catalog().build().unwrap();
    let matches = match_titles(&catalog, "dune");
    assert_eq!(matches.into_iter().collect::<Vec<_>>(), vec![3]);
}

#[test]
fn test_recommend_by_title_pools_rows_of_all_matches() {
    // --- 1. Arrange ---
    let catalog = sample_catalog().build().unwrap();

    // --- 2. Act ---
    let result = recommend_by_title(&catalog, "Harry Potter");

    // --- 3. Assert ---
    // "Lost Manuscript" is ranked but has no book row, so it is dropped.
    assert_eq!(
        titles_of(&result),
        vec![
            "Harry Potter and the Sorcerer's Stone",
            "Harry Potter and the Chamber of Secrets",
            "The Hobbit",
            "Dune",
            "Foundation",
            "Hyperion",
        ]
    );
}

#[test]
fn test_recommend_by_title_normalizes_input() {
    let catalog = sample_catalog().build().unwrap();

    let result = recommend_by_title(&catalog, "   DUNE  ");

    let titles = titles_of(&result);
    assert_eq!(titles[0], "Dune");
    assert_eq!(titles[1], "Hyperion");
    assert_eq!(titles[2], "Foundation");
    assert!(!titles.contains(&"Lost Manuscript".to_string()));
}

#[test]
fn test_recommend_by_title_joins_metadata() {
    let catalog = sample_catalog().build().unwrap();

    let Recommendations::Ranked(books) = recommend_by_title(&catalog, "hobbit") else {
        panic!("expected a match for 'hobbit'");
    };

    let hobbit = &books[0];
    assert_eq!(hobbit.title, "The Hobbit");
    assert_eq!(hobbit.author, "Author of The Hobbit");
    assert_eq!(Some(hobbit.isbn.as_str()), catalog.isbn_for("The Hobbit"));
}

#[test]
fn test_no_match_returns_not_found() {
    let catalog = sample_catalog().build().unwrap();

    assert_eq!(
        recommend_by_title(&catalog, "The Silmarillion"),
        Recommendations::NotFound
    );
    assert_eq!(recommend_by_title(&catalog, "   "), Recommendations::NotFound);
}

#[test]
fn test_results_are_capped_and_unique() {
    // --- 1. Arrange ---
    let mut fixture = CatalogFixture::new();
    for i in 0..15 {
        fixture = fixture.title(&format!("Book {i:02}"));
    }
    for i in 1..15 {
        fixture = fixture.similar("Book 00", &format!("Book {i:02}"), 1.0 - i as f64 / 100.0);
    }
    let catalog = fixture.build().unwrap();

    // --- 2. Act ---
    // Every title matches "book", so every row is pooled.
    let titles = titles_of(&recommend_by_title(&catalog, "book"));

    // --- 3. Assert ---
    assert_eq!(titles.len(), RECOMMENDATION_LIMIT);
    let unique: HashSet<_> = titles.iter().collect();
    assert_eq!(unique.len(), titles.len(), "Duplicate titles were returned");
}

#[test]
fn test_score_ties_keep_matrix_order() {
    let catalog = CatalogFixture::new()
        .title("Alpha")
        .title("Gamma")
        .title("Beta")
        .similar("Alpha", "Gamma", 0.5)
        .similar("Alpha", "Beta", 0.5)
        .build()
        .unwrap();

    let titles = titles_of(&recommend_by_title(&catalog, "alpha"));

    assert_eq!(titles, vec!["Alpha", "Gamma", "Beta"]);
}

#[test]
fn test_history_weights_most_recent_search_highest() {
    // --- 1. Arrange ---
    let catalog = sample_catalog().build().unwrap();

    // --- 2. Act ---
    // "Dune" is the most recent search (weight 1.0), "Foundation" the previous one (0.25).
    let scores = score_history(&catalog, &["Dune", "Foundation"]);

    // --- 3. Assert ---
    let score_of = |title: &str| {
        scores
            .iter()
            .find(|(t, _)| *t == title)
            .map(|(_, s)| *s)
            .unwrap()
    };
    assert!((score_of("Dune") - (1.0 + 0.25 * 0.2)).abs() < 1e-9);
    assert!((score_of("Hyperion") - (0.6 + 0.25 * 0.5)).abs() < 1e-9);
    assert!((score_of("Foundation") - (0.2 + 0.25 * 1.0)).abs() < 1e-9);
    assert_eq!(scores[0].0, "Dune");
}

#[test]
fn test_personalized_order_follows_recency() {
    let catalog = sample_catalog().build().unwrap();

    let dune_first: Vec<String> = recommend_personalized(&catalog, &["Dune", "Foundation"])
        .into_iter()
        .map(|b| b.title)
        .collect();
    let foundation_first: Vec<String> =
        recommend_personalized(&catalog, &["Foundation", "Dune"])
            .into_iter()
            .map(|b| b.title)
            .collect();

    assert_eq!(&dune_first[..3], &["Dune", "Hyperion", "Foundation"]);
    assert_eq!(&foundation_first[..3], &["Foundation", "Hyperion", "Dune"]);
    assert!(!dune_first.contains(&"Lost Manuscript".to_string()));
}

#[test]
fn test_unmatched_history_entry_is_skipped_but_keeps_its_position() {
    let catalog = sample_catalog().build().unwrap();

    let scores = score_history(&catalog, &["no such book", "Dune"]);

    let dune = scores.iter().find(|(t, _)| *t == "Dune").unwrap().1;
    assert!((dune - 0.25).abs() < 1e-9);
}

#[test]
fn test_empty_history_yields_nothing() {
    let catalog = sample_catalog().build().unwrap();
    let history: Vec<String> = Vec::new();

    assert!(recommend_personalized(&catalog, &history).is_empty());
}

#[test]
fn test_personalized_fills_limit_with_books_that_have_metadata() {
    // --- 1. Arrange ---
    // The highest-scoring neighbours have no book row; they must not use up the limit.
    let mut fixture = CatalogFixture::new().title("Seed");
    for i in 0..3 {
        fixture = fixture
            .title_without_metadata(&format!("Ghost {i}"))
            .similar("Seed", &format!("Ghost {i}"), 0.99);
    }
    for i in 0..12 {
        fixture = fixture
            .title(&format!("Real {i:02}"))
            .similar("Seed", &format!("Real {i:02}"), 0.5 - i as f64 / 100.0);
    }
    let catalog = fixture.build().unwrap();

    // --- 2. Act ---
    let books = recommend_personalized(&catalog, &["Seed"]);

    // --- 3. Assert ---
    assert_eq!(books.len(), RECOMMENDATION_LIMIT);
    assert_eq!(books[0].title, "Seed");
    assert!(books.iter().all(|b| !b.title.starts_with("Ghost")));
}
