//! # Static Catalog
//!
//! The catalog holds the precomputed tables the recommender works from:
//! the book metadata table, the popularity ranking, the pivot index of
//! titles and the square similarity matrix aligned with it.
//!
//! It is built once at startup and never mutated afterwards, so it can be
//! shared behind an `Arc` by any number of concurrent readers.

use crate::{
    constants::{BOOKS_FILE, PIVOT_FILE, POPULAR_FILE, SIMILARITY_FILE},
    types::{Book, PopularBook},
};
use serde::de::DeserializeOwned;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::info;

/// Errors raised while loading or assembling the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file '{path}': {source}")]
    Read { path: PathBuf, source: csv::Error },
    #[error("Catalog tables are not aligned: {0}")]
    Misaligned(String),
}

/// The immutable, in-memory recommendation tables.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
    /// Title -> position of the first book row carrying that title.
    book_index: HashMap<String, usize>,
    /// Title -> position of the last book row carrying that title.
    listing_index: HashMap<String, usize>,
    popular: Vec<PopularBook>,
    titles: Vec<String>,
    lowered_titles: Vec<String>,
    similarity: Vec<Vec<f64>>,
}

impl Catalog {
    /// Assembles a catalog from already-parsed tables.
    ///
    /// The similarity matrix must be `n x n`, where `n` is the number of pivot
    /// titles. Whether row `i` really describes `titles[i]` is a property of the
    /// offline build and cannot be checked here.
    pub fn from_parts(
        books: Vec<Book>,
        popular: Vec<PopularBook>,
        titles: Vec<String>,
        similarity: Vec<Vec<f64>>,
    ) -> Result<Self, CatalogError> {
        let n = titles.len();
        if similarity.len() != n {
            return Err(CatalogError::Misaligned(format!(
                "similarity matrix has {} rows but the pivot table has {n} titles",
                similarity.len()
            )));
        }
        if let Some((row, values)) = similarity.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(CatalogError::Misaligned(format!(
                "similarity row {row} has {} columns, expected {n}",
                values.len()
            )));
        }

        let mut book_index = HashMap::with_capacity(books.len());
        let mut listing_index = HashMap::with_capacity(books.len());
        for (i, book) in books.iter().enumerate() {
            book_index.entry(book.title.clone()).or_insert(i);
            listing_index.insert(book.title.clone(), i);
        }
        let lowered_titles = titles.iter().map(|t| t.to_lowercase()).collect();

        Ok(Self {
            books,
            book_index,
            listing_index,
            popular,
            titles,
            lowered_titles,
            similarity,
        })
    }

    /// Loads the four catalog files from `data_dir`.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = data_dir.as_ref();

        let books: Vec<Book> = read_records(&dir.join(BOOKS_FILE))?;
        let popular: Vec<PopularBook> = read_records(&dir.join(POPULAR_FILE))?;
        let titles = read_pivot_titles(&dir.join(PIVOT_FILE))?;
        let similarity = read_matrix(&dir.join(SIMILARITY_FILE))?;

        let catalog = Self::from_parts(books, popular, titles, similarity)?;
        info!(
            books = catalog.books.len(),
            popular = catalog.popular.len(),
            titles = catalog.titles.len(),
            data_dir = %dir.display(),
            "Loaded static catalog."
        );
        Ok(catalog)
    }

    /// Returns the first book row with exactly this title, if any.
    pub fn book(&self, title: &str) -> Option<&Book> {
        self.book_index.get(title).map(|&i| &self.books[i])
    }

    /// Returns the ISBN of the first book row with this title.
    pub fn isbn_for(&self, title: &str) -> Option<&str> {
        self.book(title).map(|b| b.isbn.as_str())
    }

    /// Returns the ISBN shown next to `title` in the popular list.
    ///
    /// Unlike `isbn_for`, the last book row with this title wins.
    pub fn listing_isbn_for(&self, title: &str) -> Option<&str> {
        self.listing_index
            .get(title)
            .map(|&i| self.books[i].isbn.as_str())
    }

    /// The popularity-ranked books, in file order.
    pub fn popular(&self) -> &[PopularBook] {
        &self.popular
    }

    /// The pivot index: one title per similarity row.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// The pivot titles, lowercased once at load time for matching.
    pub(crate) fn lowered_titles(&self) -> &[String] {
        &self.lowered_titles
    }

    /// The similarity scores of row `index` against every pivot title.
    pub fn similarity_row(&self, index: usize) -> Option<&[f64]> {
        self.similarity.get(index).map(Vec::as_slice)
    }

    /// The number of pivot titles.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

fn open_reader(path: &Path, has_headers: bool) -> Result<csv::Reader<std::fs::File>, CatalogError> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(false)
        .from_path(path)
        .map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CatalogError> {
    let mut reader = open_reader(path, true)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn read_pivot_titles(path: &Path) -> Result<Vec<String>, CatalogError> {
    let mut reader = open_reader(path, true)?;
    let mut titles = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        titles.push(record.get(0).unwrap_or_default().to_string());
    }
    Ok(titles)
}

fn read_matrix(path: &Path) -> Result<Vec<Vec<f64>>, CatalogError> {
    // Row lengths are checked by `from_parts`, so ragged rows are allowed here.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    reader
        .deserialize::<Vec<f64>>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })
}
