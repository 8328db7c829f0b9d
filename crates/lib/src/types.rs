//! # Core Data Types
//!
//! The records that make up the static catalog, and the shape of a
//! recommendation handed back to callers.

use serde::{Deserialize, Serialize};

/// A row of the static book table. The title is the practical identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(rename = "Book-Author")]
    pub author: String,
    #[serde(rename = "Image-URL-M")]
    pub image_url: String,
    #[serde(rename = "ISBN")]
    pub isbn: String,
}

/// A row of the popularity-ranked table shown on the landing page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopularBook {
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(rename = "Book-Author")]
    pub author: String,
    #[serde(rename = "Image-URL-M", default)]
    pub image_url: Option<String>,
    pub num_ratings: u64,
    pub avg_rating: f64,
}

/// A recommended book joined with its catalog metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedBook {
    pub title: String,
    pub author: String,
    pub image_url: String,
    pub isbn: String,
}

impl From<&Book> for RecommendedBook {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            image_url: book.image_url.clone(),
            isbn: book.isbn.clone(),
        }
    }
}
