use anyhow::Result;
use bookrec::{Book, Catalog, PopularBook};
use std::{collections::HashMap, path::Path};
use tempfile::TempDir;
use turso::Database;

// --- Test Setup ---

/// A helper struct to manage database creation for each test.
pub struct TestSetup {
    pub db: Database,
}

impl TestSetup {
    /// Creates a new, isolated in-memory database and initializes the schema.
    pub async fn new() -> Result<Self> {
        let db = turso::Builder::new_local(":memory:").build().await?;
        let conn = db.connect()?;

        // Initialize the schema using the shared SQL constants.
        for statement in bookrec::providers::db::sqlite::sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ()).await?;
        }

        Ok(Self { db })
    }

    /// Counts the rows of `table` owned by `user_id`.
    pub async fn count_rows_for_user(&self, table: &str, user_id: i64) -> Result<i64> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                &format!("SELECT COUNT(*) FROM {table} WHERE user_id = ?"),
                turso::params![user_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| anyhow::anyhow!("COUNT(*) returned no row"))?;
        Ok(row.get(0)?)
    }
}

// --- Catalog Fixtures ---

/// A fluent builder for small, hand-checkable catalogs.
///
/// Every title added gets a pivot row, a book row (unless marked otherwise)
/// and a similarity of `1.0` with itself. Other pairs default to `0.0`.
#[derive(Debug, Clone, Default)]
pub struct CatalogFixture {
    titles: Vec<String>,
    books: Vec<Book>,
    popular: Vec<PopularBook>,
    scores: HashMap<(usize, usize), f64>,
}

impl CatalogFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pivot title together with its book metadata.
    pub fn title(mut self, title: &str) -> Self {
        self = self.title_without_metadata(title);
        let n = self.books.len();
        self.books.push(Book {
            title: title.to_string(),
            author: format!("Author of {title}"),
            image_url: format!("http://images.test/{n}.jpg"),
            isbn: format!("{:010}", n + 1),
        });
        self
    }

    /// Adds a pivot title that has no row in the book table.
    pub fn title_without_metadata(mut self, title: &str) -> Self {
        let i = self.titles.len();
        self.titles.push(title.to_string());
        self.scores.insert((i, i), 1.0);
        self
    }

    /// Sets the similarity score between two titles, in both directions.
    pub fn similar(mut self, a: &str, b: &str, score: f64) -> Self {
        let ia = self.index_of(a);
        let ib = self.index_of(b);
        self.scores.insert((ia, ib), score);
        self.scores.insert((ib, ia), score);
        self
    }

    /// Adds an entry to the popularity-ranked table.
    pub fn popular(mut self, title: &str, num_ratings: u64, avg_rating: f64) -> Self {
        let image_url = self
            .books
            .iter()
            .find(|b| b.title == title)
            .map(|b| b.image_url.clone());
        self.popular.push(PopularBook {
            title: title.to_string(),
            author: format!("Author of {title}"),
            image_url,
            num_ratings,
            avg_rating,
        });
        self
    }

    fn index_of(&self, title: &str) -> usize {
        self.titles
            .iter()
            .position(|t| t == title)
            .unwrap_or_else(|| panic!("title '{title}' was not added to the fixture"))
    }

    fn matrix(&self) -> Vec<Vec<f64>> {
        let n = self.titles.len();
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| self.scores.get(&(i, j)).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect()
    }

    /// Builds the in-memory catalog.
    pub fn build(&self) -> Result<Catalog> {
        Ok(Catalog::from_parts(
            self.books.clone(),
            self.popular.clone(),
            self.titles.clone(),
            self.matrix(),
        )?)
    }

    /// Writes the fixture as the four CSV files the loader expects.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let mut books = csv::Writer::from_path(dir.join(bookrec::constants::BOOKS_FILE))?;
        for book in &self.books {
            books.serialize(book)?;
        }
        if self.books.is_empty() {
            books.write_record(["Book-Title", "Book-Author", "Image-URL-M", "ISBN"])?;
        }
        books.flush()?;

        let mut popular = csv::Writer::from_path(dir.join(bookrec::constants::POPULAR_FILE))?;
        popular.write_record([
            "Book-Title",
            "Book-Author",
            "Image-URL-M",
            "num_ratings",
            "avg_rating",
        ])?;
        for p in &self.popular {
            popular.write_record([
                p.title.clone(),
                p.author.clone(),
                p.image_url.clone().unwrap_or_default(),
                p.num_ratings.to_string(),
                p.avg_rating.to_string(),
            ])?;
        }
        popular.flush()?;

        let mut pivot = csv::Writer::from_path(dir.join(bookrec::constants::PIVOT_FILE))?;
        pivot.write_record(["Book-Title"])?;
        for title in &self.titles {
            pivot.write_record([title])?;
        }
        pivot.flush()?;

        let mut similarity = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(dir.join(bookrec::constants::SIMILARITY_FILE))?;
        for row in self.matrix() {
            similarity.write_record(row.iter().map(|v| v.to_string()))?;
        }
        similarity.flush()?;
        Ok(())
    }

    /// Writes the fixture into a fresh temporary directory.
    pub fn write_temp_dir(&self) -> Result<TempDir> {
        let dir = tempfile::tempdir()?;
        self.write_to(dir.path())?;
        Ok(dir)
    }
}

/// A small catalog with a few series, used across crates.
///
/// - The two Harry Potter books are close to each other and to "The Hobbit".
/// - "Dune" and "Foundation" share "Hyperion" as a neighbour.
/// - "Lost Manuscript" is in the pivot table but has no book row.
pub fn sample_catalog() -> CatalogFixture {
    CatalogFixture::new()
        .title("Harry Potter and the Sorcerer's Stone")
        .title("Harry Potter and the Chamber of Secrets")
        .title("The Hobbit")
        .title("Dune")
        .title("Foundation")
        .title("Hyperion")
        .title_without_metadata("Lost Manuscript")
        .similar(
            "Harry Potter and the Sorcerer's Stone",
            "Harry Potter and the Chamber of Secrets",
            0.9,
        )
        .similar("Harry Potter and the Sorcerer's Stone", "The Hobbit", 0.4)
        .similar("Harry Potter and the Chamber of Secrets", "The Hobbit", 0.3)
        .similar("Dune", "Hyperion", 0.6)
        .similar("Foundation", "Hyperion", 0.5)
        .similar("Dune", "Foundation", 0.2)
        .similar("Dune", "Lost Manuscript", 0.7)
        .popular("The Hobbit", 540, 8.9)
        .popular("Dune", 420, 8.6)
}
