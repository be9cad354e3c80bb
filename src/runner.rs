//! The query runner: a fixed, ordered sequence of bookstore queries whose
//! results are written as a human readable report.
//!
//! Every call is awaited before the next one starts. The first error aborts
//! the rest of the sequence; [`run_queries`] logs it and closes the client on
//! every path.

use anyhow::Result;
use mongodb::bson::doc;
use std::io::Write;
use tracing::{error, info};

use crate::config::Config;
use crate::db::{books::SortOrder, Database};
use crate::errors::BookstoreError;
use crate::models::ExplainStats;
use crate::report::{field, format_amount, format_index_key, format_rounded, section_header};

pub const GENRE: &str = "Fiction";
pub const PUBLISHED_AFTER: i32 = 1920;
pub const AUTHOR: &str = "George Orwell";
pub const PRICE_UPDATE_TITLE: &str = "The Great Gatsby";
pub const NEW_PRICE: f64 = 15.99;
pub const DELETE_TITLE: &str = "The Catcher in the Rye";
pub const RECENT_AFTER: i32 = 2010;
pub const PREVIEW_LIMIT: i64 = 5;
pub const EXPLAIN_MIN_PAGES: i32 = 300;
pub const EXPLAIN_TITLE: &str = "1984";
pub const EXPLAIN_AUTHOR: &str = "J.R.R. Tolkien";
pub const EXPLAIN_FROM_YEAR: i32 = 1950;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Crud,
    Advanced,
    Aggregation,
    Indexing,
    Bonus,
}

impl Section {
    /// Execution order of a full run
    pub const ALL: [Section; 5] = [
        Section::Crud,
        Section::Advanced,
        Section::Aggregation,
        Section::Indexing,
        Section::Bonus,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Crud => "TASK 2: BASIC CRUD OPERATIONS",
            Section::Advanced => "TASK 3: ADVANCED QUERIES",
            Section::Aggregation => "TASK 4: AGGREGATION PIPELINE",
            Section::Indexing => "TASK 5: INDEXING",
            Section::Bonus => "BONUS: ADDITIONAL QUERIES",
        }
    }
}

pub struct QueryRunner<'a, W: Write> {
    db: &'a Database,
    out: W,
    page_size: u64,
    sections_run: usize,
}

impl<'a, W: Write> QueryRunner<'a, W> {
    /// Fails with [`BookstoreError::InvalidPageSize`] unless `page_size` is positive.
    pub fn new(db: &'a Database, out: W, page_size: i64) -> Result<Self, BookstoreError> {
        let page_size = u64::try_from(page_size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or(BookstoreError::InvalidPageSize { page_size })?;
        Ok(Self {
            db,
            out,
            page_size,
            sections_run: 0,
        })
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub async fn run_all(&mut self) -> Result<()> {
        for section in Section::ALL {
            self.run_section(section).await?;
        }
        writeln!(self.out, "\n{}\n", section_header("ALL QUERIES COMPLETED SUCCESSFULLY"))?;
        Ok(())
    }

    pub async fn run_section(&mut self, section: Section) -> Result<()> {
        if self.sections_run > 0 {
            writeln!(self.out, "\n")?;
        }
        writeln!(self.out, "{}\n", section_header(section.title()))?;
        self.sections_run += 1;

        info!("Running section: {}", section.title());
        match section {
            Section::Crud => self.basic_crud().await,
            Section::Advanced => self.advanced_queries().await,
            Section::Aggregation => self.aggregations().await,
            Section::Indexing => self.indexing().await,
            Section::Bonus => self.bonus().await,
        }
    }

    async fn basic_crud(&mut self) -> Result<()> {
        writeln!(self.out, "1. All {} books:", GENRE)?;
        for book in self.db.find_by_genre(GENRE).await? {
            writeln!(self.out, "   - {} by {}", field(&book.title), field(&book.author))?;
        }

        writeln!(self.out, "\n2. Books published after {}:", PUBLISHED_AFTER)?;
        for book in self.db.find_published_after(PUBLISHED_AFTER).await? {
            writeln!(self.out, "   - {} ({})", field(&book.title), field(&book.published_year))?;
        }

        writeln!(self.out, "\n3. Books by {}:", AUTHOR)?;
        for book in self.db.find_by_author(AUTHOR).await? {
            writeln!(self.out, "   - {}", field(&book.title))?;
        }

        writeln!(self.out, "\n4. Updating price of \"{}\" to ${}:", PRICE_UPDATE_TITLE, NEW_PRICE)?;
        let modified = self.db.update_price(PRICE_UPDATE_TITLE, NEW_PRICE).await?;
        writeln!(self.out, "   Modified {} document(s)", modified)?;
        let updated = self.db.require_by_title(PRICE_UPDATE_TITLE).await?;
        writeln!(self.out, "   New price: ${}", field(&updated.price))?;

        writeln!(self.out, "\n5. Deleting \"{}\":", DELETE_TITLE)?;
        let deleted = self.db.delete_by_title(DELETE_TITLE).await?;
        writeln!(self.out, "   Deleted {} document(s)", deleted)?;
        let remaining = self.db.count_books().await?;
        writeln!(self.out, "   Remaining books: {}", remaining)?;

        Ok(())
    }

    async fn advanced_queries(&mut self) -> Result<()> {
        writeln!(self.out, "1. Books in stock AND published after {}:", RECENT_AFTER)?;
        let recent = self.db.find_in_stock_published_after(RECENT_AFTER).await?;
        if recent.is_empty() {
            writeln!(self.out, "   No books found matching criteria")?;
        }
        for book in &recent {
            writeln!(self.out, "   - {} ({})", field(&book.title), field(&book.published_year))?;
        }

        writeln!(self.out, "\n2. Books with projection (title, author, price only):")?;
        for book in self.db.list_summaries(PREVIEW_LIMIT).await? {
            writeln!(
                self.out,
                "   - \"{}\" by {} - ${}",
                field(&book.title),
                field(&book.author),
                field(&book.price)
            )?;
        }

        for (label, order, name) in [
            ("3a", SortOrder::Ascending, "ascending"),
            ("3b", SortOrder::Descending, "descending"),
        ] {
            writeln!(
                self.out,
                "\n{}. Books sorted by price ({}) - Top {}:",
                label, name, PREVIEW_LIMIT
            )?;
            for book in self.db.list_sorted_by_price(order, PREVIEW_LIMIT).await? {
                writeln!(self.out, "   - {}: ${}", field(&book.title), field(&book.price))?;
            }
        }

        for (label, page) in [("4a", 1_u64), ("4b", 2_u64)] {
            let first = (page - 1) * self.page_size + 1;
            let last = page * self.page_size;
            writeln!(
                self.out,
                "\n{}. Pagination - Page {} (books {}-{}):",
                label, page, first, last
            )?;
            let books = self.db.list_page(page, self.page_size as i64).await?;
            for (i, book) in books.iter().enumerate() {
                writeln!(
                    self.out,
                    "   {}. {} by {}",
                    first + i as u64,
                    field(&book.title),
                    field(&book.author)
                )?;
            }
        }

        Ok(())
    }

    async fn aggregations(&mut self) -> Result<()> {
        writeln!(self.out, "1. Average price of books by genre:")?;
        for genre in self.db.average_price_by_genre().await? {
            writeln!(
                self.out,
                "   - {}: ${} ({} books)",
                field(&genre.genre),
                field(&genre.average_price),
                genre.book_count
            )?;
        }

        writeln!(self.out, "\n2. Author with the most books:")?;
        if let Some(author) = self.db.top_author().await? {
            writeln!(self.out, "   - {}: {} books", field(&author.author), author.book_count)?;
            writeln!(self.out, "     Titles: {}", author.titles.join(", "))?;
        }

        writeln!(self.out, "\n3. Books grouped by publication decade:")?;
        for decade in self.db.books_by_decade().await? {
            writeln!(self.out, "   - {}: {} book(s)", field(&decade.decade), decade.book_count)?;
            for book in &decade.books {
                writeln!(self.out, "     • {} ({})", field(&book.title), field(&book.year))?;
            }
        }

        Ok(())
    }

    async fn indexing(&mut self) -> Result<()> {
        writeln!(self.out, "1. Creating index on \"title\" field...")?;
        self.db.create_index(doc! { "title": 1 }).await?;
        writeln!(self.out, "   ✓ Index created successfully")?;

        writeln!(self.out, "\n2. Creating compound index on \"author\" and \"published_year\"...")?;
        self.db
            .create_index(doc! { "author": 1, "published_year": -1 })
            .await?;
        writeln!(self.out, "   ✓ Compound index created successfully")?;

        writeln!(self.out, "\n3. All indexes on {} collection:", self.db.collection_name())?;
        for index in self.db.list_indexes().await? {
            writeln!(self.out, "   - {}: {}", index.name, format_index_key(&index.keys))?;
        }

        writeln!(self.out, "\n4. Performance Analysis:")?;

        writeln!(self.out, "\n   a) Query WITHOUT index (collection scan on \"pages\"):")?;
        let stats = self
            .db
            .explain_find(doc! { "pages": { "$gt": EXPLAIN_MIN_PAGES } })
            .await?;
        self.write_explain(&stats, false)?;

        writeln!(self.out, "\n   b) Query WITH index on \"title\":")?;
        let stats = self.db.explain_find(doc! { "title": EXPLAIN_TITLE }).await?;
        self.write_explain(&stats, true)?;

        writeln!(self.out, "\n   c) Query WITH compound index:")?;
        let stats = self
            .db
            .explain_find(doc! {
                "author": EXPLAIN_AUTHOR,
                "published_year": { "$gte": EXPLAIN_FROM_YEAR },
            })
            .await?;
        self.write_explain(&stats, false)?;

        Ok(())
    }

    fn write_explain(&mut self, stats: &ExplainStats, show_index: bool) -> Result<()> {
        writeln!(self.out, "      - Execution Time: {}ms", stats.execution_time_millis)?;
        writeln!(self.out, "      - Documents Examined: {}", stats.total_docs_examined)?;
        writeln!(self.out, "      - Documents Returned: {}", stats.n_returned)?;
        if show_index {
            writeln!(
                self.out,
                "      - Index Used: {}",
                stats.index_name.as_deref().unwrap_or("N/A")
            )?;
        }
        Ok(())
    }

    async fn bonus(&mut self) -> Result<()> {
        writeln!(self.out, "Top {} most expensive books:", PREVIEW_LIMIT)?;
        let expensive = self.db.most_expensive(PREVIEW_LIMIT).await?;
        for (i, book) in expensive.iter().enumerate() {
            writeln!(
                self.out,
                "   {}. \"{}\" by {} - ${}",
                i + 1,
                field(&book.title),
                field(&book.author),
                field(&book.price)
            )?;
        }

        writeln!(self.out, "\nSummary Statistics:")?;
        if let Some(stats) = self.db.summary().await? {
            writeln!(self.out, "   - Total Books: {}", stats.total_books)?;
            writeln!(self.out, "   - Average Price: ${}", format_amount(stats.average_price))?;
            writeln!(
                self.out,
                "   - Price Range: ${} - ${}",
                field(&stats.min_price),
                field(&stats.max_price)
            )?;
            writeln!(self.out, "   - Average Pages: {}", format_rounded(stats.average_pages))?;
            writeln!(self.out, "   - Books In Stock: {}", stats.books_in_stock)?;
            writeln!(self.out, "   - Books Out of Stock: {}", stats.books_out_of_stock())?;
        }

        Ok(())
    }
}

/// Connects, pings the server, runs every section in order and closes the
/// client.
///
/// Any failure, including an unusable connection string, stops the sequence.
/// It is logged once here and returned after the connection has been closed.
pub async fn run_queries<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    let mut client: Option<Database> = None;

    let result: Result<()> = async {
        let db = client.insert(Database::new(config).await?);
        db.ping().await?;
        writeln!(out, "Connected to MongoDB\n")?;

        let mut runner = QueryRunner::new(db, &mut *out, config.page_size)?;
        runner.run_all().await
    }
    .await;

    if let Err(e) = &result {
        error!("Error occurred: {:#}", e);
    }

    if let Some(db) = client {
        db.close().await;
    }
    writeln!(out, "Connection closed")?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_run_in_task_order() {
        let titles: Vec<&str> = Section::ALL.iter().map(|s| s.title()).collect();
        assert_eq!(
            titles,
            vec![
                "TASK 2: BASIC CRUD OPERATIONS",
                "TASK 3: ADVANCED QUERIES",
                "TASK 4: AGGREGATION PIPELINE",
                "TASK 5: INDEXING",
                "BONUS: ADDITIONAL QUERIES",
            ]
        );
    }

    #[tokio::test]
    async fn test_runner_rejects_non_positive_page_size() {
        let db = Database::new(&Config::default()).await.unwrap();

        for page_size in [0, -1, i64::MIN] {
            let result = QueryRunner::new(&db, Vec::<u8>::new(), page_size);
            assert!(matches!(
                result,
                Err(BookstoreError::InvalidPageSize { page_size: rejected }) if rejected == page_size
            ));
        }
        assert!(QueryRunner::new(&db, Vec::<u8>::new(), 5).is_ok());
    }
}
