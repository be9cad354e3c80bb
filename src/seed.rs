use anyhow::Result;
use tracing::{info, warn};

use crate::db::Database;
use crate::models::Book;

/// What `seed_books` did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted(usize),
    /// The collection already had this many books and was left alone
    AlreadySeeded(u64),
}

pub fn sample_books() -> Vec<Book> {
    vec![
        Book::new("To Kill a Mockingbird", "Harper Lee", "Fiction", 1960, 12.99, true, 336, "J. B. Lippincott & Co."),
        Book::new("1984", "George Orwell", "Dystopian", 1949, 10.99, true, 328, "Secker & Warburg"),
        Book::new("The Great Gatsby", "F. Scott Fitzgerald", "Fiction", 1925, 9.99, true, 180, "Charles Scribner's Sons"),
        Book::new("Brave New World", "Aldous Huxley", "Dystopian", 1932, 11.5, false, 311, "Chatto & Windus"),
        Book::new("The Hobbit", "J.R.R. Tolkien", "Fantasy", 1937, 14.99, true, 310, "George Allen & Unwin"),
        Book::new("The Catcher in the Rye", "J.D. Salinger", "Fiction", 1951, 8.99, true, 224, "Little, Brown and Company"),
        Book::new("Pride and Prejudice", "Jane Austen", "Romance", 1813, 7.99, true, 432, "T. Egerton"),
        Book::new("The Lord of the Rings", "J.R.R. Tolkien", "Fantasy", 1954, 19.99, true, 1178, "Allen & Unwin"),
        Book::new("Animal Farm", "George Orwell", "Political Satire", 1945, 8.5, false, 112, "Secker & Warburg"),
        Book::new("The Alchemist", "Paulo Coelho", "Fiction", 1988, 10.99, true, 197, "HarperOne"),
        Book::new("Moby Dick", "Herman Melville", "Adventure", 1851, 12.5, false, 635, "Harper & Brothers"),
        Book::new("Wuthering Heights", "Emily Brontë", "Gothic Fiction", 1847, 9.99, true, 416, "Thomas Cautley Newby"),
    ]
}

/// Loads the sample books. An existing, non-empty collection is kept as is
/// unless `drop_existing` is set, in which case it is dropped first.
pub async fn seed_books(db: &Database, drop_existing: bool) -> Result<SeedOutcome> {
    if drop_existing {
        warn!("Dropping collection '{}' before seeding", db.collection_name());
        db.books().drop().await?;
    } else {
        let existing = db.count_books().await?;
        if existing > 0 {
            info!("📚 Collection '{}' already holds {} books, skipping seed", db.collection_name(), existing);
            return Ok(SeedOutcome::AlreadySeeded(existing));
        }
    }

    let result = db.books().insert_many(sample_books()).await?;
    let inserted = result.inserted_ids.len();
    info!("✅ Inserted {} books into '{}'", inserted, db.collection_name());

    Ok(SeedOutcome::Inserted(inserted))
}
