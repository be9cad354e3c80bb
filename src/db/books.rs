use anyhow::Result;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::BookstoreError;
use crate::models::{Book, BookSummary, TitleAuthor, TitlePrice};
use super::Database;

/// Direction of a single-field sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

impl Database {
    async fn find_books(&self, filter: Document) -> Result<Vec<Book>> {
        debug!("find {:?}", filter);
        let cursor = self.books().find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_projected<T>(
        &self,
        projection: Document,
        sort: Option<Document>,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        let collection = self.books().clone_with_type::<T>();
        let mut find = collection
            .find(doc! {})
            .projection(projection)
            .skip(skip)
            .limit(limit);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }

        let cursor = find.await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_genre(&self, genre: &str) -> Result<Vec<Book>> {
        self.find_books(doc! { "genre": genre }).await
    }

    pub async fn find_published_after(&self, year: i32) -> Result<Vec<Book>> {
        self.find_books(doc! { "published_year": { "$gt": year } }).await
    }

    pub async fn find_by_author(&self, author: &str) -> Result<Vec<Book>> {
        self.find_books(doc! { "author": author }).await
    }

    pub async fn find_by_title(&self, title: &str) -> Result<Option<Book>> {
        Ok(self.books().find_one(doc! { "title": title }).await?)
    }

    /// Sets the price of the first book with `title`, returning the modified count.
    pub async fn update_price(&self, title: &str, price: f64) -> Result<u64> {
        let result = self
            .books()
            .update_one(doc! { "title": title }, doc! { "$set": { "price": price } })
            .await?;
        debug!(
            "update price of '{}': matched {}, modified {}",
            title, result.matched_count, result.modified_count
        );
        Ok(result.modified_count)
    }

    /// Reads back a book that the caller expects to exist.
    pub async fn require_by_title(&self, title: &str) -> Result<Book> {
        self.find_by_title(title)
            .await?
            .ok_or_else(|| BookstoreError::book_not_found(title).into())
    }

    /// Deletes the first book with `title`, returning the deleted count.
    pub async fn delete_by_title(&self, title: &str) -> Result<u64> {
        let result = self.books().delete_one(doc! { "title": title }).await?;
        Ok(result.deleted_count)
    }

    pub async fn count_books(&self) -> Result<u64> {
        Ok(self.books().count_documents(doc! {}).await?)
    }

    pub async fn find_in_stock_published_after(&self, year: i32) -> Result<Vec<Book>> {
        self.find_books(doc! {
            "$and": [
                { "in_stock": true },
                { "published_year": { "$gt": year } },
            ]
        })
        .await
    }

    /// Title, author and price of the first `limit` books in natural order.
    pub async fn list_summaries(&self, limit: i64) -> Result<Vec<BookSummary>> {
        self.find_projected(
            doc! { "title": 1, "author": 1, "price": 1, "_id": 0 },
            None,
            0,
            limit,
        )
        .await
    }

    pub async fn list_sorted_by_price(&self, order: SortOrder, limit: i64) -> Result<Vec<TitlePrice>> {
        self.find_projected(
            doc! { "title": 1, "price": 1, "_id": 0 },
            Some(doc! { "price": order.as_i32() }),
            0,
            limit,
        )
        .await
    }

    /// One page of title/author pairs. Pages are numbered from 1.
    pub async fn list_page(&self, page: u64, page_size: i64) -> Result<Vec<TitleAuthor>> {
        if page_size <= 0 {
            return Err(BookstoreError::InvalidPageSize { page_size }.into());
        }
        let skip = page.saturating_sub(1) * page_size as u64;
        self.find_projected(
            doc! { "title": 1, "author": 1, "_id": 0 },
            None,
            skip,
            page_size,
        )
        .await
    }
}
