use anyhow::Result;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use serde::de::DeserializeOwned;

use crate::models::{AuthorBookCount, BookSummary, CollectionSummary, DecadeGroup, GenreAveragePrice};
use super::Database;

pub fn average_price_by_genre_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": "$genre",
                "averagePrice": { "$avg": "$price" },
                "bookCount": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "averagePrice": -1 } },
        doc! {
            "$project": {
                "genre": "$_id",
                "averagePrice": { "$round": ["$averagePrice", 2] },
                "bookCount": 1,
                "_id": 0,
            }
        },
    ]
}

pub fn top_author_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": "$author",
                "bookCount": { "$sum": 1 },
                "titles": { "$push": "$title" },
            }
        },
        doc! { "$sort": { "bookCount": -1 } },
        doc! { "$limit": 1 },
    ]
}

/// Groups books under labels like `1920s`, computed server side as
/// `toString(floor(year / 10) * 10) + "s"`.
pub fn books_by_decade_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$project": {
                "title": 1,
                "published_year": 1,
                "decade": {
                    "$concat": [
                        { "$toString": {
                            "$multiply": [
                                { "$floor": { "$divide": ["$published_year", 10] } },
                                10,
                            ]
                        } },
                        "s",
                    ]
                },
            }
        },
        doc! {
            "$group": {
                "_id": "$decade",
                "bookCount": { "$sum": 1 },
                "books": { "$push": { "title": "$title", "year": "$published_year" } },
            }
        },
        doc! { "$sort": { "_id": 1 } },
    ]
}

pub fn most_expensive_pipeline(limit: i64) -> Vec<Document> {
    vec![
        doc! { "$sort": { "price": -1 } },
        doc! { "$limit": limit },
        doc! { "$project": { "title": 1, "author": 1, "price": 1, "_id": 0 } },
    ]
}

pub fn summary_pipeline() -> Vec<Document> {
    vec![doc! {
        "$group": {
            "_id": Bson::Null,
            "totalBooks": { "$sum": 1 },
            "averagePrice": { "$avg": "$price" },
            "minPrice": { "$min": "$price" },
            "maxPrice": { "$max": "$price" },
            "averagePages": { "$avg": "$pages" },
            "booksInStock": { "$sum": { "$cond": ["$in_stock", 1, 0] } },
        }
    }]
}

impl Database {
    async fn aggregate_into<T: DeserializeOwned>(&self, pipeline: Vec<Document>) -> Result<Vec<T>> {
        let cursor = self.raw_books().aggregate(pipeline).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        let mut results = Vec::with_capacity(documents.len());
        for document in documents {
            results.push(bson::from_document(document)?);
        }
        Ok(results)
    }

    pub async fn average_price_by_genre(&self) -> Result<Vec<GenreAveragePrice>> {
        self.aggregate_into(average_price_by_genre_pipeline()).await
    }

    /// The author with the most books, or `None` for an empty collection.
    pub async fn top_author(&self) -> Result<Option<AuthorBookCount>> {
        let authors = self.aggregate_into(top_author_pipeline()).await?;
        Ok(authors.into_iter().next())
    }

    pub async fn books_by_decade(&self) -> Result<Vec<DecadeGroup>> {
        self.aggregate_into(books_by_decade_pipeline()).await
    }

    pub async fn most_expensive(&self, limit: i64) -> Result<Vec<BookSummary>> {
        self.aggregate_into(most_expensive_pipeline(limit)).await
    }

    pub async fn summary(&self) -> Result<Option<CollectionSummary>> {
        let summaries = self.aggregate_into(summary_pipeline()).await?;
        Ok(summaries.into_iter().next())
    }
}
