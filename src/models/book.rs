use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

use super::lenient;

/// A book record. The collection carries no schema, so every field may be
/// absent on read or stored with an unexpected BSON type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Book {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Bson>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i32", skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_i32", skip_serializing_if = "Option::is_none")]
    pub pages: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: &str,
        author: &str,
        genre: &str,
        published_year: i32,
        price: f64,
        in_stock: bool,
        pages: i32,
        publisher: &str,
    ) -> Self {
        Self {
            id: None,
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            genre: Some(genre.to_string()),
            published_year: Some(published_year),
            price: Some(price),
            in_stock: Some(in_stock),
            pages: Some(pages),
            publisher: Some(publisher.to_string()),
        }
    }
}

/// Projection `{ title, author, price }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookSummary {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub price: Option<f64>,
}

/// Projection `{ title, price }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitlePrice {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub price: Option<f64>,
}

/// Projection `{ title, author }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleAuthor {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub author: Option<String>,
}
