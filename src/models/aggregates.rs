use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenreAveragePrice {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub genre: Option<String>,
    /// Rounded to two decimals by the server
    #[serde(rename = "averagePrice", default, deserialize_with = "lenient::opt_f64")]
    pub average_price: Option<f64>,
    #[serde(rename = "bookCount")]
    pub book_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorBookCount {
    #[serde(rename = "_id", default, deserialize_with = "lenient::opt_string")]
    pub author: Option<String>,
    #[serde(rename = "bookCount")]
    pub book_count: i64,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub titles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecadeBook {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecadeGroup {
    /// Label such as `1920s`; null when the books had no publication year
    #[serde(rename = "_id", default, deserialize_with = "lenient::opt_string")]
    pub decade: Option<String>,
    #[serde(rename = "bookCount")]
    pub book_count: i64,
    #[serde(default)]
    pub books: Vec<DecadeBook>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionSummary {
    #[serde(rename = "totalBooks")]
    pub total_books: i64,
    #[serde(rename = "averagePrice", default, deserialize_with = "lenient::opt_f64")]
    pub average_price: Option<f64>,
    #[serde(rename = "minPrice", default, deserialize_with = "lenient::opt_f64")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice", default, deserialize_with = "lenient::opt_f64")]
    pub max_price: Option<f64>,
    #[serde(rename = "averagePages", default, deserialize_with = "lenient::opt_f64")]
    pub average_pages: Option<f64>,
    #[serde(rename = "booksInStock")]
    pub books_in_stock: i64,
}

impl CollectionSummary {
    pub fn books_out_of_stock(&self) -> i64 {
        self.total_books - self.books_in_stock
    }
}
