use anyhow::Result;
use std::env;

use crate::errors::BookstoreError;

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE_NAME: &str = "plp_bookstore";
pub const DEFAULT_COLLECTION_NAME: &str = "books";
pub const DEFAULT_PAGE_SIZE: i64 = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub mongodb_uri: String,
    pub database_name: String,
    pub collection_name: String,
    /// Number of books per page in the pagination queries
    pub page_size: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let page_size = env::var("PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let config = Config {
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| DEFAULT_MONGODB_URI.to_string()),
            database_name: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string()),
            collection_name: env::var("MONGODB_COLLECTION")
                .unwrap_or_else(|_| DEFAULT_COLLECTION_NAME.to_string()),
            page_size,
        };
        config.validate()?;

        Ok(config)
    }

    /// Apply command line overrides on top of the environment settings.
    pub fn with_overrides(
        mut self,
        uri: Option<&str>,
        database: Option<&str>,
        collection: Option<&str>,
    ) -> Self {
        if let Some(uri) = uri {
            self.mongodb_uri = uri.to_string();
        }
        if let Some(database) = database {
            self.database_name = database.to_string();
        }
        if let Some(collection) = collection {
            self.collection_name = collection.to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), BookstoreError> {
        if self.page_size <= 0 {
            return Err(BookstoreError::InvalidPageSize { page_size: self.page_size });
        }
        Ok(())
    }
}
