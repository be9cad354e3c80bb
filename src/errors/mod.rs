use thiserror::Error;

/// Failures the bookstore queries can name on their own. Everything coming
/// out of the driver is propagated unchanged through `anyhow`.
#[derive(Error, Debug)]
pub enum BookstoreError {
    #[error("Book with title '{title}' not found")]
    BookNotFound { title: String },

    #[error("Explain output is missing '{field}'")]
    MissingExplainStats { field: String },

    #[error("Invalid page size {page_size}: must be greater than zero")]
    InvalidPageSize { page_size: i64 },
}

impl BookstoreError {
    pub fn book_not_found<S: Into<String>>(title: S) -> Self {
        Self::BookNotFound { title: title.into() }
    }

    pub fn missing_explain_stats<S: Into<String>>(field: S) -> Self {
        Self::MissingExplainStats { field: field.into() }
    }
}
