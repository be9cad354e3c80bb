use anyhow::Result;
use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    Client, Collection,
};
use tracing::{debug, info};

use crate::config::Config;
use crate::models::Book;

pub mod books;
pub mod aggregations;
pub mod indexes;

/// Handle on the bookstore collection and the client that owns it.
#[derive(Clone, Debug)]
pub struct Database {
    client: Client,
    db: mongodb::Database,
    collection_name: String,
}

impl Database {
    /// Builds the client. No network traffic happens until the first command.
    pub async fn new(config: &Config) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.mongodb_uri).await?;
        options.app_name = Some("bookstore".to_string());
        let client = Client::with_options(options)?;
        let db = client.database(&config.database_name);

        debug!(
            "Client created for database '{}' collection '{}'",
            config.database_name, config.collection_name
        );

        Ok(Self {
            client,
            db,
            collection_name: config.collection_name.clone(),
        })
    }

    /// Round-trips a `ping` so connection problems surface up front.
    pub async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        info!("Successfully connected to MongoDB");
        Ok(())
    }

    pub fn books(&self) -> Collection<Book> {
        self.db.collection(&self.collection_name)
    }

    pub fn raw_books(&self) -> Collection<Document> {
        self.db.collection(&self.collection_name)
    }

    pub fn database(&self) -> &mongodb::Database {
        &self.db
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Closes every connection held by the client.
    pub async fn close(self) {
        self.client.shutdown().await;
        info!("MongoDB client shut down");
    }
}
