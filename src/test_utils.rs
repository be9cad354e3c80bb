//! Test utilities: a MongoDB container per test context with its own
//! database, optionally pre-loaded with the sample books.

use anyhow::Result;
use std::sync::atomic::{AtomicU32, Ordering};
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mongo::Mongo;

use crate::{config::Config, db::Database, seed};

static DATABASE_COUNTER: AtomicU32 = AtomicU32::new(0);

fn unique_database_name() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!(
        "bookstore_test_{}_{}",
        DATABASE_COUNTER.fetch_add(1, Ordering::SeqCst),
        nanos
    )
}

pub struct TestContext {
    pub db: Database,
    pub config: Config,
    container: ContainerAsync<Mongo>,
}

impl TestContext {
    /// Starts a MongoDB container and connects to a fresh, empty database.
    pub async fn new() -> Self {
        let container = Mongo::default()
            .start()
            .await
            .expect("Failed to start mongo container");
        let port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get mongo port");

        let config = Config {
            mongodb_uri: format!("mongodb://localhost:{}", port),
            database_name: unique_database_name(),
            ..Config::default()
        };

        let db = Database::new(&config).await.expect("Failed to create client");
        db.ping().await.expect("Mongo container not reachable");

        Self { db, config, container }
    }

    /// Same as [`TestContext::new`] with the sample books already inserted.
    pub async fn seeded() -> Self {
        let ctx = Self::new().await;
        seed::seed_books(&ctx.db, false)
            .await
            .expect("Failed to seed sample books");
        ctx
    }

    pub async fn cleanup_and_close(self) -> Result<()> {
        self.db.database().drop().await?;
        self.db.close().await;
        drop(self.container);
        Ok(())
    }
}
