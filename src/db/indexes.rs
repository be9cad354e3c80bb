use anyhow::Result;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    IndexModel,
};
use tracing::info;

use crate::models::{ExplainStats, IndexInfo};
use super::Database;

impl Database {
    /// Creates an index with the given key pattern and returns its name.
    /// Creating an index that already exists with the same keys is a no-op.
    pub async fn create_index(&self, keys: Document) -> Result<String> {
        let model = IndexModel::builder().keys(keys).build();
        let result = self.raw_books().create_index(model).await?;
        info!("Index '{}' ready on '{}'", result.index_name, self.collection_name());
        Ok(result.index_name)
    }

    pub async fn list_indexes(&self) -> Result<Vec<IndexInfo>> {
        let cursor = self.raw_books().list_indexes().await?;
        let models: Vec<IndexModel> = cursor.try_collect().await?;
        Ok(models.into_iter().map(IndexInfo::from).collect())
    }

    /// Runs `find` with `filter` through `explain` at `executionStats` verbosity.
    pub async fn explain_find(&self, filter: Document) -> Result<ExplainStats> {
        let explain = self
            .database()
            .run_command(doc! {
                "explain": {
                    "find": self.collection_name(),
                    "filter": filter,
                },
                "verbosity": "executionStats",
            })
            .await?;

        Ok(ExplainStats::from_explain(&explain)?)
    }
}
