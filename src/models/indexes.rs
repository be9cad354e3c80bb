use mongodb::bson::{Bson, Document};
use mongodb::IndexModel;

use crate::errors::BookstoreError;

/// An index as reported by `listIndexes`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexInfo {
    pub name: String,
    pub keys: Document,
}

impl From<IndexModel> for IndexInfo {
    fn from(model: IndexModel) -> Self {
        let name = model
            .options
            .and_then(|opts| opts.name)
            .unwrap_or_default();
        Self { name, keys: model.keys }
    }
}

/// The parts of an `executionStats` explain that the report prints.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainStats {
    pub execution_time_millis: i64,
    pub total_docs_examined: i64,
    pub n_returned: i64,
    /// First index found while walking the winning execution stage tree
    pub index_name: Option<String>,
}

impl ExplainStats {
    pub fn from_explain(explain: &Document) -> Result<Self, BookstoreError> {
        let stats = explain
            .get_document("executionStats")
            .map_err(|_| BookstoreError::missing_explain_stats("executionStats"))?;

        let index_name = stats
            .get_document("executionStages")
            .ok()
            .and_then(find_index_name);

        Ok(Self {
            execution_time_millis: number_field(stats, "executionTimeMillis")?,
            total_docs_examined: number_field(stats, "totalDocsExamined")?,
            n_returned: number_field(stats, "nReturned")?,
            index_name,
        })
    }
}

fn number_field(stats: &Document, field: &str) -> Result<i64, BookstoreError> {
    match stats.get(field) {
        Some(Bson::Int32(v)) => Ok(i64::from(*v)),
        Some(Bson::Int64(v)) => Ok(*v),
        Some(Bson::Double(v)) => Ok(*v as i64),
        _ => Err(BookstoreError::missing_explain_stats(field)),
    }
}

// IXSCAN usually sits below a FETCH stage, so look through the inputs too.
fn find_index_name(stage: &Document) -> Option<String> {
    if let Ok(name) = stage.get_str("indexName") {
        return Some(name.to_string());
    }
    if let Ok(input) = stage.get_document("inputStage") {
        if let Some(name) = find_index_name(input) {
            return Some(name);
        }
    }
    stage
        .get_array("inputStages")
        .ok()?
        .iter()
        .filter_map(Bson::as_document)
        .find_map(find_index_name)
}
