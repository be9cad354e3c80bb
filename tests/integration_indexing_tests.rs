#[cfg(test)]
mod tests {
    use anyhow::Result;
    use bookstore::test_utils::TestContext;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_created_indexes_are_listed() {
        let ctx = TestContext::seeded().await;

        let result: Result<()> = async {
            let db = &ctx.db;

            assert_eq!(db.create_index(doc! { "title": 1 }).await?, "title_1");
            assert_eq!(
                db.create_index(doc! { "author": 1, "published_year": -1 }).await?,
                "author_1_published_year_-1"
            );
            // Re-creating with the same keys is accepted
            assert_eq!(db.create_index(doc! { "title": 1 }).await?, "title_1");

            let indexes = db.list_indexes().await?;
            let names: Vec<&str> = indexes.iter().map(|i| i.name.as_str()).collect();
            assert_eq!(indexes.len(), 3);
            assert!(names.contains(&"_id_"));
            assert!(names.contains(&"title_1"));

            let compound = indexes
                .iter()
                .find(|i| i.name == "author_1_published_year_-1")
                .unwrap();
            let keys: Vec<&String> = compound.keys.keys().collect();
            assert_eq!(keys, vec!["author", "published_year"]);

            Ok(())
        }.await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }

        result.unwrap();
    }

    #[tokio::test]
    async fn test_explain_reports_scan_and_index_usage() {
        let ctx = TestContext::seeded().await;

        let result: Result<()> = async {
            let db = &ctx.db;

            let scan = db.explain_find(doc! { "pages": { "$gt": 300 } }).await?;
            assert_eq!(scan.total_docs_examined, 12);
            assert_eq!(scan.n_returned, 8);
            assert!(scan.index_name.is_none());

            db.create_index(doc! { "title": 1 }).await?;
            let by_title = db.explain_find(doc! { "title": "1984" }).await?;
            assert_eq!(by_title.n_returned, 1);
            assert_eq!(by_title.total_docs_examined, 1);
            assert_eq!(by_title.index_name.as_deref(), Some("title_1"));

            db.create_index(doc! { "author": 1, "published_year": -1 }).await?;
            let compound = db
                .explain_find(doc! { "author": "J.R.R. Tolkien", "published_year": { "$gte": 1950 } })
                .await?;
            assert_eq!(compound.n_returned, 1);
            assert_eq!(compound.index_name.as_deref(), Some("author_1_published_year_-1"));

            Ok(())
        }.await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }

        result.unwrap();
    }
}
