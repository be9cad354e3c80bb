#[cfg(test)]
mod tests {
    use anyhow::Result;
    use bookstore::runner::{self, QueryRunner, Section};
    use bookstore::test_utils::TestContext;
    use bookstore::{BookstoreError, Config};
    use mongodb::bson::{doc, Bson};

    #[tokio::test]
    async fn test_full_run_prints_every_section_and_closes() {
        let ctx = TestContext::seeded().await;

        let result: Result<()> = async {
            let mut out = Vec::new();
            runner::run_queries(&ctx.config, &mut out).await?;
            let report = String::from_utf8(out)?;

            assert!(report.starts_with("Connected to MongoDB\n\n=== TASK 2: BASIC CRUD OPERATIONS ===\n"));
            for section in Section::ALL {
                assert!(report.contains(&format!("=== {} ===", section.title())));
            }
            assert!(report.contains("   - The Great Gatsby by F. Scott Fitzgerald"));
            assert!(report.contains("   New price: $15.99"));
            assert!(report.contains("   Deleted 1 document(s)"));
            assert!(report.contains("   Remaining books: 11"));
            assert!(report.contains("   No books found matching criteria"));
            assert!(report.contains("\n4b. Pagination - Page 2 (books 6-10):\n   6. "));
            assert!(report.contains("   - title_1: {\"title\":1}"));
            assert!(report.contains("   - author_1_published_year_-1: {\"author\":1,\"published_year\":-1}"));
            assert!(report.contains("      - Index Used: title_1"));
            assert!(report.contains("   - Books Out of Stock: 3"));
            assert!(report.ends_with("=== ALL QUERIES COMPLETED SUCCESSFULLY ===\n\nConnection closed\n"));

            // Sections must appear in execution order
            let positions: Vec<usize> = Section::ALL
                .iter()
                .map(|s| report.find(s.title()).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));

            assert_eq!(ctx.db.count_books().await?, 11);
            assert_eq!(ctx.db.require_by_title("The Great Gatsby").await?.price, Some(15.99));

            Ok(())
        }.await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }

        result.unwrap();
    }

    #[tokio::test]
    async fn test_missing_update_target_aborts_remaining_sections() {
        let ctx = TestContext::new().await;

        let result: Result<()> = async {
            let mut out = Vec::new();
            let mut runner = QueryRunner::new(&ctx.db, &mut out, ctx.config.page_size)?;
            let err = runner.run_all().await.unwrap_err();
            assert!(err.to_string().contains("The Great Gatsby"));

            let report = String::from_utf8(out)?;
            assert!(report.contains("   Modified 0 document(s)"));
            assert!(!report.contains("5. Deleting"));
            assert!(!report.contains(Section::Advanced.title()));

            Ok(())
        }.await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }

        result.unwrap();
    }

    #[tokio::test]
    async fn test_single_section_on_seeded_books() {
        let ctx = TestContext::seeded().await;

        let result: Result<()> = async {
            let mut runner = QueryRunner::new(&ctx.db, Vec::new(), 4)?;
            runner.run_section(Section::Advanced).await?;
            let report = String::from_utf8(runner.into_inner())?;

            assert!(report.starts_with("=== TASK 3: ADVANCED QUERIES ===\n\n"));
            assert!(report.contains("\n3a. Books sorted by price (ascending) - Top 5:\n   - Pride and Prejudice: $7.99\n"));
            assert!(report.contains("\n3b. Books sorted by price (descending) - Top 5:\n   - The Lord of the Rings: $19.99\n"));
            assert!(report.contains("4b. Pagination - Page 2 (books 5-8):"));
            assert!(report.contains("   8. "));
            assert!(!report.contains("   9. "));

            Ok(())
        }.await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }

        result.unwrap();
    }

    #[tokio::test]
    async fn test_mixed_field_types_are_reported_not_rejected() {
        let ctx = TestContext::seeded().await;

        let result: Result<()> = async {
            ctx.db
                .raw_books()
                .insert_many(vec![
                    doc! {
                        "title": "Dune",
                        "author": "Frank Herbert",
                        "genre": "Fiction",
                        "published_year": 1965.0,
                        "price": "9.99",
                        "in_stock": true,
                        "pages": 412.0,
                    },
                    doc! {
                        "title": Bson::Null,
                        "author": "George Orwell",
                        "genre": "Essay",
                        "published_year": 1946_i64,
                    },
                ])
                .await?;

            let mut runner = QueryRunner::new(&ctx.db, Vec::new(), ctx.config.page_size)?;
            runner.run_section(Section::Crud).await?;
            runner.run_section(Section::Aggregation).await?;
            let report = String::from_utf8(runner.into_inner())?;

            assert!(report.contains("   - Dune by Frank Herbert"));
            assert!(report.contains("   - Dune (1965)"));
            assert!(report.contains("   - n/a (1946)"));
            assert!(report.contains("   - George Orwell: 3 books"));
            let titles = report.lines().find(|l| l.starts_with("     Titles: ")).unwrap();
            assert!(titles.contains("1984") && titles.contains("Animal Farm"));
            assert!(report.contains("     • Dune (1965)"));
            assert!(report.contains("     • n/a (1946)"));

            Ok(())
        }.await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }

        result.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server_still_closes_connection() {
        let config = Config {
            mongodb_uri: "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=500".to_string(),
            ..Config::default()
        };

        let mut out = Vec::new();
        let result = runner::run_queries(&config, &mut out).await;
        assert!(result.is_err());

        let report = String::from_utf8(out).unwrap();
        assert!(!report.contains("Connected to MongoDB"));
        assert_eq!(report, "Connection closed\n");
    }

    #[tokio::test]
    async fn test_invalid_connection_string_is_reported_and_closed() {
        let config = Config {
            mongodb_uri: "not-a-uri".to_string(),
            ..Config::default()
        };

        let mut out = Vec::new();
        let result = runner::run_queries(&config, &mut out).await;
        assert!(result.is_err());
        assert_eq!(String::from_utf8(out).unwrap(), "Connection closed\n");
    }

    #[tokio::test]
    async fn test_invalid_page_size_aborts_before_queries() {
        let ctx = TestContext::seeded().await;

        let result: Result<()> = async {
            let config = Config { page_size: -1, ..ctx.config.clone() };
            let mut out = Vec::new();
            let err = runner::run_queries(&config, &mut out).await.unwrap_err();
            assert!(matches!(
                err.downcast_ref::<BookstoreError>(),
                Some(BookstoreError::InvalidPageSize { page_size: -1 })
            ));
            assert_eq!(String::from_utf8(out)?, "Connected to MongoDB\n\nConnection closed\n");
            assert_eq!(ctx.db.count_books().await?, 12);

            Ok(())
        }.await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }

        result.unwrap();
    }
}
