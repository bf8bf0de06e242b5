//! Live integration tests.
//!
//! These need a reachable database (`DB_URL`) and, for the full pipeline,
//! provider API keys, so they are ignored by default:
//!
//! ```text
//! cargo test -- --ignored
//! ```

use pgchat::catalog::CatalogSnapshot;
use pgchat::db::Database;
use pgchat::llm::is_select_statement;
use pgchat::{Config, Pipeline};

#[tokio::test]
#[ignore] // Requires DB_URL
async fn test_catalog_renders_identically_across_calls() {
    let url = std::env::var("DB_URL").expect("DB_URL not set");
    let db = Database::connect(&url).await.expect("connect failed");

    let first = CatalogSnapshot::introspect(&db).await.expect("introspect failed");
    let second = CatalogSnapshot::introspect(&db).await.expect("introspect failed");

    assert!(!first.is_empty(), "database has no public tables");
    assert_eq!(first.render(), second.render());
}

#[tokio::test]
#[ignore] // Requires DB_URL
async fn test_run_select_carries_header_for_empty_results() {
    let url = std::env::var("DB_URL").expect("DB_URL not set");
    let db = Database::connect(&url).await.expect("connect failed");

    let table = db
        .run_select("SELECT 1 AS \"one\" WHERE false")
        .await
        .expect("select failed");

    assert_eq!(table.columns, vec!["one"]);
    assert!(table.is_empty());
}

#[tokio::test]
#[ignore] // Requires DB_URL + provider API keys
async fn test_ask_end_to_end() {
    let config = Config::from_env().expect("config incomplete");
    let pipeline = Pipeline::from_config(&config, false)
        .await
        .expect("pipeline setup failed");

    let exchange = pipeline
        .ask("How many tables have an Id column?")
        .await
        .expect("ask failed");

    assert!(is_select_statement(&exchange.sql));
    assert!(!exchange.answer.is_empty());
}
