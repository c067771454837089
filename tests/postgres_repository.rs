//! Runs the SQL repository and migration runner against a live PostgreSQL.
//!
//! `DATABASE_URL=postgres://... cargo test --test postgres_repository -- --ignored`
//! Everything happens inside a throwaway schema that is dropped afterwards.

use std::sync::Arc;

use shelf_app::modules::books::models::{BookFilter, CreateBook, Scope};
use shelf_app::modules::books::repo::{BookRepository, PgBookRepository, RepositoryError};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

fn new_book(title: &str, isbn: &str) -> CreateBook {
    CreateBook {
        title: title.to_string(),
        isbn: isbn.to_string(),
    }
}

async fn scoped_pool(url: &str, schema: &str) -> PgPool {
    let options: PgConnectOptions = url.parse().unwrap();
    PgPoolOptions::new()
        .max_connections(2)
        .connect_with(options.options([("search_path", schema)]))
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a PostgreSQL server"]
async fn pg_repository_round_trip() {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let schema = format!(
        "shelf_test_{}_{}",
        std::process::id(),
        chrono::Utc::now().timestamp_micros()
    );
    let admin = PgPool::connect(&url).await.unwrap();
    sqlx::raw_sql(&format!("CREATE SCHEMA {schema}"))
        .execute(&admin)
        .await
        .unwrap();

    let pool = scoped_pool(&url, &schema).await;
    let registry = shelf_app::registry(Arc::new(PgBookRepository::new(pool.clone())));
    let migrations = registry.collect_migrations();

    assert_eq!(shelf_db::run_migrations(&pool, &migrations).await.unwrap(), 1);
    assert_eq!(shelf_db::run_migrations(&pool, &migrations).await.unwrap(), 0);

    let repo = PgBookRepository::new(pool.clone());

    let first = repo.insert(&new_book("Book 1", "9780306406157")).await.unwrap();
    let second = repo.insert(&new_book("Book 2", "9781861972712")).await.unwrap();
    assert!(second.id > first.id);
    assert!(first.deleted_at.is_none());

    let err = repo
        .insert(&new_book("Copy", "9780306406157"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueViolation { field: "isbn", .. }));

    let by_isbn = repo
        .find_one(&BookFilter::Isbn("9781861972712".to_string()), Scope::Active)
        .await
        .unwrap();
    assert_eq!(by_isbn, Some(second.clone()));

    let mut renamed = first.clone();
    renamed.title = "Updated Book Title".to_string();
    let updated = repo.update(&renamed).await.unwrap();
    assert_eq!(updated.title, "Updated Book Title");
    assert_eq!(updated.isbn, first.isbn);

    let deleted = repo.soft_delete(first.id).await.unwrap();
    assert!(deleted.deleted_at.is_some());
    assert!(matches!(
        repo.soft_delete(first.id).await.unwrap_err(),
        RepositoryError::Missing(_)
    ));

    let active = repo.find_all(Scope::Active).await.unwrap();
    assert_eq!(active, vec![second]);
    assert_eq!(repo.find_all(Scope::WithDeleted).await.unwrap().len(), 2);
    assert!(repo
        .find_one(&BookFilter::Id(first.id), Scope::Active)
        .await
        .unwrap()
        .is_none());

    pool.close().await;
    sqlx::raw_sql(&format!("DROP SCHEMA {schema} CASCADE"))
        .execute(&admin)
        .await
        .unwrap();
}
