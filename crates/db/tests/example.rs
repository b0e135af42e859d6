//! Integration tests for `ExampleRepo`.

use prism_db::repositories::ExampleRepo;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_table_lists_nothing(pool: PgPool) {
    let rows = ExampleRepo::list(&pool).await.unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rows_are_returned_as_objects(pool: PgPool) {
    sqlx::query("INSERT INTO example_table (name) VALUES ('alpha'), ('beta')")
        .execute(&pool)
        .await
        .unwrap();

    let rows = ExampleRepo::list(&pool).await.unwrap();
    assert_eq!(rows.len(), 2);

    let mut names: Vec<&str> = rows
        .iter()
        .map(|r| r.row["name"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    assert_eq!(names, ["alpha", "beta"]);

    // Every column is passed through.
    assert!(rows[0].row["id"].is_number());
    assert!(rows[0].row["created_at"].is_string());
}
