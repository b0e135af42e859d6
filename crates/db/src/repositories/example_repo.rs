//! Repository for the `example_table` table.

use sqlx::PgPool;

use crate::models::example::ExampleRow;

/// Read-only access to sample records.
pub struct ExampleRepo;

impl ExampleRepo {
    /// All rows, in whatever order Postgres returns them.
    pub async fn list(pool: &PgPool) -> Result<Vec<ExampleRow>, sqlx::Error> {
        sqlx::query_as::<_, ExampleRow>("SELECT to_jsonb(e) AS row FROM example_table e")
            .fetch_all(pool)
            .await
    }
}
