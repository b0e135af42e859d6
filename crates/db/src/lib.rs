use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod bootstrap;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// The service runs on exactly one database connection.
const MAX_CONNECTIONS: u32 = 1;

/// Open the single-connection pool. Fails if the first connection cannot
/// be established.
pub async fn connect(options: &PgConnectOptions) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .min_connections(MAX_CONNECTIONS)
        .connect_with(options.clone())
        .await
}

/// Round-trip a trivial query to confirm the connection is usable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the bundled schema from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
