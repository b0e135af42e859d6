use serde::Serialize;
use sqlx::FromRow;

/// A row from `example_table`, as a JSON object keyed by column name.
///
/// The table has no fixed shape as far as the API is concerned; rows are
/// passed through verbatim.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(transparent)]
pub struct ExampleRow {
    pub row: serde_json::Value,
}
