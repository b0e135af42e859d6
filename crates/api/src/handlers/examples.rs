//! Handler for the sample-records endpoint.

use axum::extract::State;
use axum::Json;
use prism_db::models::example::ExampleRow;
use prism_db::repositories::ExampleRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /examples
///
/// Every row of `example_table`, unordered. An empty table yields `[]`.
pub async fn list_examples(State(state): State<AppState>) -> AppResult<Json<Vec<ExampleRow>>> {
    let rows = ExampleRepo::list(&state.pool).await?;
    tracing::debug!(count = rows.len(), "Listed examples");
    Ok(Json(rows))
}
