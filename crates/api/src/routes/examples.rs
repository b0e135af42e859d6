use axum::routing::get;
use axum::Router;

use crate::handlers::examples;
use crate::state::AppState;

/// Mount the sample-records route at the root.
///
/// ```text
/// GET /examples -> list_examples
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/examples", get(examples::list_examples))
}
