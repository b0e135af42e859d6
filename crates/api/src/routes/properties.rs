//! Route definitions for component properties.

use axum::routing::get;
use axum::Router;

use crate::handlers::properties;
use crate::state::AppState;

/// Component property routes, nested under `/api/properties`.
///
/// ```text
/// GET  /{component_id} -> get_properties
/// POST /{component_id} -> set_properties
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{component_id}",
        get(properties::get_properties).post(properties::set_properties),
    )
}
