//! Handlers for per-component margin / padding.
//!
//! Responses are bare JSON (no `{ "data": ... }` envelope) because the
//! prism editor reads `margin` and `padding` at the top level.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use prism_core::error::CoreError;
use prism_core::spacing::SpacingProperties;
use prism_db::repositories::ComponentPropertiesRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Acknowledgement returned by a successful save.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
}

/// GET /api/properties/{component_id}
///
/// Stored margin / padding, or all sides `"auto"` when the component has
/// never been saved. A missing row is not an error.
pub async fn get_properties(
    State(state): State<AppState>,
    Path(component_id): Path<String>,
) -> AppResult<Json<SpacingProperties>> {
    let properties = ComponentPropertiesRepo::find(&state.pool, &component_id)
        .await?
        .map(|row| row.properties())
        .unwrap_or_default();

    Ok(Json(properties))
}

/// POST /api/properties/{component_id}
///
/// Replace both margin and padding. The body must carry all four sides of
/// each; nothing is stored unless the whole body is valid.
///
/// A body that is not JSON is a `BAD_REQUEST`; JSON with a missing side or
/// an invalid value is a `VALIDATION_ERROR`.
pub async fn set_properties(
    State(state): State<AppState>,
    Path(component_id): Path<String>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<Json<SaveResponse>> {
    let Json(body) = payload?;
    let properties: SpacingProperties =
        serde_json::from_value(body).map_err(|e| CoreError::Validation(e.to_string()))?;

    ComponentPropertiesRepo::upsert(&state.pool, &component_id, &properties).await?;

    tracing::info!(
        component_id = %component_id,
        margin = %serde_json::to_string(&properties.margin).unwrap_or_default(),
        padding = %serde_json::to_string(&properties.padding).unwrap_or_default(),
        "Component properties saved",
    );

    Ok(Json(SaveResponse { success: true }))
}
