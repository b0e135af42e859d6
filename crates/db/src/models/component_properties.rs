//! Margin / padding rows keyed by component id.

use prism_core::spacing::{Spacing, SpacingProperties};
use prism_core::types::{ComponentId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `component_properties` table.
#[derive(Debug, Clone, FromRow)]
pub struct ComponentProperties {
    pub component_id: ComponentId,
    pub margin: Json<Spacing>,
    pub padding: Json<Spacing>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ComponentProperties {
    /// The stored margin / padding pair.
    pub fn properties(&self) -> SpacingProperties {
        SpacingProperties {
            margin: self.margin.0.clone(),
            padding: self.padding.0.clone(),
        }
    }
}
