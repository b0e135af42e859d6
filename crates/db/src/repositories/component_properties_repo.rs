//! Repository for the `component_properties` table.

use prism_core::spacing::SpacingProperties;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::component_properties::ComponentProperties;

/// Column list for `component_properties` queries.
const COLUMNS: &str = "component_id, margin, padding, created_at, updated_at";

/// Provides data access for per-component margin / padding.
pub struct ComponentPropertiesRepo;

impl ComponentPropertiesRepo {
    /// Find the properties stored for a component.
    ///
    /// Returns `None` if the component has never been saved.
    pub async fn find(
        pool: &PgPool,
        component_id: &str,
    ) -> Result<Option<ComponentProperties>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM component_properties WHERE component_id = $1");
        sqlx::query_as::<_, ComponentProperties>(&query)
            .bind(component_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or fully replace a component's margin and padding.
    ///
    /// A single `ON CONFLICT (component_id) DO UPDATE` statement, so
    /// concurrent writers for the same id never produce a merged row.
    pub async fn upsert(
        pool: &PgPool,
        component_id: &str,
        properties: &SpacingProperties,
    ) -> Result<ComponentProperties, sqlx::Error> {
        let query = format!(
            "INSERT INTO component_properties (component_id, margin, padding) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (component_id) DO UPDATE SET \
                 margin = EXCLUDED.margin, \
                 padding = EXCLUDED.padding, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ComponentProperties>(&query)
            .bind(component_id)
            .bind(Json(&properties.margin))
            .bind(Json(&properties.padding))
            .fetch_one(pool)
            .await
    }
}
