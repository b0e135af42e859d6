//! Database row structs.
//!
//! Each submodule contains a `FromRow` entity struct matching a table row.

pub mod component_properties;
pub mod example;
