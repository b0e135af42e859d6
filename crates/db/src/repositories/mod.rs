//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod component_properties_repo;
pub mod example_repo;

pub use component_properties_repo::ComponentPropertiesRepo;
pub use example_repo::ExampleRepo;
