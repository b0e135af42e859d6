//! Domain types shared by the properties service and the prism editor.

pub mod error;
pub mod input;
pub mod spacing;
pub mod types;
