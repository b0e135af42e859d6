//! The prism margin / padding editor.
//!
//! [`prism::Prism`] is the per-side focus / edit state of one box (margin
//! or padding). [`session::EditorSession`] pairs two prisms for a single
//! component and persists every committed edit through a
//! [`client::PropertiesBackend`].

pub mod client;
pub mod prism;
pub mod session;
