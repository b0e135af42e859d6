pub mod examples;
pub mod properties;
