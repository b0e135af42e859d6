/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Caller-supplied component identifier (primary key of `component_properties`).
pub type ComponentId = String;
