/// Backend record identifiers are opaque strings (numeric ids are rendered
/// as strings on deserialization).
pub type RecordId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates without a time component.
pub type Date = chrono::NaiveDate;
