/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identifier of a piece of content referenced by a carousel.
///
/// Content lives in several tables with different key types, so ids are
/// carried as their string form.
pub type ContentId = String;
