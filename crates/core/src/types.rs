/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Animation frames are identified by UUID v4.
pub type FrameId = uuid::Uuid;
