//! Field keys and values carried by every tracker log event

// Keys present on every op event
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Keys on `end` events of tracker ops
pub const FIELD_ENTITY_ID: &str = "entity_id";
pub const FIELD_CAPTURED: &str = "captured";
pub const FIELD_REMOVED: &str = "removed";
pub const FIELD_CHANGED_COUNT: &str = "changed_count";
pub const FIELD_TRACKED_COUNT: &str = "tracked_count";

// Keys on `end_error` events
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

pub const OP_TRACK: &str = "track";
pub const OP_DIFF: &str = "diff";
pub const OP_FLUSH: &str = "flush";
