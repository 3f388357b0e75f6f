//! Canonical schema constants for structured logging and events
//!
//! Every `tracing` event emitted by the editor kernel uses these keys so that
//! log consumers (and the test capture layer) can filter on them.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_SESSION_ID: &str = "session_id";

// Editor identifiers
pub const FIELD_COMMAND_KIND: &str = "command_kind";
pub const FIELD_COMMAND_ID: &str = "command_id";
pub const FIELD_NODE_ID: &str = "node_id";
pub const FIELD_SOURCE_PATH: &str = "source_path";
pub const FIELD_COMPOSITION: &str = "composition";
pub const FIELD_VDB_NAME: &str = "vdb_name";

// Collection sizes
pub const FIELD_UNDO_LEN: &str = "undo_len";
pub const FIELD_REDO_LEN: &str = "redo_len";
pub const FIELD_NODE_COUNT: &str = "node_count";
pub const FIELD_LINK_COUNT: &str = "link_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
