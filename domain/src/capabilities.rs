//! Names of the builtin capabilities agents may carry.
//!
//! The planning phase scans transcripts for successful [`ADD_WORK_ITEM`]
//! invocations to grow the backlog, so the name is part of the sprint
//! contract rather than an infrastructure detail.

pub const ADD_WORK_ITEM: &str = "add_work_item";
pub const MEMORY_PUT: &str = "memory_put";
pub const MEMORY_GET: &str = "memory_get";
