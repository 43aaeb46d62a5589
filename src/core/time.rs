//! The JSON envelope every `--format json` command prints.
//!
//! ```json
//! { "tool": "gurume", "version": "0.3.1", "ts": "1771220592Z",
//!   "event_id": "01J...", "cmd": "report.stats", "status": "ok", ... }
//! ```
//!
//! `status` is `ok`, `partial` (a load rejected some records) or `no_data`.
//! Object payload keys are merged next to the header; any other payload is
//! placed under `data`. Header keys always win over payload keys.

use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use ulid::Ulid;

pub const TOOL_NAME: &str = "gurume";

/// Unix-epoch seconds with a `Z` suffix, e.g. `1771220592Z`.
pub fn now_epoch_z() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{}Z", secs)
}

/// Sortable id for one command invocation.
pub fn new_event_id() -> String {
    Ulid::new().to_string()
}

pub fn command_envelope(cmd: &str, status: &str, payload: Value) -> Value {
    let mut envelope = match payload {
        Value::Object(fields) => fields,
        Value::Null => Map::new(),
        other => Map::from_iter([("data".to_string(), other)]),
    };
    let header = [
        ("tool", Value::from(TOOL_NAME)),
        ("version", Value::from(env!("CARGO_PKG_VERSION"))),
        ("ts", Value::from(now_epoch_z())),
        ("event_id", Value::from(new_event_id())),
        ("cmd", Value::from(cmd)),
        ("status", Value::from(status)),
    ];
    for (key, value) in header {
        envelope.insert(key.to_string(), value);
    }
    Value::Object(envelope)
}
