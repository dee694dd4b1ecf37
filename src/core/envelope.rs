//! JSON response envelope printed by `--format json`.

use crate::core::error::SeatAllocError;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::time::{SystemTime, UNIX_EPOCH};
use ulid::Ulid;

pub const ENVELOPE_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Ok,
    Error,
}

/// One command result. Payload keys are flattened next to the header.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub envelope_version: &'static str,
    /// Unix seconds with a `Z` suffix, e.g. `1771220592Z`.
    pub ts: String,
    pub event_id: String,
    pub cmd: String,
    pub status: EnvelopeStatus,
    #[serde(flatten)]
    pub payload: Map<String, JsonValue>,
}

fn epoch_z() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{}Z", secs)
}

impl Envelope {
    fn new(cmd: &str, status: EnvelopeStatus, payload: JsonValue) -> Self {
        let payload = match payload {
            JsonValue::Object(map) => map,
            JsonValue::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("result".to_string(), other);
                map
            }
        };
        Self {
            envelope_version: ENVELOPE_VERSION,
            ts: epoch_z(),
            event_id: Ulid::new().to_string(),
            cmd: cmd.to_string(),
            status,
            payload,
        }
    }

    pub fn ok(cmd: &str, payload: JsonValue) -> Self {
        Self::new(cmd, EnvelopeStatus::Ok, payload)
    }

    /// Error envelope. Internal faults carry only the generic message.
    pub fn error(cmd: &str, err: &SeatAllocError) -> Self {
        let kind = err.kind();
        Self::new(
            cmd,
            EnvelopeStatus::Error,
            serde_json::json!({
                "error": kind.label(),
                "kind": kind.as_str(),
                "message": err.public_message(),
            }),
        )
    }

    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
