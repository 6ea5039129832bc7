use std::fmt::{Display, Formatter};

use ferrocast_core::UtcDateTime;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Request identifier (UUID v4) attached to every command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Output metadata. Field order is fixed to keep JSON output stable.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub request_id: RequestId,
    pub generated_at: UtcDateTime,
    pub command: &'static str,
    pub source: String,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Error for one item of a batch command; the rest of the batch still renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl ItemError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_owned(),
            message: message.into(),
            symbol: None,
        }
    }

    pub fn for_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub meta: Metadata,
    pub data: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_is_uuid_v4() {
        assert_eq!(RequestId::new_v4().0.get_version_num(), 4);
    }

    #[test]
    fn envelope_omits_empty_sections() {
        let envelope = Envelope {
            meta: Metadata {
                request_id: RequestId(
                    Uuid::parse_str("123e4567-e89b-42d3-a456-426614174000").expect("uuid"),
                ),
                generated_at: UtcDateTime::parse("2024-06-28T10:00:00Z").expect("ts"),
                command: "summary",
                source: String::from("synthetic"),
                latency_ms: 12,
                warnings: Vec::new(),
            },
            data: serde_json::json!({ "ok": true }),
            errors: Vec::new(),
        };

        let json = serde_json::to_string(&envelope).expect("serializes");
        assert!(json.starts_with(
            "{\"meta\":{\"request_id\":\"123e4567-e89b-42d3-a456-426614174000\""
        ));
        assert!(!json.contains("warnings"));
        assert!(!json.contains("errors"));
    }

    #[test]
    fn item_errors_carry_their_symbol() {
        let error = ItemError::new("source.unavailable", "feed down").for_symbol("SBIN");
        let json = serde_json::to_value(&error).expect("serializes");
        assert_eq!(json["symbol"], "SBIN");
    }
}
