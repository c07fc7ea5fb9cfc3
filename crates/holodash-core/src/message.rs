use crate::{HoloDashError, MetricsUpdate, Result};
use serde_json::Value;

/// Value of `type` the source sends once a client is accepted
pub const HANDSHAKE_TYPE: &str = "connected";

/// A decoded text frame from the telemetry source
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// `{"type": "connected", "message": "..."}` greeting; carries no metrics
    Handshake { message: Option<String> },
    /// Any other JSON object, applied as a partial snapshot
    Update(MetricsUpdate),
}

impl InboundMessage {
    pub fn decode(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => return Err(HoloDashError::NotAnObject(json_kind(&other))),
        };

        if fields.get("type").and_then(Value::as_str) == Some(HANDSHAKE_TYPE) {
            let message = fields
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string);
            return Ok(Self::Handshake { message });
        }

        Ok(Self::Update(MetricsUpdate::new(fields)))
    }

    pub fn is_handshake(&self) -> bool {
        matches!(self, Self::Handshake { .. })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
