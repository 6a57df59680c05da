//! Secret store seam and credential decoding
//!
//! The secret store is an opaque key/value fetch. A payload is expected to be
//! a JSON object with `host`, `username`, `password`, `dbname` (and
//! optionally `port`). Every field is read on its own: a missing or
//! wrongly-typed field only drops that field, never the whole secret.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Map, Value};
use tracing::warn;

use crate::connection::PartialConnection;
use crate::error::SecretError;

/// Raw secret value as returned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretPayload {
    Text(String),
    Binary(Vec<u8>),
}

impl SecretPayload {
    /// Turn the payload into JSON text.
    ///
    /// Binary content is base64-decoded first. Binary that is not base64 is
    /// taken as raw UTF-8, which is what SDKs hand back after decoding the
    /// wire format themselves.
    pub fn into_text(self) -> Result<String, SecretError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Binary(bytes) => {
                let decoded = STANDARD.decode(bytes.trim_ascii()).ok();
                String::from_utf8(decoded.unwrap_or(bytes))
                    .map_err(|e| SecretError::decode(e.to_string()))
            }
        }
    }
}

/// Key/value secret retrieval
#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn get_secret(&self, secret_id: &str) -> Result<SecretPayload, SecretError>;
}

/// Decode a credentials payload into a connection layer.
pub(crate) fn decode_credentials(payload: SecretPayload) -> Result<PartialConnection, SecretError> {
    let text = payload.into_text()?;
    let value: Value = serde_json::from_str(&text)?;
    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(SecretError::NotAnObject {
                found: json_kind(&other),
            })
        }
    };

    Ok(PartialConnection {
        host: string_field(&fields, "host"),
        port: port_field(&fields),
        user: string_field(&fields, "username"),
        password: string_field(&fields, "password"),
        database: string_field(&fields, "dbname"),
    })
}

fn string_field(fields: &Map<String, Value>, key: &'static str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => {
            warn!(field = key, found = json_kind(other), "ignoring non-string secret field");
            None
        }
    }
}

fn port_field(fields: &Map<String, Value>) -> Option<u16> {
    let port = match fields.get("port")? {
        Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
        Value::String(s) if s.is_empty() => return None,
        Value::String(s) => s.trim().parse::<u16>().ok(),
        Value::Null => return None,
        _ => None,
    };
    if port.is_none() {
        warn!(field = "port", "ignoring invalid secret field");
    }
    port
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = concat!(
        r#"{"host":"db.internal","username":"app","#,
        r#""password":"s3cret","dbname":"ledger","port":6432}"#,
    );

    #[test]
    fn decodes_text_payload() {
        let layer = decode_credentials(SecretPayload::Text(FULL.into())).unwrap();
        assert_eq!(layer.host.as_deref(), Some("db.internal"));
        assert_eq!(layer.user.as_deref(), Some("app"));
        assert_eq!(layer.password.as_deref(), Some("s3cret"));
        assert_eq!(layer.database.as_deref(), Some("ledger"));
        assert_eq!(layer.port, Some(6432));
    }

    #[test]
    fn decodes_base64_binary_payload() {
        let encoded = STANDARD.encode(FULL);
        let layer = decode_credentials(SecretPayload::Binary(encoded.into_bytes())).unwrap();
        assert_eq!(layer.host.as_deref(), Some("db.internal"));
    }

    #[test]
    fn decodes_raw_binary_payload() {
        let layer = decode_credentials(SecretPayload::Binary(FULL.as_bytes().to_vec())).unwrap();
        assert_eq!(layer.database.as_deref(), Some("ledger"));
    }

    #[test]
    fn partial_and_malformed_fields_are_dropped_individually() {
        let text = r#"{"host":"db.internal","username":42,"password":"","port":"abc"}"#;
        let layer = decode_credentials(SecretPayload::Text(text.into())).unwrap();
        assert_eq!(layer.host.as_deref(), Some("db.internal"));
        assert_eq!(layer.user, None);
        assert_eq!(layer.password, None);
        assert_eq!(layer.database, None);
        assert_eq!(layer.port, None);
    }

    #[test]
    fn port_accepts_numeric_string() {
        let layer = decode_credentials(SecretPayload::Text(r#"{"port":"5433"}"#.into())).unwrap();
        assert_eq!(layer.port, Some(5433));
    }

    #[test]
    fn rejects_non_object() {
        let err = decode_credentials(SecretPayload::Text("[1,2]".into())).unwrap_err();
        assert!(matches!(err, SecretError::NotAnObject { found: "array" }));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = decode_credentials(SecretPayload::Text("host=db".into())).unwrap_err();
        assert!(matches!(err, SecretError::Json { .. }));
    }

    #[test]
    fn rejects_non_utf8_binary() {
        let err = SecretPayload::Binary(vec![0xff, 0xfe, 0x00]).into_text().unwrap_err();
        assert!(matches!(err, SecretError::Decode { .. }));
    }
}
