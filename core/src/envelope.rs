//! The `{code, data, message}` response envelope.
//!
//! # Design
//! Validation and extraction are separate steps. `EnvelopeConfig::check`
//! only reads the envelope head (code and message), so it can run inside
//! the response pipeline before caller hooks see the response, without
//! knowing the payload type. `EnvelopeConfig::extract` runs last and
//! deserializes the data field into the caller's type.
//!
//! Field names are configurable, so wrappers such as
//! `{returnCode, data, success}` are read the same way. The code may be a
//! JSON number or a numeric string. A blank body (e.g. `204 No Content`)
//! counts as success with `null` data.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;

/// Server-defined wrapper around every payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    #[serde(deserialize_with = "code_from_number_or_string")]
    pub code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(alias = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// How the client interprets response envelopes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// When false, response bodies are deserialized directly into the payload type.
    pub enabled: bool,
    pub success_codes: Vec<i64>,
    /// Codes reported as `ClientError::SessionExpired` instead of `ClientError::Api`.
    pub session_expired_codes: Vec<i64>,
    /// Used when a failure envelope carries no message.
    pub default_message: String,
    pub code_field: String,
    pub data_field: String,
    /// `msg` is tried when this field is absent.
    pub message_field: String,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            success_codes: vec![200, 20000],
            session_expired_codes: vec![50008, 50012, 50014],
            default_message: "Error".to_string(),
            code_field: "code".to_string(),
            data_field: "data".to_string(),
            message_field: "message".to_string(),
        }
    }
}

impl EnvelopeConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Reject `body` if its envelope code is not a success code.
    pub fn check(&self, body: &str) -> Result<(), ClientError> {
        if !self.enabled || body.trim().is_empty() {
            return Ok(());
        }
        let head = self.parse(body)?;
        if self.success_codes.contains(&head.code) {
            return Ok(());
        }

        let message = head
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.default_message.clone());
        if self.session_expired_codes.contains(&head.code) {
            Err(ClientError::SessionExpired {
                code: head.code,
                message,
            })
        } else {
            Err(ClientError::Api {
                code: head.code,
                message,
            })
        }
    }

    /// Deserialize the payload out of `body`.
    ///
    /// A missing or `null` data field, or a blank body, is read as JSON
    /// `null`, so `()` and `Option<_>` payloads work.
    pub fn extract<T: DeserializeOwned>(&self, body: &str) -> Result<T, ClientError> {
        let payload = if body.trim().is_empty() {
            Value::Null
        } else if self.enabled {
            self.parse(body)?.data.unwrap_or(Value::Null)
        } else {
            serde_json::from_str(body).map_err(|e| ClientError::Deserialization(e.to_string()))?
        };
        serde_json::from_value(payload).map_err(|e| ClientError::Deserialization(e.to_string()))
    }

    /// Read `body` into an `Envelope` using the configured field names.
    fn parse(&self, body: &str) -> Result<Envelope<Value>, ClientError> {
        let malformed = |reason: String| ClientError::Deserialization(format!("malformed envelope: {reason}"));

        let mut fields: Map<String, Value> = serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
        let code = match fields.get(&self.code_field) {
            Some(value) => code_from_value(value).ok_or_else(|| {
                malformed(format!("`{}` is not a numeric code: {value}", self.code_field))
            })?,
            None => return Err(malformed(format!("missing `{}` field", self.code_field))),
        };
        let message = fields
            .get(&self.message_field)
            .or_else(|| fields.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let data = fields.remove(&self.data_field).filter(|v| !v.is_null());

        Ok(Envelope { code, data, message })
    }
}

fn code_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accept `200` as well as `"200"`.
fn code_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Number(i64),
        Text(String),
    }

    match Code::deserialize(deserializer)? {
        Code::Number(code) => Ok(code),
        Code::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("envelope code `{text}` is not numeric"))),
    }
}
