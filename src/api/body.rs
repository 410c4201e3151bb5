//! JSON request bodies.
//!
//! Bodies are read as raw bytes and parsed regardless of `Content-Type`. An
//! empty body counts as `{}`. Field checks follow loose JSON conventions:
//! `0`, `""`, `false` and `null` are falsy, and a number is an integer when
//! it has no fractional part.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A parsed JSON body.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(ApiError::invalid_body)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(Value::Object(Map::new())));
        }
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(ApiError::invalid_body)
    }
}

impl JsonBody {
    /// A field that is present, including an explicit `null`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A field that is present and truthy.
    pub fn truthy(&self, key: &str) -> Option<&Value> {
        self.field(key).filter(|v| is_truthy(v))
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The integer value of a JSON number without a fractional part.
pub fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

/// A string that is non-empty after trimming, trimmed.
pub fn trimmed_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
