//! Uniform success/error response wrapper.
//!
//! `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Unwrap into a result. The error message is passed on unmodified.
    pub fn into_result(self) -> Result<T, StoreError> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (true, None, _) => Err(StoreError::rejected("response carried no data")),
            (false, _, Some(message)) => Err(StoreError::Rejected(message)),
            (false, _, None) => Err(StoreError::rejected("request failed")),
        }
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parse a JSON response body and unwrap it.
    pub fn parse(body: &str) -> Result<T, StoreError> {
        let envelope: Self = serde_json::from_str(body)?;
        envelope.into_result()
    }
}

impl<T> From<Result<T, StoreError>> for Envelope<T> {
    fn from(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                tracing::debug!(target: "quire::store", error = %e, "store call failed");
                Self::err(e.to_string())
            }
        }
    }
}
