use chart_error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::constants::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
    REQUEST_TIMEOUT,
};

/// Error information for JSON-RPC error responses.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorData {
    /// The error type that occurred.
    pub code: i32,

    /// A short description of the error. The message SHOULD be limited to a concise single
    /// sentence.
    pub message: String,

    /// Additional information about the error. The value of this member is defined by the
    /// sender (e.g. detailed error information, nested errors etc.).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorData {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl From<&Error> for ErrorData {
    fn from(e: &Error) -> Self {
        let code = match e {
            Error::Json(_) | Error::Utf8(_) | Error::InvalidMessage(_) => PARSE_ERROR,
            Error::Protocol(_) => INVALID_REQUEST,
            Error::ToolNotFound(_) => METHOD_NOT_FOUND,
            Error::InvalidParameters(_) => INVALID_PARAMS,
            Error::GenerationTimeout(_) => REQUEST_TIMEOUT,
            _ => INTERNAL_ERROR,
        };
        ErrorData::new(code, e.to_string())
    }
}
