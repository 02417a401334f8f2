//! JSON-RPC 2.0 message types for the prompts protocol.
//!
//! # Message Types
//!
//! - **Request**: `{"jsonrpc", "id", "method", "params"}`; every request is
//!   answered, including those without an `id`
//! - **Response**: a reply carrying either `result` or `error`
//!
//! # Leniency
//!
//! Requests are accepted as long as they are JSON objects. The `jsonrpc`
//! field is not checked, `params` defaults to `{}` and a missing `id` is
//! answered with `id: null`. A `method` that is missing or not a string simply
//! matches no route.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The protocol version reported by `initialize`.
pub const PROTOCOL_VERSION: u32 = 1;

/// Default server name for capability negotiation.
pub const SERVER_NAME: &str = "context-server";

/// The JSON-RPC version tag written on every response.
pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC 2.0 request ID.
///
/// Any JSON value is accepted and echoed back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID.
    Number(i64),
    /// String request ID.
    String(String),
    /// Missing or `null` ID.
    #[default]
    Null,
    /// Anything else (floats, objects, arrays, booleans).
    Other(Value),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

/// A JSON-RPC 2.0 request message.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    /// Usually "2.0"; not validated.
    #[serde(default)]
    pub jsonrpc: Option<Value>,

    /// Request identifier, echoed on the response.
    #[serde(default)]
    pub id: RequestId,

    /// The method to invoke. Only strings can match a route.
    #[serde(default)]
    pub method: Option<Value>,

    /// Parameters for the method.
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a request, mostly useful in tests.
    #[must_use]
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: Some(Value::from(JSONRPC_VERSION)),
            id,
            method: Some(Value::String(method.into())),
            params,
        }
    }

    /// The method name, if `method` is a string.
    #[must_use]
    pub fn method_name(&self) -> Option<&str> {
        self.method.as_ref().and_then(Value::as_str)
    }

    /// Returns the parameters as an object; absent or `null` gives `{}`.
    ///
    /// Returns `None` if `params` is present but not an object.
    #[must_use]
    pub fn params_object(&self) -> Option<Map<String, Value>> {
        match &self.params {
            None | Some(Value::Null) => Some(Map::new()),
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => None,
        }
    }
}

/// A successful JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this response corresponds to.
    pub id: RequestId,

    /// The result of the method call.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Creates a new success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

/// JSON-RPC 2.0 error codes used by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON was received by the server.
    ParseError,
    /// The JSON sent is not a valid Request object.
    InvalidRequest,
    /// The method does not exist or is not available.
    MethodNotFound,
    /// A method handler failed while executing.
    ExecutionError,
}

impl ErrorCode {
    /// Returns the numeric code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::ExecutionError => -32000,
        }
    }

    /// Returns the default message for this error code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotFound => "Method not found",
            Self::ExecutionError => "Server error",
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorData {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,
}

impl JsonRpcErrorData {
    /// Creates a new error from an error code.
    #[must_use]
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code: code.code(),
            message: code.default_message().to_string(),
        }
    }

    /// Creates a new error with a custom message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
        }
    }
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this error corresponds to; `null` when unknown.
    pub id: RequestId,

    /// The error details.
    pub error: JsonRpcErrorData,
}

impl JsonRpcError {
    /// Creates a new error response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // JsonRpcErrorData contains String
    pub fn new(id: RequestId, error: JsonRpcErrorData) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error,
        }
    }

    /// Creates a parse error response (ID cannot be determined).
    #[must_use]
    pub fn parse_error() -> Self {
        Self::new(
            RequestId::Null,
            JsonRpcErrorData::from_code(ErrorCode::ParseError),
        )
    }

    /// Creates an invalid request error response.
    #[must_use]
    pub fn invalid_request(id: RequestId) -> Self {
        Self::new(id, JsonRpcErrorData::from_code(ErrorCode::InvalidRequest))
    }

    /// Creates a method not found error response.
    ///
    /// String methods are rendered bare, anything else as JSON.
    #[must_use]
    pub fn method_not_found(id: RequestId, method: Option<&Value>) -> Self {
        let method = match method {
            Some(Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
            None => "null".to_string(),
        };
        Self::new(
            id,
            JsonRpcErrorData::with_message(
                ErrorCode::MethodNotFound,
                format!("Method '{method}' not found"),
            ),
        )
    }

    /// Creates an execution error response carrying a handler's message.
    #[must_use]
    pub fn execution_error(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::ExecutionError, message),
        )
    }
}

/// Parses one input line into a request.
///
/// # Errors
///
/// Returns a `-32700` error if the line is not UTF-8 JSON, or `-32600` if it
/// is JSON but not an object.
pub fn parse_request(line: impl AsRef<[u8]>) -> Result<JsonRpcRequest, JsonRpcError> {
    let value: Value =
        serde_json::from_slice(line.as_ref()).map_err(|_| JsonRpcError::parse_error())?;

    if !value.is_object() {
        return Err(JsonRpcError::invalid_request(RequestId::Null));
    }

    serde_json::from_value(value).map_err(|_| JsonRpcError::invalid_request(RequestId::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_valid_request() {
        let json = r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}"#;
        let req = parse_request(json).unwrap();
        assert_eq!(req.id, RequestId::Number(1));
        assert_eq!(req.method_name(), Some("initialize"));
    }

    #[test]
    fn parse_string_id() {
        let json = r#"{"jsonrpc": "2.0", "id": "abc-123", "method": "test"}"#;
        let req = parse_request(json).unwrap();
        assert_eq!(req.id, RequestId::String("abc-123".to_string()));
    }

    #[test]
    fn parse_missing_id_is_null() {
        let json = r#"{"jsonrpc": "2.0", "method": "prompts/list"}"#;
        let req = parse_request(json).unwrap();
        assert_eq!(req.id, RequestId::Null);
    }

    #[test]
    fn parse_unusual_id() {
        let json = r#"{"id": 1.5, "method": "test"}"#;
        let req = parse_request(json).unwrap();
        assert_eq!(req.id, RequestId::Other(json!(1.5)));
    }

    #[test]
    fn parse_without_jsonrpc_field() {
        let json = r#"{"id": 7, "method": "initialize"}"#;
        let req = parse_request(json).unwrap();
        assert!(req.jsonrpc.is_none());
        assert_eq!(req.id, RequestId::Number(7));
    }

    #[test]
    fn parse_numeric_jsonrpc() {
        let json = r#"{"jsonrpc": 2.0, "id": 1, "method": "initialize"}"#;
        let req = parse_request(json).unwrap();
        assert_eq!(req.jsonrpc, Some(json!(2.0)));
        assert_eq!(req.id, RequestId::Number(1));
        assert_eq!(req.method_name(), Some("initialize"));
    }

    #[test]
    fn parse_invalid_utf8() {
        let err = parse_request(b"\xff\xfe garbage").unwrap_err();
        assert_eq!(err.error.code, ErrorCode::ParseError.code());
        assert_eq!(err.id, RequestId::Null);
    }

    #[test]
    fn parse_invalid_json() {
        let err = parse_request("not valid json").unwrap_err();
        assert_eq!(err.error.code, ErrorCode::ParseError.code());
        assert_eq!(err.id, RequestId::Null);
    }

    #[test]
    fn parse_non_object() {
        let err = parse_request("[1, 2, 3]").unwrap_err();
        assert_eq!(err.error.code, ErrorCode::InvalidRequest.code());
    }

    #[test]
    fn parse_non_string_method_keeps_id() {
        let req = parse_request(r#"{"id": 9, "method": 5}"#).unwrap();
        assert_eq!(req.id, RequestId::Number(9));
        assert_eq!(req.method, Some(json!(5)));
        assert_eq!(req.method_name(), None);
    }

    #[test]
    fn method_not_found_renders_method() {
        let err = JsonRpcError::method_not_found(RequestId::Number(1), Some(&json!(5)));
        assert_eq!(err.error.message, "Method '5' not found");

        let err = JsonRpcError::method_not_found(RequestId::Number(1), None);
        assert_eq!(err.error.message, "Method 'null' not found");
    }

    #[test]
    fn params_default_to_empty_object() {
        let req = JsonRpcRequest::new(RequestId::Number(1), "initialize", None);
        assert_eq!(req.params_object(), Some(Map::new()));

        let req = JsonRpcRequest::new(RequestId::Number(1), "initialize", Some(Value::Null));
        assert_eq!(req.params_object(), Some(Map::new()));

        let req = JsonRpcRequest::new(RequestId::Number(1), "initialize", Some(json!([1])));
        assert_eq!(req.params_object(), None);
    }

    #[test]
    fn serialise_success_response() {
        let response = JsonRpcResponse::success(RequestId::Number(1), json!({"ok": true}));
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"jsonrpc":"2.0","id":1,"result":{"ok":true}}"#);
    }

    #[test]
    fn serialise_error_response() {
        let error = JsonRpcError::method_not_found(RequestId::Number(1), Some(&json!("unknown/method")));
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""id":1"#));
        assert!(json.contains(r#""code":-32601"#));
        assert!(json.contains("Method 'unknown/method' not found"));
    }

    #[test]
    fn serialise_parse_error_has_null_id() {
        let json = serde_json::to_string(&JsonRpcError::parse_error()).unwrap();
        assert_eq!(
            json,
            r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"Parse error"}}"#
        );
    }

    #[test]
    fn request_id_display() {
        assert_eq!(format!("{}", RequestId::Number(42)), "42");
        assert_eq!(format!("{}", RequestId::String("abc".to_string())), "abc");
        assert_eq!(format!("{}", RequestId::Null), "null");
    }
}
