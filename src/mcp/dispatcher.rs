//! Request routing.
//!
//! The routing table is fixed:
//!
//! | method         | handler                                    |
//! |----------------|--------------------------------------------|
//! | `initialize`   | static capabilities and server info        |
//! | `prompts/list` | one entry per registered command           |
//! | `prompts/get`  | invokes a command, returns its text output |
//!
//! Anything else is answered with `-32601`. Every handler failure is turned
//! into a `-32000` error carrying the failure's message, so one bad request
//! never affects the next.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::HandlerError;
use crate::mcp::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION};
use crate::registry::{Arguments, Command, CommandRegistry};

/// Server information for the initialisation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: crate::mcp::protocol::SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// One argument in a `prompts/list` entry.
#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    /// Argument name.
    pub name: String,
    /// Help text.
    pub description: String,
    /// Always `true`; there are no optional arguments.
    pub required: bool,
}

/// One entry in the `prompts/list` result.
#[derive(Debug, Clone, Serialize)]
pub struct PromptDefinition {
    /// Command name.
    pub name: String,
    /// Declared arguments in declaration order.
    pub arguments: Vec<PromptArgument>,
}

impl From<&Command> for PromptDefinition {
    fn from(command: &Command) -> Self {
        Self {
            name: command.name().to_string(),
            arguments: command
                .arguments()
                .iter()
                .map(|arg| PromptArgument {
                    name: arg.name.clone(),
                    description: arg.description.clone(),
                    required: true,
                })
                .collect(),
        }
    }
}

/// Routes decoded requests to their handlers.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a CommandRegistry,
    server_info: &'a ServerInfo,
}

impl<'a> Dispatcher<'a> {
    /// Creates a dispatcher over a finished registry.
    #[must_use]
    pub const fn new(registry: &'a CommandRegistry, server_info: &'a ServerInfo) -> Self {
        Self {
            registry,
            server_info,
        }
    }

    /// Handles one request, producing its response.
    ///
    /// # Errors
    ///
    /// The `Err` side is the error response to send, not a failure of the
    /// dispatcher itself.
    pub async fn dispatch(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        let method = req.method_name();
        tracing::debug!(method = ?method, id = %req.id, "Dispatching request");

        let result = match method {
            Some("initialize") => Ok(self.handle_initialize()),
            Some("prompts/list") => self.handle_prompts_list(),
            Some("prompts/get") => self.handle_prompts_get(req).await,
            _ => {
                return Err(JsonRpcError::method_not_found(
                    req.id.clone(),
                    req.method.as_ref(),
                ))
            }
        };

        match result {
            Ok(value) => Ok(JsonRpcResponse::success(req.id.clone(), value)),
            Err(e) => {
                tracing::debug!(method = ?method, error = %e, "Request failed");
                Err(JsonRpcError::execution_error(req.id.clone(), e.to_string()))
            }
        }
    }

    /// Handles the initialize request. Parameters are ignored.
    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "prompts": {} },
            "serverInfo": self.server_info,
        })
    }

    /// Handles the prompts/list request.
    fn handle_prompts_list(&self) -> Result<Value, HandlerError> {
        let prompts: Vec<PromptDefinition> =
            self.registry.list().map(PromptDefinition::from).collect();

        Ok(json!({ "prompts": serde_json::to_value(prompts)? }))
    }

    /// Handles the prompts/get request.
    async fn handle_prompts_get(&self, req: &JsonRpcRequest) -> Result<Value, HandlerError> {
        let params = req
            .params_object()
            .ok_or_else(|| HandlerError::InvalidParams("params must be an object".to_string()))?;

        let name = match params.get("name") {
            Some(Value::String(name)) => name.as_str(),
            Some(_) => {
                return Err(HandlerError::InvalidParams(
                    "'name' must be a string".to_string(),
                ))
            }
            None => {
                return Err(HandlerError::InvalidParams(
                    "missing required parameter 'name'".to_string(),
                ))
            }
        };

        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => Arguments::new(),
            Some(Value::Object(map)) => Arguments::from(map.clone()),
            Some(_) => {
                return Err(HandlerError::InvalidParams(
                    "'arguments' must be an object".to_string(),
                ))
            }
        };

        let text = self.registry.invoke(name, arguments).await?;

        Ok(json!({ "prompt": text }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommandError;
    use crate::mcp::protocol::{ErrorCode, RequestId};
    use crate::registry::from_fn;

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();

        let cmd1 = from_fn(|_args: Arguments| async move { Ok(String::new()) });
        registry.describe_argument(&cmd1, "arg1", "str", "Argument 1");
        registry.register_command("cmd1", cmd1, "Command 1");

        let cmd2 = from_fn(|_args: Arguments| async move { Ok(String::new()) });
        registry
            .describe_argument(&cmd2, "arg1", "str", "Argument 1")
            .describe_argument(&cmd2, "arg2", "int", "Argument 2");
        registry.register_command("cmd2", cmd2, "Command 2");

        let echo = from_fn(|args: Arguments| async move {
            Ok(format!("Echo: {}", args.get_str("message")?))
        });
        registry.describe_argument(&echo, "message", "str", "Message to echo");
        registry.register_command("echo", echo, "Echo command");

        let broken = from_fn(|_args: Arguments| async move {
            Err::<String, _>(CommandError::failed("backend unavailable"))
        });
        registry.register_command("broken", broken, "Always fails");

        registry
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest::new(RequestId::Number(1), method, params)
    }

    #[tokio::test]
    async fn initialize_returns_capabilities() {
        let registry = registry();
        let info = ServerInfo {
            name: "test".to_string(),
            version: "9.9.9".to_string(),
        };
        let dispatcher = Dispatcher::new(&registry, &info);

        let resp = dispatcher
            .dispatch(&request("initialize", Some(json!({"ignored": true}))))
            .await
            .unwrap();

        assert_eq!(
            resp.result,
            json!({
                "protocolVersion": 1,
                "capabilities": {"prompts": {}},
                "serverInfo": {"name": "test", "version": "9.9.9"},
            })
        );
    }

    #[tokio::test]
    async fn prompts_list_entries() {
        let registry = registry();
        let info = ServerInfo::default();
        let dispatcher = Dispatcher::new(&registry, &info);

        let resp = dispatcher
            .dispatch(&request("prompts/list", None))
            .await
            .unwrap();
        let prompts = resp.result["prompts"].as_array().unwrap();

        assert_eq!(prompts.len(), 4);
        assert_eq!(
            prompts[0],
            json!({
                "name": "cmd1",
                "arguments": [
                    {"name": "arg1", "description": "Argument 1", "required": true}
                ],
            })
        );
        assert_eq!(
            prompts[1],
            json!({
                "name": "cmd2",
                "arguments": [
                    {"name": "arg1", "description": "Argument 1", "required": true},
                    {"name": "arg2", "description": "Argument 2", "required": true},
                ],
            })
        );
        assert_eq!(prompts[3]["arguments"], json!([]));
    }

    #[tokio::test]
    async fn prompts_get_runs_command() {
        let registry = registry();
        let info = ServerInfo::default();
        let dispatcher = Dispatcher::new(&registry, &info);

        let resp = dispatcher
            .dispatch(&request(
                "prompts/get",
                Some(json!({"name": "echo", "arguments": {"message": "Hello, World!"}})),
            ))
            .await
            .unwrap();

        assert_eq!(resp.id, RequestId::Number(1));
        assert_eq!(resp.result["prompt"], "Echo: Hello, World!");
    }

    #[tokio::test]
    async fn prompts_get_unknown_command() {
        let registry = registry();
        let info = ServerInfo::default();
        let dispatcher = Dispatcher::new(&registry, &info);

        let err = dispatcher
            .dispatch(&request("prompts/get", Some(json!({"name": "nope"}))))
            .await
            .unwrap_err();

        assert_eq!(err.error.code, ErrorCode::ExecutionError.code());
        assert_eq!(err.error.message, "Command 'nope' not found");
        assert_eq!(err.id, RequestId::Number(1));
    }

    #[tokio::test]
    async fn prompts_get_handler_failure() {
        let registry = registry();
        let info = ServerInfo::default();
        let dispatcher = Dispatcher::new(&registry, &info);

        let err = dispatcher
            .dispatch(&request("prompts/get", Some(json!({"name": "broken"}))))
            .await
            .unwrap_err();
        assert_eq!(err.error.code, -32000);
        assert_eq!(err.error.message, "backend unavailable");

        // Missing argument surfaces the handler's own error.
        let err = dispatcher
            .dispatch(&request("prompts/get", Some(json!({"name": "echo"}))))
            .await
            .unwrap_err();
        assert_eq!(err.error.code, -32000);
        assert!(err.error.message.contains("message"));
    }

    #[tokio::test]
    async fn prompts_get_bad_params() {
        let registry = registry();
        let info = ServerInfo::default();
        let dispatcher = Dispatcher::new(&registry, &info);

        for params in [
            None,
            Some(json!({"name": 3})),
            Some(json!({"name": "echo", "arguments": [1, 2]})),
            Some(json!("not an object")),
        ] {
            let err = dispatcher
                .dispatch(&request("prompts/get", params))
                .await
                .unwrap_err();
            assert_eq!(err.error.code, -32000);
        }
    }

    #[tokio::test]
    async fn unknown_method_echoes_id() {
        let registry = registry();
        let info = ServerInfo::default();
        let dispatcher = Dispatcher::new(&registry, &info);

        let req = JsonRpcRequest::new(RequestId::String("req-7".to_string()), "tools/list", None);
        let err = dispatcher.dispatch(&req).await.unwrap_err();

        assert_eq!(err.error.code, ErrorCode::MethodNotFound.code());
        assert_eq!(err.error.message, "Method 'tools/list' not found");
        assert_eq!(err.id, RequestId::String("req-7".to_string()));
    }

    #[tokio::test]
    async fn missing_method_is_not_found() {
        let registry = registry();
        let info = ServerInfo::default();
        let dispatcher = Dispatcher::new(&registry, &info);

        let req = JsonRpcRequest {
            jsonrpc: None,
            id: RequestId::Number(3),
            method: None,
            params: None,
        };
        let err = dispatcher.dispatch(&req).await.unwrap_err();
        assert_eq!(err.error.code, -32601);
        assert_eq!(err.id, RequestId::Number(3));
    }

    #[tokio::test]
    async fn non_string_method_is_not_found() {
        let registry = registry();
        let info = ServerInfo::default();
        let dispatcher = Dispatcher::new(&registry, &info);

        let req = JsonRpcRequest {
            jsonrpc: Some(json!("2.0")),
            id: RequestId::Number(9),
            method: Some(json!(5)),
            params: None,
        };
        let err = dispatcher.dispatch(&req).await.unwrap_err();
        assert_eq!(err.error.code, ErrorCode::MethodNotFound.code());
        assert_eq!(err.error.message, "Method '5' not found");
        assert_eq!(err.id, RequestId::Number(9));
    }
}
