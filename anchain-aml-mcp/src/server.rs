//! MCP server over stdio.
//!
//! Newline-delimited JSON-RPC 2.0: one request per line on the reader, one
//! response per line on the writer.
//!
//! Request format:
//! ```json
//! {"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"ip_screening","arguments":{"ip_address":"8.8.8.8"}}}
//! ```
//!
//! Tool failures are not JSON-RPC errors. They come back as a normal result
//! with `isError: true` and the error payload as content, so the agent can
//! branch on its `kind`.

use anchain_aml_tools::ToolDispatcher;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub const SERVER_NAME: &str = "anchain_aml";
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

// ---- JSON-RPC 2.0 Types ----

/// Standard JSON-RPC 2.0 error codes.
#[derive(Debug, Clone, Copy)]
#[repr(i32)]
pub enum JsonRpcErrorCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    /// Absent for notifications. An explicit `null` is still a request.
    #[serde(
        default,
        deserialize_with = "present_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, code: JsonRpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code: code as i32,
                message: message.into(),
            }),
            id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

pub struct McpServer {
    dispatcher: ToolDispatcher,
}

impl McpServer {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Handle one raw line. Returns the serialized response, or `None` for
    /// notifications and blank lines.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => Some(JsonRpcResponse::error(
                Value::Null,
                JsonRpcErrorCode::ParseError,
                format!("Parse error: {}", e),
            )),
            Ok(value) => match serde_json::from_value::<JsonRpcRequest>(value.clone()) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => Some(JsonRpcResponse::error(
                    value.get("id").cloned().unwrap_or(Value::Null),
                    JsonRpcErrorCode::InvalidRequest,
                    format!("Invalid request: {}", e),
                )),
            },
        };

        response.and_then(|r| match serde_json::to_string(&r) {
            Ok(s) => Some(s),
            Err(e) => {
                error!("failed to serialize response: {}", e);
                None
            }
        })
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            debug!("notification {}", request.method);
            return None;
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcErrorCode::InvalidRequest,
                "jsonrpc must be \"2.0\"",
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.initialize_result(&request.params)),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                json!({ "tools": self.dispatcher.registry().definitions() }),
            ),
            "tools/call" => match serde_json::from_value::<ToolCallParams>(request.params) {
                Ok(params) => JsonRpcResponse::success(id, self.call_tool(params).await),
                Err(e) => JsonRpcResponse::error(
                    id,
                    JsonRpcErrorCode::InvalidParams,
                    format!("Invalid tools/call params: {}", e),
                ),
            },
            other => {
                warn!(method = other, "unknown MCP method");
                JsonRpcResponse::error(
                    id,
                    JsonRpcErrorCode::MethodNotFound,
                    format!("Method not found: {}", other),
                )
            }
        };

        Some(response)
    }

    fn initialize_result(&self, params: &Value) -> Value {
        let protocol_version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);

        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": {"listChanged": false}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    async fn call_tool(&self, params: ToolCallParams) -> Value {
        let result = self.dispatcher.dispatch(&params.name, params.arguments).await;
        let body = result.body();
        let text = serde_json::to_string(&body).unwrap_or_else(|_| "null".to_string());

        json!({
            "content": [{"type": "text", "text": text}],
            "structuredContent": body,
            "isError": !result.success
        })
    }

    /// Serve until the reader reaches EOF.
    ///
    /// Each line is handled on its own task so slow provider calls do not hold
    /// up others; a single writer task owns the output stream.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        info!("{} MCP server listening on stdio", SERVER_NAME);

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer_task = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let line = match String::from_utf8(std::mem::take(&mut buf)) {
                Ok(line) => line,
                Err(e) => {
                    warn!("dropping line that is not valid UTF-8: {}", e);
                    let response = JsonRpcResponse::error(
                        Value::Null,
                        JsonRpcErrorCode::ParseError,
                        format!("Parse error: {}", e),
                    );
                    if let Ok(s) = serde_json::to_string(&response) {
                        let _ = tx.send(s);
                    }
                    continue;
                }
            };

            let server = Arc::clone(&self);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_line(&line).await {
                    // Receiver only goes away if the writer failed.
                    let _ = tx.send(response);
                }
            });
        }

        // Writer drains once every in-flight task has dropped its sender.
        drop(tx);
        match writer_task.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::new(std::io::ErrorKind::Other, e)),
        }?;

        info!("stdin closed, shutting down");
        Ok(())
    }
}
