use anyhow::Result;
use log::{debug, info, warn};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::common::constants::{SERVER_NAME, SERVER_VERSION};
use crate::mcp::jsonrpc::{
    Request, Response, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR,
};
use crate::tools::{ToolContext, ToolRegistry};

pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];

pub struct McpServer {
    registry: ToolRegistry,
    ctx: ToolContext,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, ctx: ToolContext) -> Self {
        Self { registry, ctx }
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }

    /// One input line in, at most one serialized response out.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => Some(Response::failure(
                Value::Null,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            )),
            Ok(value) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<Request>(value) {
                    Ok(request) => self.handle_request(request).await,
                    Err(e) => Some(Response::failure(
                        id,
                        INVALID_REQUEST,
                        format!("Invalid request: {}", e),
                    )),
                }
            }
        };

        response.and_then(|response| match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Failed to serialize response: {}", e);
                None
            }
        })
    }

    pub async fn handle_request(&self, request: Request) -> Option<Response> {
        debug!("⬅️ {} (id: {:?})", request.method, request.id);

        let Some(id) = request.id.clone() else {
            debug!("Ignoring notification {}", request.method);
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => Response::success(id, self.initialize_result(&request.params)),
            "ping" => Response::success(id, json!({})),
            "tools/list" => Response::success(id, json!({ "tools": self.registry.descriptors() })),
            "tools/call" => self.call_tool(id, &request.params).await,
            other => Response::failure(id, METHOD_NOT_FOUND, format!("Method not found: {}", other)),
        };
        Some(response)
    }

    fn initialize_result(&self, params: &Value) -> Value {
        // unknown versions get the default
        let protocol_version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .filter(|version| SUPPORTED_PROTOCOL_VERSIONS.contains(version))
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);
        json!({
            "protocolVersion": protocol_version,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
        })
    }

    async fn call_tool(&self, id: Value, params: &Value) -> Response {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return Response::failure(id, INVALID_PARAMS, "Missing tool name");
        };
        let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        match self.registry.call(name, &self.ctx, &args).await {
            Some(result) => match serde_json::to_value(&result) {
                Ok(value) => Response::success(id, value),
                Err(e) => Response::failure(id, INTERNAL_ERROR, e.to_string()),
            },
            None => Response::failure(id, INVALID_PARAMS, format!("Unknown tool: {}", name)),
        }
    }

    /// Serves newline-delimited requests until the reader hits EOF.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(line).await {
                writer.write_all(response.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    pub async fn serve_stdio(&self) -> Result<()> {
        info!("🚀 {} v{} listening on stdio", SERVER_NAME, SERVER_VERSION);
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        info!("stdin closed, shutting down");
        Ok(())
    }
}
