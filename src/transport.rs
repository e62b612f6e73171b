//! Newline-delimited JSON transport.
//!
//! A small line protocol of its own, not MCP/JSON-RPC: there is no handshake, and
//! `tools/list` returns `{type: "function", function: {..}}` descriptors.
//! Each input line is one request, each output line one response:
//!
//! ```text
//! {"id":1,"method":"tools/list"}
//! {"id":2,"method":"tools/call","params":{"name":"fetchDocuments","arguments":{}}}
//! ```

use crate::error::Result;
use crate::gateway::{ToolGateway, ToolInvocation};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct Response {
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl Response {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(ErrorBody {
                message: message.into(),
            }),
        }
    }
}

/// Serves requests until `reader` hits EOF. Requests are handled one at a time.
pub async fn serve<R, W>(gateway: &ToolGateway, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        // A bad line gets an error reply; it never ends the loop.
        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(gateway, line).await,
            Err(e) => {
                tracing::warn!(error = %e, "request is not valid UTF-8");
                Response::err(Value::Null, format!("malformed request: {e}"))
            }
        };

        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }

    tracing::info!("input closed, shutting down");
    Ok(())
}

async fn handle_line(gateway: &ToolGateway, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "malformed request");
            return Response::err(Value::Null, format!("malformed request: {e}"));
        }
    };

    match request.method.as_str() {
        "tools/list" => Response::ok(request.id, json!({ "tools": gateway.definitions() })),
        "tools/call" => {
            let call = match serde_json::from_value::<ToolInvocation>(request.params) {
                Ok(call) => call,
                Err(e) => {
                    let message = format!("invalid tools/call params: {e}");
                    return Response::err(request.id, message);
                }
            };
            let reply = gateway.invoke(call).await;
            Response::ok(request.id, json!(reply))
        }
        other => Response::err(request.id, format!("unknown method '{other}'")),
    }
}
