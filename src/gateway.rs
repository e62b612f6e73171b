use crate::backend::BackendApi;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::registration::{GuestRegistration, RegistrationAudit};
use crate::tools::{
    ConfirmGuestRegistration, FetchDocuments, PrepareGuestRegistration, SignDocument, Tool,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Prefix that marks a failed call in the text channel.
pub const ERROR_MARKER: &str = "ERROR: ";

/// One agent-issued call. Accepts both `{name, arguments}` and `{tool, args}`.
#[derive(Clone, Debug, Deserialize)]
pub struct ToolInvocation {
    #[serde(alias = "tool")]
    pub name: String,
    #[serde(alias = "args", default)]
    pub arguments: Value,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// What goes back to the agent: always text, with `is_error` kept alongside
/// so callers never have to sniff the prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolReply {
    pub content: String,
    pub is_error: bool,
}

impl ToolReply {
    fn success(content: String) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    fn failure(err: &GatewayError) -> Self {
        Self {
            content: format!("{ERROR_MARKER}{}", err.agent_message()),
            is_error: true,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ToolDescriptor {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionDescriptor,
}

#[derive(Clone, Debug, Serialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// The capability surface exposed to the agent runtime.
pub struct ToolGateway {
    tools: HashMap<String, Box<dyn Tool>>,
    // Registration order, for stable listings.
    order: Vec<String>,
}

/// Builder for configuring a `ToolGateway` before construction.
pub struct ToolGatewayBuilder {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolGateway {
    pub fn builder() -> ToolGatewayBuilder {
        ToolGatewayBuilder { tools: Vec::new() }
    }

    /// The staged capability set: fetch, sign, prepare, confirm.
    pub fn standard(backend: Arc<dyn BackendApi>, config: &GatewayConfig) -> Self {
        let audit = Arc::new(RegistrationAudit::new(config.audit_ttl));
        Self::with_audit(backend, audit)
    }

    pub fn with_audit(backend: Arc<dyn BackendApi>, audit: Arc<RegistrationAudit>) -> Self {
        let registration = Arc::new(GuestRegistration::new(Arc::clone(&backend), audit));

        Self::builder()
            .with_tool(FetchDocuments::new(Arc::clone(&backend)))
            .with_tool(SignDocument::new(backend))
            .with_tool(PrepareGuestRegistration::new(Arc::clone(&registration)))
            .with_tool(ConfirmGuestRegistration::new(registration))
            .build()
    }

    /// Registers a tool at runtime. A tool with the same name is replaced.
    pub fn register_tool(&mut self, tool: impl Tool + 'static) -> &mut Self {
        self.register_tool_box(Box::new(tool))
    }

    fn register_tool_box(&mut self, tool: Box<dyn Tool>) -> &mut Self {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
        self
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Function descriptors in registration order.
    pub fn definitions(&self) -> Vec<ToolDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ToolDescriptor {
                kind: "function",
                function: FunctionDescriptor {
                    name: tool.name().to_string(),
                    description: tool.description().to_string(),
                    parameters: tool.parameters(),
                },
            })
            .collect()
    }

    /// Dispatches one call. Never fails: every error becomes `ERROR:` text.
    pub async fn invoke(&self, call: ToolInvocation) -> ToolReply {
        let invocation_id = Uuid::new_v4();
        let span = tracing::info_span!("tool_call", tool = %call.name, %invocation_id);

        async move {
            match self.try_invoke(call).await {
                Ok(output) => {
                    tracing::info!("tool call succeeded");
                    ToolReply::success(output)
                }
                Err(e) => {
                    match &e {
                        // The validation message can echo guest data; log only its kind.
                        GatewayError::Validation(v) => {
                            tracing::info!(kind = v.kind(), "tool call rejected");
                        }
                        GatewayError::InvalidToolInput(_) => {
                            tracing::info!(error = %e, "tool call rejected");
                        }
                        _ => tracing::warn!(error = %e, "tool call failed"),
                    }
                    ToolReply::failure(&e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Structured variant of [`ToolGateway::invoke`].
    pub async fn try_invoke(&self, call: ToolInvocation) -> Result<String> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| GatewayError::ToolNotFound(call.name.clone()))?;
        let args = normalize_arguments(call.arguments)?;
        tool.execute(args).await
    }
}

impl ToolGatewayBuilder {
    /// Add a tool before building the gateway.
    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    pub fn build(self) -> ToolGateway {
        let mut gateway = ToolGateway {
            tools: HashMap::new(),
            order: Vec::new(),
        };
        for tool in self.tools {
            gateway.register_tool_box(tool);
        }
        gateway
    }
}

/// Agents sometimes send arguments as a JSON-encoded string; json5 tolerates
/// the trailing commas and single quotes models like to produce.
pub fn normalize_arguments(args: Value) -> Result<Value> {
    match args {
        Value::Null => Ok(Value::Object(Default::default())),
        Value::Object(_) => Ok(args),
        Value::String(raw) if raw.trim().is_empty() => Ok(Value::Object(Default::default())),
        Value::String(raw) => match json5::from_str::<Value>(&raw) {
            Ok(parsed @ Value::Object(_)) => Ok(parsed),
            Ok(_) => Err(GatewayError::InvalidToolInput(
                "arguments must be a JSON object".to_string(),
            )),
            Err(e) => Err(GatewayError::InvalidToolInput(format!(
                "arguments are not valid JSON: {e}"
            ))),
        },
        _ => Err(GatewayError::InvalidToolInput(
            "arguments must be a JSON object".to_string(),
        )),
    }
}
