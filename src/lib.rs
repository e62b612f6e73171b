pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod registration;
pub mod telemetry;
pub mod tools;
pub mod transport;

pub use backend::{BackendApi, Document, Guest, HttpBackend};
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::{ToolGateway, ToolInvocation, ToolReply};
