use agentfs_core::{ToolDefinition, ToolError, ToolResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A single-purpose file-system tool with a typed argument struct.
///
/// `run` is the only implementation of a tool's behaviour; `call` and the
/// [`AsyncTool`] methods are adapters around it.
pub trait Tool: Clone + Send + Sync + 'static {
    type Args: DeserializeOwned + Send + 'static;

    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;

    /// JSON schema of `Args`.
    fn parameters(&self) -> Value;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }

    fn run(&self, args: Self::Args) -> ToolResult<String>;

    fn parse_args(&self, arguments: Value) -> ToolResult<Self::Args> {
        Ok(serde_json::from_value(arguments)?)
    }

    /// Parses `arguments`, runs the tool and renders the outcome as the
    /// plain string agents consume. Never fails.
    fn call(&self, arguments: Value) -> String {
        match self.parse_args(arguments).and_then(|args| self.run(args)) {
            Ok(output) => output,
            Err(err) => {
                if err.is_precondition() {
                    tracing::warn!("{} rejected call: {}", self.name(), err);
                } else {
                    tracing::error!("{} failed: {}", self.name(), err);
                }
                err.to_legacy_string()
            }
        }
    }
}

/// Non-blocking surface for async callers. The synchronous body runs on
/// tokio's blocking pool.
#[async_trait]
pub trait AsyncTool: Tool {
    async fn run_async(&self, args: Self::Args) -> ToolResult<String>;
    async fn call_async(&self, arguments: Value) -> String;
}

#[async_trait]
impl<T: Tool> AsyncTool for T {
    async fn run_async(&self, args: Self::Args) -> ToolResult<String> {
        let tool = self.clone();
        tokio::task::spawn_blocking(move || tool.run(args))
            .await
            .map_err(|e| ToolError::Task(e.to_string()))?
    }

    async fn call_async(&self, arguments: Value) -> String {
        let tool = self.clone();
        match tokio::task::spawn_blocking(move || tool.call(arguments)).await {
            Ok(output) => output,
            Err(e) => ToolError::Task(e.to_string()).to_legacy_string(),
        }
    }
}
