use async_trait::async_trait;

use crate::errors::AgentResult;
use crate::models::tool::{Tool, ToolCall};

/// A source of tools the agent can dispatch to during a conversation.
///
/// `call` returns the tool's JSON envelope as a string. Implementations must
/// absorb their own execution failures into an `{"error": ...}` envelope and
/// reserve `Err` for calls that never reached a tool (unknown name, bad
/// arguments), so a misbehaving tool can never abort the reasoning loop.
#[async_trait]
pub trait System: Send + Sync {
    /// Get the name of the system
    fn name(&self) -> &str;

    /// Get the system description
    fn description(&self) -> &str;

    /// Get available tools
    fn tools(&self) -> &[Tool];

    /// Call a tool with the given arguments
    async fn call(&self, tool_call: ToolCall) -> AgentResult<String>;
}
