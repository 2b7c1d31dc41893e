use anyhow::Result;
use async_stream;
use futures::stream::BoxStream;
use serde_json::json;
use std::collections::HashSet;

use crate::errors::{AgentError, AgentResult};
use crate::models::message::{Message, ToolRequest};
use crate::models::tool::{Tool, ToolCall};
use crate::providers::base::Provider;
use crate::systems::System;

/// Upper bound on reason/act rounds in a single reply. A conversation that
/// still wants tools after this many rounds gets a degraded answer instead
/// of looping forever.
const MAX_TOOL_TURNS: usize = 10;

const MAX_TURNS_MESSAGE: &str = "Mi dispiace, non sono riuscita a completare la richiesta: \
troppi passaggi intermedi. Prova a riformulare la domanda in modo più specifico.";

/// Agent integrates a foundational LLM with the systems it needs to pilot
pub struct Agent {
    systems: Vec<Box<dyn System>>,
    provider: Box<dyn Provider>,
}

impl Agent {
    /// Create a new Agent with the specified provider
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self {
            systems: Vec::new(),
            provider,
        }
    }

    /// Add a system to the agent. Fails when a tool name collides with one
    /// already registered or a tool does not declare an object schema.
    pub fn add_system(&mut self, system: Box<dyn System>) -> Result<()> {
        let mut names: HashSet<String> = self
            .systems
            .iter()
            .flat_map(|s| s.tools().iter().map(|t| t.name.clone()))
            .collect();

        for tool in system.tools() {
            if tool.input_schema.get("type").and_then(|t| t.as_str()) != Some("object") {
                anyhow::bail!("Tool '{}' must declare an object input schema", tool.name);
            }
            if !names.insert(tool.name.clone()) {
                anyhow::bail!("Duplicate tool name: {}", tool.name);
            }
        }

        self.systems.push(system);
        Ok(())
    }

    /// Get all tools from all systems
    fn get_tools(&self) -> Vec<Tool> {
        self.systems
            .iter()
            .flat_map(|system| system.tools().iter().cloned())
            .collect()
    }

    /// Find the system that owns a tool
    fn get_system_for_tool(&self, tool_name: &str) -> Option<&dyn System> {
        self.systems
            .iter()
            .find(|sys| sys.tools().iter().any(|tool| tool.name == tool_name))
            .map(|v| &**v)
    }

    /// Dispatch a single tool call to the appropriate system
    async fn dispatch_tool_call(&self, tool_call: AgentResult<ToolCall>) -> AgentResult<String> {
        let call = tool_call?;
        let system = self
            .get_system_for_tool(&call.name)
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

        system.call(call).await
    }

    /// Create a stream that yields each message as it's generated by the agent.
    /// This includes both the assistant's responses and any tool responses.
    ///
    /// The caller provides the full history, system prompt included as the
    /// first message; the loop extends a private copy with every exchange it
    /// generates so each completion sees the tool results so far.
    pub async fn reply(&self, messages: &[Message]) -> Result<BoxStream<'_, Result<Message>>> {
        let mut messages = messages.to_vec();
        let tools = self.get_tools();

        Ok(Box::pin(async_stream::try_stream! {
            let mut turns = 0;
            loop {
                // Get completion from provider
                let (response, _) = self.provider.complete(&messages, &tools).await?;

                // Yield the assistant's response
                yield response.clone();

                // Ensures the above message is yielded before the following
                // potentially long-running tool calls start processing
                tokio::task::yield_now().await;

                // First collect any tool requests
                let tool_requests: Vec<&ToolRequest> = response.content
                    .iter()
                    .filter_map(|content| content.as_tool_request())
                    .collect();

                if tool_requests.is_empty() {
                    // No more tool calls, end the reply loop
                    break;
                }

                turns += 1;
                if turns > MAX_TOOL_TURNS {
                    yield Message::assistant().with_text(MAX_TURNS_MESSAGE);
                    break;
                }

                // Then dispatch each in parallel
                let futures: Vec<_> = tool_requests
                    .iter()
                    .map(|request| self.dispatch_tool_call(request.tool_call.clone()))
                    .collect();

                // Process all the futures in parallel but wait until all are finished
                let outputs = futures::future::join_all(futures).await;

                messages.push(response.clone());

                // One tool response message per request, using the original ID.
                // Dispatch failures become an error envelope the model can read.
                for (request, output) in tool_requests.iter().zip(outputs.into_iter()) {
                    let envelope = match output {
                        Ok(envelope) => envelope,
                        Err(e) => json!({"error": e.to_string()}).to_string(),
                    };
                    let message_tool_response = Message::user()
                        .with_tool_response(request.id.clone(), Ok(envelope));

                    yield message_tool_response.clone();
                    messages.push(message_tool_response);
                }
            }
        }))
    }
}
