//! The objects passed around by the agent: conversation messages, the tool
//! descriptors shown to the model, and the tool calls it sends back.
//!
//! Provider wire formats (OpenAI-style chat completions) are converted to and
//! from these internal structs in `providers::utils`; nothing outside the
//! provider layer touches a wire format directly.
pub mod message;
pub mod role;
pub mod tool;
