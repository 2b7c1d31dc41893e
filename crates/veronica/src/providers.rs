//! Model providers speaking the OpenAI chat-completions wire format.
pub mod base;
pub mod configs;
pub mod factory;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod utils;
