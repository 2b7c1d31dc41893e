pub mod agent;
pub mod chatbot;
pub mod config;
pub mod errors;
pub mod models;
pub mod profile;
pub mod prompt;
pub mod prompt_template;
pub mod providers;
pub mod session;
pub mod systems;
pub mod wordpress;
