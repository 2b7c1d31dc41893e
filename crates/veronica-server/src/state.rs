use std::sync::Arc;

use veronica::chatbot::Chatbot;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub chatbot: Arc<Chatbot>,
}

impl AppState {
    pub fn new(chatbot: Chatbot) -> Self {
        Self {
            chatbot: Arc::new(chatbot),
        }
    }
}
