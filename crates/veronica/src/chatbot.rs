use std::collections::HashMap;

use anyhow::Result;
use futures::StreamExt;
use serde_json::Value;
use tracing::error;

use crate::agent::Agent;
use crate::config::Configuration;
use crate::models::message::Message;
use crate::models::role::Role;
use crate::profile::ProfileSystem;
use crate::prompt::create_system_prompt;
use crate::providers::base::Provider;
use crate::providers::configs::ProviderConfig;
use crate::providers::factory::get_provider;
use crate::session::SessionStore;

const ERROR_FALLBACK: &str = "Mi dispiace, c'è stato un errore. Riprova più tardi.";
const EMPTY_FALLBACK: &str = "Mi dispiace, non sono riuscita a processare la tua richiesta.";

/// The conversational front of the whole crate: one agent wired to the
/// WordPress profile tools, plus per-thread conversation histories.
pub struct Chatbot {
    agent: Agent,
    sessions: SessionStore,
}

impl Chatbot {
    pub fn new(provider: Box<dyn Provider>, config: &Configuration) -> Result<Self> {
        let mut agent = Agent::new(provider);
        agent.add_system(Box::new(ProfileSystem::new(&config.wordpress_base_url)?))?;

        Ok(Self {
            agent,
            sessions: SessionStore::new(),
        })
    }

    /// Build the chatbot from environment variables (provider choice, API
    /// keys, model and WordPress URL overrides).
    pub fn from_env() -> Result<Self> {
        let config = Configuration::from_env();
        let provider = get_provider(ProviderConfig::from_env(&config.model)?)?;
        Self::new(provider, &config)
    }

    /// Build the chatbot from a loosely-typed configurable map, as handed
    /// over by orchestration layers. Unrecognised keys are dropped.
    pub fn from_configurable(configurable: &HashMap<String, Value>) -> Result<Self> {
        let config = Configuration::from_configurable(configurable);
        let provider = get_provider(ProviderConfig::from_env(&config.model)?)?;
        Self::new(provider, &config)
    }

    /// Number of conversation threads currently held in memory.
    pub fn thread_count(&self) -> usize {
        self.sessions.len()
    }

    /// Run one conversational turn on a thread and return the reply text.
    ///
    /// The thread lock is held for the whole turn, so concurrent requests on
    /// the same thread id run one after the other and each sees the previous
    /// turn's history. Failures never escape: the user always gets a string.
    pub async fn chat(&self, message: &str, thread_id: &str) -> String {
        let thread = self.sessions.thread(thread_id);
        let mut history = thread.lock().await;

        if history.is_empty() {
            history.push(Message::system().with_text(create_system_prompt()));
        }
        history.push(Message::user().with_text(message));

        let mut stream = match self.agent.reply(&history).await {
            Ok(stream) => stream,
            Err(e) => {
                error!(thread_id, error = %e, "reply setup failed");
                return ERROR_FALLBACK.to_string();
            }
        };

        let mut reply_text = None;
        while let Some(result) = stream.next().await {
            match result {
                Ok(msg) => {
                    if msg.role == Role::Assistant {
                        if let Some(text) = msg.text() {
                            if !text.is_empty() {
                                reply_text = Some(text);
                            }
                        }
                    }
                    history.push(msg);
                }
                Err(e) => {
                    error!(thread_id, error = %e, "reply failed mid-turn");
                    return ERROR_FALLBACK.to_string();
                }
            }
        }

        reply_text.unwrap_or_else(|| EMPTY_FALLBACK.to_string())
    }
}
