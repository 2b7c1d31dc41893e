use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_WORDPRESS_BASE_URL: &str = "https://www.veronicaschembri.com";

/// Keys the chatbot configuration recognises. Anything else found in a
/// configurable map (thread ids, orchestration counters, `__`-prefixed
/// internals) is dropped without complaint so that session plumbing can pass
/// its own keys around freely.
const VALID_CONFIG_KEYS: &[&str] = &["model", "wordpress_base_url"];

/// Configuration for the chatbot
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// The LLM model to use
    pub model: String,
    /// WordPress site base URL
    pub wordpress_base_url: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            wordpress_base_url: DEFAULT_WORDPRESS_BASE_URL.to_string(),
        }
    }
}

impl Configuration {
    /// Build a configuration from a loosely-typed configurable map, keeping
    /// only recognised keys and falling back to defaults for the rest.
    pub fn from_configurable(configurable: &HashMap<String, Value>) -> Self {
        let mut config = Configuration::default();
        for (key, value) in configurable {
            if key.starts_with("__") || !VALID_CONFIG_KEYS.contains(&key.as_str()) {
                debug!(key, "ignoring unrecognised configuration key");
                continue;
            }
            if let Some(value) = value.as_str() {
                match key.as_str() {
                    "model" => config.model = value.to_string(),
                    "wordpress_base_url" => config.wordpress_base_url = value.to_string(),
                    _ => unreachable!(),
                }
            }
        }
        config
    }

    /// Build a configuration from environment variables, defaulting where unset.
    pub fn from_env() -> Self {
        let mut configurable = HashMap::new();
        if let Ok(model) = std::env::var("VERONICA_MODEL") {
            configurable.insert("model".to_string(), json!(model));
        }
        if let Ok(url) = std::env::var("WORDPRESS_BASE_URL") {
            configurable.insert("wordpress_base_url".to_string(), json!(url));
        }
        Self::from_configurable(&configurable)
    }
}

/// Static contact information served by the `get_contact_info` tool.
pub fn contact_info() -> Value {
    json!({
        "website": "https://www.veronicaschembri.com",
        "github": "https://github.com/Pandagan-85/",
        "email": "veronicaschembri@gmail.com",
        "linkedin": "https://www.linkedin.com/in/veronicaschembri/",
        "location": "Palermo, Sicilia",
        "availability": "Aperta a collaborazioni e progetti interessanti nel campo AI/ML",
    })
}
