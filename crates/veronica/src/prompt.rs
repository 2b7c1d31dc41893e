use std::collections::HashMap;
use std::env;
use std::fs;

use tracing::warn;

use crate::prompt_template::load_prompt_file;

const DEFAULT_SUMMARY: &str = "\
Ciao! Sono Veronica Schembri, AI Engineer appassionata di Intelligenza Artificiale, \
automazione e tecnologia. Attualmente sto costruendo la mia carriera nell'AI, \
approfondendo Machine Learning, LLM e automazione intelligente.

Ho un background in sviluppo front-end con JavaScript e React, e ora mi sto \
concentrando su Python, Data Science e AI. Utilizzo strumenti come Cursor e \
Obsidian per organizzare progetti e conoscenze.

Sono una super nerd, fan di serie TV, fumetti e Magic: The Gathering, \
con una debolezza per i Lego!";

/// Load the personal summary used inside the system prompt. Reads the file
/// named by VERONICA_SUMMARY_PATH (default `me/summary.txt`) and falls back
/// to a built-in bio when the file is missing.
pub fn load_personal_summary() -> String {
    let path =
        env::var("VERONICA_SUMMARY_PATH").unwrap_or_else(|_| "me/summary.txt".to_string());
    match fs::read_to_string(&path) {
        Ok(summary) => summary,
        Err(e) => {
            warn!(path, error = %e, "personal summary not readable, using default");
            DEFAULT_SUMMARY.to_string()
        }
    }
}

/// Render the persona prompt that opens every conversation.
pub fn create_system_prompt() -> String {
    let mut context = HashMap::new();
    context.insert("summary".to_string(), load_personal_summary());

    load_prompt_file("system.md", &context)
        .unwrap_or_else(|e| {
            warn!(error = %e, "system prompt template failed to render, using summary only");
            format!(
                "Tu sei l'assistente AI di Veronica Schembri, AI Engineer e Data Scientist.\n\n{}",
                load_personal_summary()
            )
        })
}
