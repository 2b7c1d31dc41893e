mod routes;
mod state;

use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use veronica::chatbot::Chatbot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let chatbot = Chatbot::from_env()?;
    let state = state::AppState::new(chatbot);

    // Create router with CORS support
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(state).layer(cors);

    let host = std::env::var("VERONICA_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("VERONICA_PORT").unwrap_or_else(|_| "8000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
