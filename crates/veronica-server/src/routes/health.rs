use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
    services: Value,
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Veronica Schembri WordPress Chatbot API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        services: json!({
            "chatbot": "healthy",
            "active_threads": state.chatbot.thread_count(),
        }),
    })
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use veronica::chatbot::Chatbot;
    use veronica::config::Configuration;
    use veronica::models::message::Message;
    use veronica::providers::mock::MockProvider;

    fn test_state(responses: Vec<Message>) -> AppState {
        let provider = Box::new(MockProvider::new(responses));
        AppState::new(Chatbot::new(provider, &Configuration::default()).unwrap())
    }

    async fn get_health(state: AppState) -> Value {
        let response = routes(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_healthy() {
        let body = get_health(test_state(vec![])).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["services"]["chatbot"], "healthy");
        assert_eq!(body["services"]["active_threads"], 0);
    }

    #[tokio::test]
    async fn test_health_counts_active_threads() {
        let state = test_state(vec![Message::assistant().with_text("Ciao!")]);
        state.chatbot.chat("Ciao!", "user_1").await;

        let body = get_health(state).await;
        assert_eq!(body["services"]["active_threads"], 1);
    }
}
