use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

const MAX_MESSAGE_LENGTH: usize = 2000;
const MAX_THREAD_ID_LENGTH: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    message: String,
    thread_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    response: String,
    thread_id: String,
    timestamp: String,
}

fn valid_thread_id(thread_id: &str) -> bool {
    !thread_id.is_empty()
        && thread_id.len() <= MAX_THREAD_ID_LENGTH
        && thread_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Messaggio vuoto".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err((StatusCode::BAD_REQUEST, "Messaggio troppo lungo".to_string()));
    }

    let thread_id = request.thread_id.unwrap_or_else(|| "default".to_string());
    if !valid_thread_id(&thread_id) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Formato thread_id non valido".to_string(),
        ));
    }

    let response = state.chatbot.chat(message, &thread_id).await;

    Ok(Json(ChatResponse {
        response,
        thread_id,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use veronica::chatbot::Chatbot;
    use veronica::config::Configuration;
    use veronica::models::message::Message;
    use veronica::providers::mock::MockProvider;

    fn test_app(responses: Vec<Message>) -> Router {
        let provider = Box::new(MockProvider::new(responses));
        let chatbot = Chatbot::new(provider, &Configuration::default()).unwrap();
        routes(AppState::new(chatbot))
    }

    async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_chat_returns_response_and_thread_id() {
        let app = test_app(vec![
            Message::assistant().with_text("Ciao! Sono l'assistente AI di Veronica."),
        ]);

        let (status, body) = post_chat(
            app,
            json!({"message": "Ciao!", "thread_id": "user_123"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Ciao! Sono l'assistente AI di Veronica.");
        assert_eq!(body["thread_id"], "user_123");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_chat_defaults_thread_id() {
        let app = test_app(vec![Message::assistant().with_text("Risposta")]);

        let (status, body) = post_chat(app, json!({"message": "Ciao!"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["thread_id"], "default");
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let app = test_app(vec![]);
        let (status, _) = post_chat(app, json!({"message": "   "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_message_is_rejected() {
        let app = test_app(vec![]);
        let long_message = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        let (status, _) = post_chat(app, json!({"message": long_message})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_thread_id_is_rejected() {
        let app = test_app(vec![]);
        let (status, _) = post_chat(
            app,
            json!({"message": "Ciao!", "thread_id": "not valid!"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_valid_thread_id() {
        assert!(valid_thread_id("default"));
        assert!(valid_thread_id("user_123"));
        assert!(valid_thread_id("a-b-c"));
        assert!(!valid_thread_id(""));
        assert!(!valid_thread_id("spazi non ammessi"));
        assert!(!valid_thread_id(&"x".repeat(MAX_THREAD_ID_LENGTH + 1)));
    }
}
