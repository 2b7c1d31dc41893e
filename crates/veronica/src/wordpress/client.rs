use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error};

/// Query parameters for a collection request. Caller-supplied entries
/// override the defaults applied by the client.
pub type Params = HashMap<String, String>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the WordPress REST collections backing the chatbot's tools.
///
/// Every fetch degrades to an empty list on transport or decoding failures:
/// the tools above this layer must stay response-producing even when the
/// site is unreachable, so errors are logged here and never propagated.
pub struct WordPressClient {
    api_base: String,
    client: Client,
}

impl WordPressClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            api_base: format!("{}/wp-json/wp/v2", base_url.trim_end_matches('/')),
            client,
        })
    }

    /// Fetch one collection, merging caller params over the defaults
    /// (50 per page, newest first).
    pub async fn fetch(&self, collection: &str, params: &Params) -> Vec<Value> {
        let url = format!("{}/{}", self.api_base, collection);

        let mut merged: Params = HashMap::from([
            ("per_page".to_string(), "50".to_string()),
            ("orderby".to_string(), "date".to_string()),
            ("order".to_string(), "desc".to_string()),
        ]);
        merged.extend(params.clone());

        let response = match self.client.get(&url).query(&merged).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(collection, error = %e, "WordPress API request failed");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            error!(collection, status = %response.status(), "WordPress API returned an error status");
            return Vec::new();
        }

        match response.json::<Vec<Value>>().await {
            Ok(items) => {
                debug!(collection, count = items.len(), "WordPress API success");
                items
            }
            Err(e) => {
                error!(collection, error = %e, "WordPress API returned malformed JSON");
                Vec::new()
            }
        }
    }

    pub async fn get_posts(&self, params: &Params) -> Vec<Value> {
        self.fetch("posts", params).await
    }

    pub async fn get_projects(&self, params: &Params) -> Vec<Value> {
        self.fetch("projects", params).await
    }

    pub async fn get_certifications(&self, params: &Params) -> Vec<Value> {
        self.fetch("certifications", params).await
    }

    pub async fn get_work_experiences(&self, params: &Params) -> Vec<Value> {
        self.fetch("work-experiences", params).await
    }

    pub async fn get_books(&self, params: &Params) -> Vec<Value> {
        self.fetch("books", params).await
    }

    pub async fn get_tools(&self, params: &Params) -> Vec<Value> {
        self.fetch("tools", params).await
    }

    pub async fn get_stacks(&self, params: &Params) -> Vec<Value> {
        self.fetch("stacks", params).await
    }
}

/// Convenience for building per-tool query parameters.
pub fn params(entries: &[(&str, String)]) -> Params {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_applies_default_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/posts"))
            .and(query_param("per_page", "50"))
            .and(query_param("orderby", "date"))
            .and(query_param("order", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .mount(&server)
            .await;

        let client = WordPressClient::new(&server.uri()).unwrap();
        let items = client.fetch("posts", &Params::new()).await;
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_caller_params_override_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/posts"))
            .and(query_param("per_page", "3"))
            .and(query_param("search", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = WordPressClient::new(&server.uri()).unwrap();
        let query = params(&[
            ("per_page", "3".to_string()),
            ("search", "rust".to_string()),
        ]);
        let items = client.fetch("posts", &query).await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_returns_empty_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/projects"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = WordPressClient::new(&server.uri()).unwrap();
        assert!(client.get_projects(&Params::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_returns_empty_on_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/books"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let client = WordPressClient::new(&server.uri()).unwrap();
        assert!(client.get_books(&Params::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_returns_empty_when_unreachable() {
        // Port 1 is never listening locally
        let client = WordPressClient::new("http://127.0.0.1:1").unwrap();
        assert!(client.get_posts(&Params::new()).await.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = WordPressClient::new("https://example.org/").unwrap();
        assert_eq!(client.api_base, "https://example.org/wp-json/wp/v2");
    }
}
