use anyhow::{anyhow, Result};
use async_trait::async_trait;
use indoc::indoc;
use serde_json::{json, Value};

use crate::config;
use crate::errors::{AgentError, AgentResult};
use crate::models::tool::{Tool, ToolCall};
use crate::systems::System;
use crate::wordpress::client::params;
use crate::wordpress::{processor, WordPressClient};

/// The system exposing Veronica's site content to the model: blog posts,
/// portfolio projects, certifications, work history, books, tools and the
/// professional stack, plus static contact information.
pub struct ProfileSystem {
    client: WordPressClient,
    tools: Vec<Tool>,
}

fn limit_schema(description: &str, default: u64) -> Value {
    json!({"type": "integer", "description": description, "default": default})
}

impl ProfileSystem {
    pub fn new(base_url: &str) -> Result<Self> {
        let tools = vec![
            Tool::new(
                "search_blog_posts",
                indoc! {"
                    Cerca negli articoli del blog di Veronica per argomenti specifici.
                    Se query è vuota, restituisce gli articoli più recenti.
                "},
                json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Termine di ricerca per trovare articoli rilevanti (opzionale)"},
                        "limit": limit_schema("Numero massimo di risultati", 5),
                    },
                    "required": []
                }),
            ),
            Tool::new(
                "get_latest_blog_post",
                "Recupera l'ultimo articolo pubblicato sul blog di Veronica con dettagli completi.",
                json!({"type": "object", "properties": {}, "required": []}),
            ),
            Tool::new(
                "get_portfolio_projects",
                "Recupera progetti del portfolio di Veronica con tutti i dettagli.",
                json!({
                    "type": "object",
                    "properties": {
                        "category": {"type": "string", "description": "Categoria progetti (ai, web, ecc.) - opzionale"},
                        "limit": limit_schema("Numero massimo di progetti", 10),
                    },
                    "required": []
                }),
            ),
            Tool::new(
                "get_certifications",
                "Recupera le certificazioni e formazione di Veronica con dettagli completi.",
                json!({
                    "type": "object",
                    "properties": {"limit": limit_schema("Numero massimo di risultati", 10)},
                    "required": []
                }),
            ),
            Tool::new(
                "get_work_experience",
                "Recupera le esperienze lavorative di Veronica con dettagli completi.",
                json!({
                    "type": "object",
                    "properties": {"limit": limit_schema("Numero massimo di risultati", 10)},
                    "required": []
                }),
            ),
            Tool::new(
                "get_books_and_reading",
                "Recupera i libri letti e recensiti da Veronica.",
                json!({
                    "type": "object",
                    "properties": {"limit": limit_schema("Numero massimo di risultati", 10)},
                    "required": []
                }),
            ),
            Tool::new(
                "get_tools_and_stack",
                indoc! {"
                    Recupera strumenti personali e stack tecnologico professionale di Veronica,
                    divisi in due gruppi: personal_tools e professional_stack.
                "},
                json!({
                    "type": "object",
                    "properties": {
                        "category": {"type": "string", "description": "Filtra per categoria (es. 'AI', 'Design', 'Development', 'MLOps')"},
                        "limit": limit_schema("Numero massimo di risultati per gruppo", 20),
                    },
                    "required": []
                }),
            ),
            Tool::new(
                "search_all_content",
                "Ricerca generale nei contenuti di Veronica (articoli, progetti, certificazioni, strumenti).",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Termine di ricerca"},
                        "limit_per_type": limit_schema("Limite risultati per tipo di contenuto", 3),
                    },
                    "required": ["query"]
                }),
            ),
            Tool::new(
                "get_contact_info",
                "Restituisce le informazioni di contatto di Veronica.",
                json!({"type": "object", "properties": {}, "required": []}),
            ),
        ];

        Ok(Self {
            client: WordPressClient::new(base_url)?,
            tools,
        })
    }

    async fn search_blog_posts(&self, args: &Value) -> Result<Value> {
        let query = arg_str(args, "query");
        let limit = arg_limit(args, "limit", 5);

        let mut query_params = params(&[("per_page", limit.to_string())]);
        if !query.is_empty() {
            query_params.insert("search".to_string(), query.clone());
        }

        let posts = self.client.get_posts(&query_params).await;
        if posts.is_empty() {
            let message = if query.is_empty() {
                "Nessun articolo trovato".to_string()
            } else {
                format!("Nessun articolo trovato per la ricerca: {}", query)
            };
            return Ok(json!({"message": message, "total": 0, "articles": []}));
        }

        let articles: Vec<_> = posts.iter().map(processor::process_post).collect();
        Ok(json!({
            "total": articles.len(),
            "search_query": if query.is_empty() { "ultimi articoli".to_string() } else { query },
            "articles": articles,
        }))
    }

    async fn get_latest_blog_post(&self) -> Result<Value> {
        let posts = self
            .client
            .get_posts(&params(&[("per_page", "1".to_string())]))
            .await;

        match posts.first() {
            None => Ok(json!({"message": "Nessun articolo trovato", "total": 0, "articles": []})),
            Some(post) => Ok(json!({
                "total": 1,
                "latest_article": processor::process_post(post),
                "message": "Ultimo articolo pubblicato",
            })),
        }
    }

    async fn get_portfolio_projects(&self, args: &Value) -> Result<Value> {
        let limit = arg_limit(args, "limit", 10);
        let projects = self
            .client
            .get_projects(&params(&[("per_page", limit.to_string())]))
            .await;

        if projects.is_empty() {
            return Ok(json!({
                "message": "Nessun progetto trovato nel portfolio",
                "total": 0,
                "projects": [],
            }));
        }

        let results: Vec<_> = projects.iter().map(processor::process_project).collect();
        Ok(json!({"total": results.len(), "projects": results}))
    }

    async fn get_certifications(&self, args: &Value) -> Result<Value> {
        let limit = arg_limit(args, "limit", 10);
        let certifications = self
            .client
            .get_certifications(&params(&[("per_page", limit.to_string())]))
            .await;

        if certifications.is_empty() {
            return Ok(json!({
                "message": "Nessuna certificazione trovata",
                "total": 0,
                "certifications": [],
            }));
        }

        let results: Vec<_> = certifications
            .iter()
            .map(processor::process_certification)
            .collect();
        Ok(json!({"total": results.len(), "certifications": results}))
    }

    async fn get_work_experience(&self, args: &Value) -> Result<Value> {
        let limit = arg_limit(args, "limit", 10);
        let experiences = self
            .client
            .get_work_experiences(&params(&[("per_page", limit.to_string())]))
            .await;

        if experiences.is_empty() {
            return Ok(json!({
                "message": "Nessuna esperienza lavorativa trovata",
                "total": 0,
                "experiences": [],
            }));
        }

        let results: Vec<_> = experiences
            .iter()
            .map(processor::process_work_experience)
            .collect();
        Ok(json!({"total": results.len(), "experiences": results}))
    }

    async fn get_books_and_reading(&self, args: &Value) -> Result<Value> {
        let limit = arg_limit(args, "limit", 10);
        let books = self
            .client
            .get_books(&params(&[("per_page", limit.to_string())]))
            .await;

        if books.is_empty() {
            return Ok(json!({"message": "Nessun libro trovato", "total": 0, "books": []}));
        }

        let results: Vec<_> = books.iter().map(processor::process_book).collect();
        Ok(json!({"total": results.len(), "books": results}))
    }

    async fn get_tools_and_stack(&self, args: &Value) -> Result<Value> {
        let category = arg_str(args, "category").to_lowercase();
        let limit = arg_limit(args, "limit", 20);
        let query_params = params(&[("per_page", limit.to_string())]);

        let (tools, stacks) = tokio::join!(
            self.client.get_tools(&query_params),
            self.client.get_stacks(&query_params)
        );

        let matches = |categories: &[String]| {
            category.is_empty()
                || categories
                    .iter()
                    .any(|c| c.to_lowercase().contains(&category))
        };

        let personal_tools: Vec<_> = tools
            .iter()
            .map(processor::process_tool)
            .filter(|t| matches(&t.categories))
            .collect();
        let professional_stack: Vec<_> = stacks
            .iter()
            .map(processor::process_stack)
            .filter(|s| matches(&s.categories))
            .collect();

        if personal_tools.is_empty() && professional_stack.is_empty() {
            return Ok(json!({
                "message": "Nessuno strumento trovato",
                "total": 0,
                "data": {"personal_tools": [], "professional_stack": []},
            }));
        }

        Ok(json!({
            "total": personal_tools.len() + professional_stack.len(),
            "total_personal": personal_tools.len(),
            "total_professional": professional_stack.len(),
            "data": {
                "personal_tools": personal_tools,
                "professional_stack": professional_stack,
            },
        }))
    }

    async fn search_all_content(&self, args: &Value) -> Result<Value> {
        let query = arg_str(args, "query");
        if query.is_empty() {
            return Err(anyhow!("parametro 'query' mancante"));
        }
        let limit = arg_limit(args, "limit_per_type", 3);
        let query_params = params(&[
            ("search", query.clone()),
            ("per_page", limit.to_string()),
        ]);

        let (posts, projects, certifications, tools) = tokio::join!(
            self.client.get_posts(&query_params),
            self.client.get_projects(&query_params),
            self.client.get_certifications(&query_params),
            self.client.get_tools(&query_params)
        );

        let mut results = serde_json::Map::new();
        if !posts.is_empty() {
            let articles: Vec<_> = posts.iter().map(processor::process_post).collect();
            results.insert("articles".to_string(), serde_json::to_value(articles)?);
        }
        if !projects.is_empty() {
            let items: Vec<_> = projects.iter().map(processor::process_project).collect();
            results.insert("projects".to_string(), serde_json::to_value(items)?);
        }
        if !certifications.is_empty() {
            let items: Vec<_> = certifications
                .iter()
                .map(processor::process_certification)
                .collect();
            results.insert("certifications".to_string(), serde_json::to_value(items)?);
        }
        if !tools.is_empty() {
            let items: Vec<_> = tools.iter().map(processor::process_tool).collect();
            results.insert("tools".to_string(), serde_json::to_value(items)?);
        }

        let total = posts.len() + projects.len() + certifications.len() + tools.len();
        if total == 0 {
            return Ok(json!({
                "message": format!("Nessun contenuto trovato per la ricerca: {}", query),
                "total": 0,
                "results": {},
            }));
        }

        Ok(json!({"search_query": query, "total": total, "results": results}))
    }

    fn get_contact_info(&self) -> Result<Value> {
        Ok(json!({
            "contacts": config::contact_info(),
            "message": "Contattami per collaborazioni, progetti o semplicemente per fare una chiacchierata tech!",
        }))
    }
}

fn arg_str(args: &Value, key: &str) -> String {
    args[key].as_str().unwrap_or("").trim().to_string()
}

fn arg_limit(args: &Value, key: &str, default: u64) -> u64 {
    args[key].as_u64().unwrap_or(default)
}

#[async_trait]
impl System for ProfileSystem {
    fn name(&self) -> &str {
        "profile"
    }

    fn description(&self) -> &str {
        "Contenuti del sito di Veronica Schembri: blog, portfolio, certificazioni, esperienze, libri e strumenti"
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, tool_call: ToolCall) -> AgentResult<String> {
        let args = &tool_call.arguments;
        let result = match tool_call.name.as_str() {
            "search_blog_posts" => self
                .search_blog_posts(args)
                .await
                .map_err(|e| format!("Errore nella ricerca articoli: {}", e)),
            "get_latest_blog_post" => self
                .get_latest_blog_post()
                .await
                .map_err(|e| format!("Errore nel recupero ultimo articolo: {}", e)),
            "get_portfolio_projects" => self
                .get_portfolio_projects(args)
                .await
                .map_err(|e| format!("Errore nel recupero progetti: {}", e)),
            "get_certifications" => self
                .get_certifications(args)
                .await
                .map_err(|e| format!("Errore nel recupero certificazioni: {}", e)),
            "get_work_experience" => self
                .get_work_experience(args)
                .await
                .map_err(|e| format!("Errore nel recupero esperienze: {}", e)),
            "get_books_and_reading" => self
                .get_books_and_reading(args)
                .await
                .map_err(|e| format!("Errore nel recupero libri: {}", e)),
            "get_tools_and_stack" => self
                .get_tools_and_stack(args)
                .await
                .map_err(|e| format!("Errore nel recupero strumenti: {}", e)),
            "search_all_content" => self
                .search_all_content(args)
                .await
                .map_err(|e| format!("Errore nella ricerca generale: {}", e)),
            "get_contact_info" => self
                .get_contact_info()
                .map_err(|e| format!("Errore nel recupero contatti: {}", e)),
            _ => return Err(AgentError::ToolNotFound(tool_call.name)),
        };

        // Execution failures become an error envelope the model can read;
        // they never escape the tool boundary as an Err.
        let envelope = match result {
            Ok(value) => value,
            Err(message) => json!({"error": message}),
        };
        Ok(envelope.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn empty_backend() -> (MockServer, ProfileSystem) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        let system = ProfileSystem::new(&server.uri()).unwrap();
        (server, system)
    }

    #[tokio::test]
    async fn test_every_collection_tool_reports_total_zero_on_empty_backend() {
        let (_server, system) = empty_backend().await;

        let collection_tools = [
            "search_blog_posts",
            "get_latest_blog_post",
            "get_portfolio_projects",
            "get_certifications",
            "get_work_experience",
            "get_books_and_reading",
            "get_tools_and_stack",
        ];

        for name in collection_tools {
            let output = system
                .call(ToolCall::new(name, json!({})))
                .await
                .unwrap();
            let envelope: Value = serde_json::from_str(&output).unwrap();
            assert_eq!(envelope["total"], 0, "tool {} should report total 0", name);
            assert!(envelope["message"].is_string(), "tool {} should carry a message", name);
        }
    }

    #[tokio::test]
    async fn test_search_all_content_empty_backend() {
        let (_server, system) = empty_backend().await;
        let output = system
            .call(ToolCall::new("search_all_content", json!({"query": "AWS"})))
            .await
            .unwrap();
        let envelope: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(envelope["total"], 0);
        assert!(envelope["results"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_all_content_missing_query_yields_error_envelope() {
        let (_server, system) = empty_backend().await;
        let output = system
            .call(ToolCall::new("search_all_content", json!({})))
            .await
            .unwrap();
        let envelope: Value = serde_json::from_str(&output).unwrap();
        assert!(envelope["error"]
            .as_str()
            .unwrap()
            .starts_with("Errore nella ricerca generale"));
    }

    #[tokio::test]
    async fn test_unknown_tool_name_is_tool_not_found() {
        let (_server, system) = empty_backend().await;
        let result = system.call(ToolCall::new("get_weather", json!({}))).await;
        assert_eq!(
            result,
            Err(AgentError::ToolNotFound("get_weather".to_string()))
        );
    }

    #[tokio::test]
    async fn test_get_contact_info_shape() {
        let (_server, system) = empty_backend().await;
        let output = system
            .call(ToolCall::new("get_contact_info", json!({})))
            .await
            .unwrap();
        let envelope: Value = serde_json::from_str(&output).unwrap();
        assert!(envelope["contacts"]["email"].as_str().unwrap().contains('@'));
        assert!(envelope["message"].is_string());
    }

    #[tokio::test]
    async fn test_search_blog_posts_passes_query_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/posts"))
            .and(query_param("search", "langchain"))
            .and(query_param("per_page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "title": {"rendered": "RAG con LangChain"},
                    "content": {"rendered": "<p>Come costruire un RAG</p>"},
                    "excerpt": {"rendered": ""},
                    "link": "https://example.org/rag",
                    "date": "2024-05-01T10:00:00",
                }
            ])))
            .mount(&server)
            .await;

        let system = ProfileSystem::new(&server.uri()).unwrap();
        let output = system
            .call(ToolCall::new(
                "search_blog_posts",
                json!({"query": "langchain", "limit": 2}),
            ))
            .await
            .unwrap();

        let envelope: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(envelope["total"], 1);
        assert_eq!(envelope["search_query"], "langchain");
        assert_eq!(envelope["articles"][0]["type"], "article");
        assert_eq!(envelope["articles"][0]["title"], "RAG con LangChain");
    }

    #[tokio::test]
    async fn test_get_latest_blog_post_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/posts"))
            .and(query_param("per_page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "title": {"rendered": "Ultimo post"},
                    "content": {"rendered": "<p>contenuto</p>"},
                    "excerpt": {"rendered": "<p>excerpt</p>"},
                    "link": "https://example.org/ultimo",
                    "date": "2024-08-01T09:00:00",
                }
            ])))
            .mount(&server)
            .await;

        let system = ProfileSystem::new(&server.uri()).unwrap();
        let output = system
            .call(ToolCall::new("get_latest_blog_post", json!({})))
            .await
            .unwrap();
        let envelope: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(envelope["total"], 1);
        assert_eq!(envelope["latest_article"]["title"], "Ultimo post");
        assert_eq!(envelope["latest_article"]["date"], "2024-08-01");
    }

    #[tokio::test]
    async fn test_get_tools_and_stack_buckets_and_category_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/tools"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "title": {"rendered": "Obsidian"},
                    "content": {"rendered": "<p>Note</p>"},
                    "link": "https://example.org/obsidian",
                    "date": "2024-01-01T00:00:00",
                    "tool-category": [15],
                }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/stacks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "title": {"rendered": "LangGraph"},
                    "content": {"rendered": "<p>Agenti</p>"},
                    "link": "https://example.org/langgraph",
                    "date": "2024-01-01T00:00:00",
                    "stack-category": [2],
                },
                {
                    "title": {"rendered": "Figma"},
                    "content": {"rendered": "<p>Design</p>"},
                    "link": "https://example.org/figma",
                    "date": "2024-01-01T00:00:00",
                    "stack-category": [25],
                }
            ])))
            .mount(&server)
            .await;

        let system = ProfileSystem::new(&server.uri()).unwrap();

        let output = system
            .call(ToolCall::new("get_tools_and_stack", json!({})))
            .await
            .unwrap();
        let envelope: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(envelope["total_personal"], 1);
        assert_eq!(envelope["total_professional"], 2);
        assert_eq!(envelope["total"], 3);

        // Category filter only keeps the AI stack entry
        let output = system
            .call(ToolCall::new("get_tools_and_stack", json!({"category": "ai"})))
            .await
            .unwrap();
        let envelope: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(envelope["total_personal"], 0);
        assert_eq!(envelope["total_professional"], 1);
        assert_eq!(
            envelope["data"]["professional_stack"][0]["title"],
            "LangGraph"
        );
    }

    #[test]
    fn test_registry_has_the_nine_tools() {
        let system = ProfileSystem::new("https://example.org").unwrap();
        let names: Vec<&str> = system.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "search_blog_posts",
                "get_latest_blog_post",
                "get_portfolio_projects",
                "get_certifications",
                "get_work_experience",
                "get_books_and_reading",
                "get_tools_and_stack",
                "search_all_content",
                "get_contact_info",
            ]
        );
    }
}
