use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();

    /// Category term ids used by the `tools` collection.
    static ref TOOL_CATEGORIES: HashMap<i64, &'static str> = HashMap::from([
        (13, "Strumenti"),
        (14, "Have fun"),
        (15, "Organizzare"),
        (16, "Catturare"),
    ]);

    /// Category term ids used by the `stacks` collection.
    static ref STACK_CATEGORIES: HashMap<i64, &'static str> = HashMap::from([
        (2, "AI Engineering & Machine Learning"),
        (25, "Design"),
        (27, "Development Tools"),
        (12, "Front-End Dev"),
        (92, "MLOps & DevOps"),
    ]);
}

/// Strip markup from a rendered WordPress field: remove tags, decode the
/// common entities, collapse whitespace runs, trim.
pub fn clean_html(html_content: &str) -> String {
    if html_content.is_empty() {
        return String::new();
    }

    let text = TAG_RE.replace_all(html_content, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// First `max` characters of `text` with an ellipsis marker when truncated.
/// Counts characters, not bytes, so multibyte text is never split mid-sequence.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let truncated: String = text.chars().take(max).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

/// The `YYYY-MM-DD` portion of a WordPress datetime string.
fn short_date(date: &str) -> String {
    date.chars().take(10).collect()
}

fn rendered(record: &Value, field: &str) -> String {
    record[field]["rendered"].as_str().unwrap_or("").to_string()
}

fn string_field(record: &Value, field: &str) -> String {
    record[field].as_str().unwrap_or("").to_string()
}

fn acf_string(record: &Value, field: &str) -> String {
    match &record["acf"][field] {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Map a category-id array field to human-readable labels. Unknown ids are
/// kept as `Category {id}` instead of being dropped.
fn map_categories(record: &Value, field: &str, table: &HashMap<i64, &'static str>) -> Vec<String> {
    record[field]
        .as_array()
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id.as_i64())
                .map(|id| {
                    table
                        .get(&id)
                        .map(|label| label.to_string())
                        .unwrap_or_else(|| format!("Category {}", id))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,
    pub content_preview: String,
    pub excerpt: String,
    pub link: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub repository: String,
    pub external_url: String,
    pub frontend_url: String,
    pub preview_text: String,
    pub link: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Certification {
    pub title: String,
    pub ente: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub course_link: String,
    pub project_link: String,
    pub link: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    pub position: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub link: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub rating: String,
    pub review: String,
    pub status: String,
    pub excerpt: String,
    pub link: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolItem {
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    pub link: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackItem {
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    pub link: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Process a blog post record
pub fn process_post(post: &Value) -> Article {
    let clean_content = clean_html(&rendered(post, "content"));
    let mut clean_excerpt = clean_html(&rendered(post, "excerpt"));

    // Derive an excerpt from the body when WordPress supplies none
    if clean_excerpt.is_empty() && !clean_content.is_empty() {
        clean_excerpt = preview(&clean_content, 300);
    }

    Article {
        title: rendered(post, "title"),
        content_preview: preview(&clean_content, 500),
        excerpt: clean_excerpt,
        link: string_field(post, "link"),
        date: short_date(&string_field(post, "date")),
        kind: "article",
    }
}

/// Process a portfolio project record
pub fn process_project(project: &Value) -> Project {
    let clean_content = clean_html(&rendered(project, "content"));

    Project {
        title: rendered(project, "title"),
        description: preview(&clean_content, 400),
        repository: acf_string(project, "project_repository"),
        external_url: acf_string(project, "project_external_url"),
        frontend_url: acf_string(project, "project_frontend"),
        preview_text: acf_string(project, "project_preview_text"),
        link: string_field(project, "link"),
        date: short_date(&string_field(project, "date")),
        kind: "project",
    }
}

/// Process a certification record
pub fn process_certification(cert: &Value) -> Certification {
    Certification {
        title: rendered(cert, "title"),
        ente: acf_string(cert, "ente_certificazione"),
        description: clean_html(&acf_string(cert, "descrizione_certificazione")),
        start_date: acf_string(cert, "start_corso"),
        end_date: acf_string(cert, "end_corso"),
        course_link: acf_string(cert, "link_corso"),
        project_link: acf_string(cert, "link_progetto"),
        link: string_field(cert, "link"),
        date: short_date(&string_field(cert, "date")),
        kind: "certification",
    }
}

/// Process a work experience record
pub fn process_work_experience(exp: &Value) -> WorkExperience {
    WorkExperience {
        title: rendered(exp, "title"),
        company: acf_string(exp, "company"),
        position: acf_string(exp, "position"),
        description: clean_html(&rendered(exp, "content")),
        start_date: acf_string(exp, "start_date"),
        end_date: acf_string(exp, "end_date"),
        link: string_field(exp, "link"),
        date: short_date(&string_field(exp, "date")),
        kind: "work_experience",
    }
}

/// Process a book record
pub fn process_book(book: &Value) -> Book {
    Book {
        title: rendered(book, "title"),
        author: acf_string(book, "book_author"),
        rating: acf_string(book, "book_rating"),
        review: clean_html(&acf_string(book, "book_review")),
        status: acf_string(book, "book_status"),
        excerpt: clean_html(&rendered(book, "excerpt")),
        link: string_field(book, "link"),
        date: short_date(&string_field(book, "date")),
        kind: "book",
    }
}

/// Process a personal tool record
pub fn process_tool(tool: &Value) -> ToolItem {
    ToolItem {
        title: rendered(tool, "title"),
        description: clean_html(&rendered(tool, "content")),
        categories: map_categories(tool, "tool-category", &TOOL_CATEGORIES),
        link: string_field(tool, "link"),
        date: short_date(&string_field(tool, "date")),
        kind: "tool",
    }
}

/// Process a professional stack record
pub fn process_stack(stack: &Value) -> StackItem {
    StackItem {
        title: rendered(stack, "title"),
        description: clean_html(&rendered(stack, "content")),
        categories: map_categories(stack, "stack-category", &STACK_CATEGORIES),
        link: string_field(stack, "link"),
        date: short_date(&string_field(stack, "date")),
        kind: "stack",
    }
}
