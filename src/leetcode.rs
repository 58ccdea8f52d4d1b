//! Minimal LeetCode GraphQL client.
//!
//! We only send the `questionData` query and map its answer into a `ProblemRecord`.
//! Calls are instrumented and log slug, status, latency and response size (not contents).
//!
//! The mapping from response JSON to record is a plain function so it can be
//! exercised without network access; `ProblemSource` is the seam callers depend on.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::config::ApiSettings;
use crate::domain::{CodeTemplate, ProblemRecord};
use crate::util::trunc_for_log;

const QUESTION_QUERY: &str = r#"
query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    questionFrontendId
    title
    titleSlug
    content
    difficulty
    exampleTestcases
    topicTags {
      name
      slug
    }
    codeSnippets {
      lang
      langSlug
      code
    }
    stats
    hints
    similarQuestions
  }
}
"#;

/// Why a fetch did not produce a record. Messages are shown to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error("Request failed: {0}")]
  Transport(String),
  #[error("Failed to fetch problem: {0}")]
  Status(u16),
  #[error("GraphQL error: {0}")]
  Api(String),
  #[error("Problem not found")]
  NotFound,
  #[error("Unexpected response: {0}")]
  Decode(String),
}

/// Anything that can turn a slug into a problem record.
#[async_trait]
pub trait ProblemSource: Send + Sync {
  async fn fetch_problem(&self, slug: &str) -> Result<ProblemRecord, FetchError>;
}

#[derive(Clone)]
pub struct LeetCodeClient {
  pub client: reqwest::Client,
  pub endpoint: String,
}

impl LeetCodeClient {
  pub fn new(api: &ApiSettings) -> Result<Self, FetchError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(api.timeout_secs))
      .build()
      .map_err(|e| FetchError::Transport(e.to_string()))?;
    Ok(Self { client, endpoint: api.endpoint.clone() })
  }
}

#[async_trait]
impl ProblemSource for LeetCodeClient {
  #[instrument(level = "info", skip(self), fields(endpoint = %self.endpoint))]
  async fn fetch_problem(&self, slug: &str) -> Result<ProblemRecord, FetchError> {
    let req = GraphQlRequest {
      query: QUESTION_QUERY,
      variables: Variables { title_slug: slug },
    };

    let start = Instant::now();
    let res = self.client.post(&self.endpoint)
      .header(USER_AGENT, "leetnote/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(&req).send().await.map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      warn!(%status, body = %trunc_for_log(&body, 200), "LeetCode returned non-success status");
      return Err(FetchError::Status(status.as_u16()));
    }

    let text = res.text().await.map_err(|e| FetchError::Transport(e.to_string()))?;
    info!(elapsed = ?start.elapsed(), bytes = text.len(), "LeetCode response received");

    let body: GraphQlResponse = serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))?;
    record_from_response(body, slug)
  }
}

/// Map a decoded GraphQL answer to a record. `requested_slug` backs up an empty `titleSlug`.
pub fn record_from_response(body: GraphQlResponse, requested_slug: &str) -> Result<ProblemRecord, FetchError> {
  if let Some(errors) = body.errors.filter(has_errors) {
    return Err(FetchError::Api(errors.to_string()));
  }

  let q = body.data.and_then(|d| d.question).ok_or(FetchError::NotFound)?;

  let stats = q.stats.unwrap_or_default();
  let slug = if q.title_slug.is_empty() { requested_slug.to_string() } else { q.title_slug };

  Ok(ProblemRecord {
    id: q.question_id,
    display_id: q.question_frontend_id,
    title: q.title,
    slug,
    difficulty: q.difficulty.unwrap_or_default(),
    description_markup: q.content.unwrap_or_default(),
    topic_tags: q.topic_tags.unwrap_or_default().into_iter().map(|t| t.name).collect(),
    code_templates: q
      .code_snippets
      .unwrap_or_default()
      .into_iter()
      .map(|s| CodeTemplate { lang_slug: s.lang_slug, lang_label: s.lang, code: s.code })
      .collect(),
    hints: q.hints.unwrap_or_default(),
    example_input: q.example_testcases.unwrap_or_default(),
    acceptance_rate: acceptance_rate(&stats),
    stats,
    similar_questions: q.similar_questions.unwrap_or_else(|| "[]".into()),
    company_tags: Vec::new(),
  })
}

fn has_errors(errors: &Value) -> bool {
  match errors {
    Value::Null => false,
    Value::Array(items) => !items.is_empty(),
    _ => true,
  }
}

/// `acRate` out of the JSON-encoded stats blob. Anything unparseable is 0.
pub fn acceptance_rate(stats: &str) -> f64 {
  #[derive(Deserialize)]
  struct Stats {
    #[serde(rename = "acRate", default)]
    ac_rate: Option<Value>,
  }

  let rate = serde_json::from_str::<Stats>(stats)
    .ok()
    .and_then(|s| s.ac_rate)
    .and_then(|v| match v {
      Value::Number(n) => n.as_f64(),
      Value::String(s) => leading_number(&s),
      _ => None,
    })
    .unwrap_or(0.0);

  if rate.is_finite() { rate } else { 0.0 }
}

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number pattern")
});

/// Parse the numeric prefix of `s` ("49.1%" -> 49.1).
fn leading_number(s: &str) -> Option<f64> {
  LEADING_NUMBER.find(s).and_then(|m| m.as_str().trim().parse().ok())
}

// --- GraphQL DTOs ---

#[derive(Serialize)]
struct GraphQlRequest<'a> {
  query: &'a str,
  variables: Variables<'a>,
}
#[derive(Serialize)]
struct Variables<'a> {
  #[serde(rename = "titleSlug")]
  title_slug: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
  #[serde(default)] data: Option<QuestionData>,
  #[serde(default)] errors: Option<Value>,
}
#[derive(Debug, Deserialize)]
struct QuestionData {
  #[serde(default)] question: Option<QuestionDto>,
}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDto {
  question_id: String,
  question_frontend_id: String,
  title: String,
  #[serde(default)] title_slug: String,
  #[serde(default)] content: Option<String>,
  #[serde(default)] difficulty: Option<String>,
  #[serde(default)] example_testcases: Option<String>,
  #[serde(default)] topic_tags: Option<Vec<TopicTagDto>>,
  #[serde(default)] code_snippets: Option<Vec<CodeSnippetDto>>,
  #[serde(default)] stats: Option<String>,
  #[serde(default)] hints: Option<Vec<String>>,
  #[serde(default)] similar_questions: Option<String>,
}
#[derive(Debug, Deserialize)]
struct TopicTagDto {
  name: String,
  #[serde(default, rename = "slug")] _slug: Option<String>,
}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeSnippetDto { lang: String, lang_slug: String, code: String }
