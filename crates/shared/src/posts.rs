use anyhow::{Context, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use crate::llm::ChatModel;

const POSTS_MAX_TOKENS: u32 = 2000;
const POSTS_TEMPERATURE: f32 = 0.7;

/// Matches the "POST 1:" / "POST 2-" markers models fall back to when they
/// ignore the JSON instruction.
static POST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"POST\s*\d+[:\-]").expect("valid post marker regex"));

/// How the model reply was turned into posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPosts {
    /// The reply was the requested `{"posts": [...]}` object.
    Json(Vec<String>),
    /// The reply was split on `POST n:` markers.
    FallbackSplit(Vec<String>),
    /// Nothing usable in the reply.
    Unparseable,
}

impl ParsedPosts {
    pub fn into_posts(self) -> Vec<String> {
        match self {
            ParsedPosts::Json(posts) | ParsedPosts::FallbackSplit(posts) => posts,
            ParsedPosts::Unparseable => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ParsedPosts::Json(posts) | ParsedPosts::FallbackSplit(posts) => posts.len(),
            ParsedPosts::Unparseable => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a model reply: strict JSON first, then the `POST n:` split.
pub fn parse_posts(reply: &str) -> ParsedPosts {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(strip_code_fence(reply)) {
        let posts: Vec<String> = map
            .get("posts")
            .and_then(Value::as_array)
            .map(|posts| {
                posts
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        return ParsedPosts::Json(posts);
    }

    let fragments: Vec<String> = POST_MARKER
        .split(reply)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();

    if fragments.is_empty() {
        ParsedPosts::Unparseable
    } else {
        ParsedPosts::FallbackSplit(fragments)
    }
}

/// Body of a reply wrapped in a Markdown code fence, or the reply unchanged.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return reply;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return reply;
    };
    // Drop the info string ("json") on the opening fence line
    match body.split_once('\n') {
        Some((_, inner)) => inner,
        None => body,
    }
}

/// Everything about the business the posts are written for.
#[derive(Debug, Clone, Copy)]
pub struct PostBrief<'a> {
    pub business: &'a str,
    pub sector: &'a str,
    pub topic: &'a str,
    pub brief: &'a str,
    pub summary: &'a str,
}

/// Writes Google Business Profile posts from a topic summary.
pub struct PostGenerator {
    model: Arc<dyn ChatModel>,
}

impl PostGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Ask for `n_posts` posts. The count is requested, not enforced.
    pub async fn generate_posts(&self, input: PostBrief<'_>, n_posts: u8) -> Result<ParsedPosts> {
        let prompt = Self::build_prompt(input, n_posts);

        let reply = self
            .model
            .complete(&prompt, POSTS_MAX_TOKENS, POSTS_TEMPERATURE)
            .await
            .with_context(|| format!("Failed to generate posts for \"{}\"", input.topic))?;

        let parsed = parse_posts(&reply);
        match &parsed {
            ParsedPosts::Json(posts) => {
                debug!(topic = input.topic, count = posts.len(), "posts parsed from JSON")
            }
            ParsedPosts::FallbackSplit(posts) => warn!(
                topic = input.topic,
                count = posts.len(),
                "reply was not JSON, split on POST markers"
            ),
            ParsedPosts::Unparseable => {
                warn!(topic = input.topic, "reply contained no usable posts")
            }
        }

        Ok(parsed)
    }

    fn build_prompt(input: PostBrief<'_>, n_posts: u8) -> String {
        format!(
            r#"
Sei un copywriter Local SEO esperto.
Genera {n_posts} post per Google Business Profile.

Azienda: {business}
Settore: {sector}
Argomento: {topic}
Brief aggiuntivo: {brief}
Informazioni di riferimento: {summary}

Regole:
- 80-120 parole
- tono professionale
- CTA locale soft (contattaci, vieni in sede, ecc.)
- nessuna frase generica

Rispondi SOLO in JSON:
{{
  "posts": ["testo post 1", "testo post 2", ...]
}}
"#,
            business = input.business,
            sector = input.sector,
            topic = input.topic,
            brief = input.brief,
            summary = input.summary,
        )
    }
}
