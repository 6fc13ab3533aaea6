use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{CacheKey, TtlCache};
use crate::dataforseo::{first_result, DataForSeoClient};
use crate::error::{DataForSeoError, Result};

const CONTENT_PARSING_PATH: &str = "/v3/on_page/content_parsing/live";

/// Upper bound, in characters, on the text kept per page.
pub const MAX_EXTRACTED_CHARS: usize = 4000;

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Main text of the page at `url`; empty when it could not be extracted.
    async fn extract_text(&self, url: &str) -> String;
}

pub struct ContentExtractor {
    api: DataForSeoClient,
    cache: Arc<TtlCache<String>>,
}

impl ContentExtractor {
    pub fn new(api: DataForSeoClient, cache: Arc<TtlCache<String>>) -> Self {
        Self { api, cache }
    }

    pub async fn try_extract_text(&self, url: &str) -> Result<String> {
        let key = CacheKey::new("content", [url, self.api.encoded_credentials()]);
        if let Some(text) = self.cache.get(&key) {
            debug!(url, "content cache hit");
            return Ok(text);
        }

        let task = json!({
            "url": url,
            "enable_javascript": true,
            "enable_browser_rendering": true,
        });

        let data = self.api.post_task(CONTENT_PARSING_PATH, task).await?;
        let text = primary_content_text(&data)?;

        self.cache.insert(key, text.clone());
        Ok(text)
    }
}

#[async_trait]
impl ContentSource for ContentExtractor {
    async fn extract_text(&self, url: &str) -> String {
        match self.try_extract_text(url).await {
            Ok(text) => text,
            Err(e) => {
                warn!(url, error = %e, "content extraction failed, using empty text");
                String::new()
            }
        }
    }
}

/// Join every `main_topic[].primary_content[].text` fragment of the first
/// parsed page, each followed by a space, and cut to `MAX_EXTRACTED_CHARS`.
fn primary_content_text(data: &Value) -> Result<String> {
    let page = first_result(data)?
        .get("items")
        .and_then(|items| items.get(0))
        .and_then(|item| item.get("page_content"))
        .filter(|page| page.is_object())
        .ok_or(DataForSeoError::MissingField("items[0].page_content"))?;

    let mut text = String::new();
    let topics = page
        .get("main_topic")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for topic in topics {
        let fragments = topic
            .get("primary_content")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for fragment in fragments {
            if let Some(t) = fragment.get("text").and_then(Value::as_str) {
                if !t.is_empty() {
                    text.push_str(t);
                    text.push(' ');
                }
            }
        }
    }

    Ok(truncate_chars(&text, MAX_EXTRACTED_CHARS))
}

/// First `max` characters of `text`, never splitting a UTF-8 sequence.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
