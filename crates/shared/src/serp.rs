use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{CacheKey, TtlCache};
use crate::dataforseo::{first_result, DataForSeoClient};
use crate::error::{DataForSeoError, Result};
use crate::models::SearchResult;

const SERP_PATH: &str = "/v3/serp/google/organic/live/advanced";

/// Number of organic results kept per query.
pub const SERP_DEPTH: usize = 5;

/// Italy, Italian, desktop Windows.
const LOCATION_CODE: u32 = 2380;
const LANGUAGE_CODE: &str = "it";
const DEVICE: &str = "desktop";
const OS: &str = "windows";

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Top organic results for `query`. Failures come back as an empty list.
    async fn fetch_serp(&self, query: &str) -> Vec<SearchResult>;
}

pub struct SerpClient {
    api: DataForSeoClient,
    cache: Arc<TtlCache<Vec<SearchResult>>>,
    depth: usize,
}

impl SerpClient {
    pub fn new(api: DataForSeoClient, cache: Arc<TtlCache<Vec<SearchResult>>>) -> Self {
        Self {
            api,
            cache,
            depth: SERP_DEPTH,
        }
    }

    /// Like `fetch_serp` but keeps the reason a lookup failed.
    pub async fn try_fetch_serp(&self, query: &str) -> Result<Vec<SearchResult>> {
        let key = CacheKey::new("serp", [query, self.api.encoded_credentials()]);
        if let Some(results) = self.cache.get(&key) {
            debug!(query, "SERP cache hit");
            return Ok(results);
        }

        let task = json!({
            "keyword": query,
            "location_code": LOCATION_CODE,
            "language_code": LANGUAGE_CODE,
            "device": DEVICE,
            "os": OS,
            "depth": self.depth,
        });

        let data = self.api.post_task(SERP_PATH, task).await?;
        let results = parse_organic_results(&data, self.depth)?;

        self.cache.insert(key, results.clone());
        Ok(results)
    }
}

#[async_trait]
impl SearchProvider for SerpClient {
    async fn fetch_serp(&self, query: &str) -> Vec<SearchResult> {
        match self.try_fetch_serp(query).await {
            Ok(results) => results,
            Err(e) => {
                warn!(query, error = %e, "SERP lookup failed, continuing without results");
                Vec::new()
            }
        }
    }
}

/// Organic items of `tasks[0].result[0].items`, at most `depth` of them.
fn parse_organic_results(data: &Value, depth: usize) -> Result<Vec<SearchResult>> {
    let result = first_result(data)?;

    // No items at all is a legitimate "nothing found"
    let items = match result.get("items") {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(_) => return Err(DataForSeoError::MissingField("items")),
    };

    Ok(items
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("organic"))
        .filter_map(|item| item.get("url").and_then(Value::as_str))
        .map(SearchResult::new)
        .take(depth)
        .collect())
}
