use serde::{Deserialize, Serialize};

/// One organic search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
}

impl SearchResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Where the source material for a topic comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// Restrict the search to the business website with `site:`.
    #[default]
    Site,
    /// Plain web query on the topic.
    Web,
}

/// Everything the user fills in before a run.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub business: String,
    pub sector: String,
    pub website: String,
    pub topics: Vec<String>,
    pub posts_per_topic: u8,
    pub brief: String,
    pub source_mode: SourceMode,
}

/// Spreadsheet column headers, in column order.
pub const PLAN_COLUMNS: [&str; 5] = [
    "Data pubblicazione",
    "Argomento",
    "Fonte",
    "Contenuto post",
    "Immagine",
];

/// One generated post in the editorial plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRow {
    #[serde(rename = "Data pubblicazione")]
    pub publish_date: String,
    #[serde(rename = "Argomento")]
    pub topic: String,
    #[serde(rename = "Fonte")]
    pub sources: String,
    #[serde(rename = "Contenuto post")]
    pub post_content: String,
    #[serde(rename = "Immagine")]
    pub image: String,
}

impl PlanRow {
    /// Publish date and image are left blank for the editor to fill in.
    pub fn new(topic: &str, source_urls: &[String], post: &str) -> Self {
        Self {
            publish_date: String::new(),
            topic: topic.to_string(),
            sources: source_urls.join(", "),
            post_content: post.trim().to_string(),
            image: String::new(),
        }
    }

    /// Cell values in `PLAN_COLUMNS` order.
    pub fn cells(&self) -> [&str; 5] {
        [
            self.publish_date.as_str(),
            self.topic.as_str(),
            self.sources.as_str(),
            self.post_content.as_str(),
            self.image.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorialPlan {
    pub rows: Vec<PlanRow>,
}

impl EditorialPlan {
    pub fn new(rows: Vec<PlanRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
