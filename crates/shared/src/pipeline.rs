use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::info;

use crate::extractor::ContentSource;
use crate::llm::ChatModel;
use crate::models::{EditorialPlan, PlanRequest, PlanRow, SourceMode};
use crate::posts::{PostBrief, PostGenerator};
use crate::serp::SearchProvider;
use crate::session::Session;
use crate::summarizer::Summarizer;

pub const MIN_POSTS_PER_TOPIC: u8 = 1;
pub const MAX_POSTS_PER_TOPIC: u8 = 20;

/// One topic per line; surrounding whitespace trimmed, blank lines dropped.
pub fn parse_topics(input: &str) -> Vec<String> {
    clean_topics(input.lines())
}

pub fn clean_topics<I, S>(topics: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    topics
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn build_query(topic: &str, website: &str, mode: SourceMode) -> String {
    match mode {
        SourceMode::Site => format!("{} site:{}", topic, website),
        SourceMode::Web => topic.to_string(),
    }
}

/// Runs search, extraction, summary and post generation for every topic.
pub struct EditorialPlanner {
    search: Arc<dyn SearchProvider>,
    content: Arc<dyn ContentSource>,
    summarizer: Summarizer,
    posts: PostGenerator,
}

impl EditorialPlanner {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        content: Arc<dyn ContentSource>,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            search,
            content,
            summarizer: Summarizer::new(model.clone()),
            posts: PostGenerator::new(model),
        }
    }

    /// Build the whole plan. Topics are handled one after another and the
    /// first error aborts the run, so a plan is either complete or absent.
    pub async fn run(&self, session: &Session, request: &PlanRequest) -> Result<EditorialPlan> {
        if !session.is_authenticated() {
            bail!("Accesso negato: sessione non autenticata");
        }

        if !(MIN_POSTS_PER_TOPIC..=MAX_POSTS_PER_TOPIC).contains(&request.posts_per_topic) {
            bail!(
                "Numero post per argomento deve essere tra {} e {} (ricevuto {})",
                MIN_POSTS_PER_TOPIC,
                MAX_POSTS_PER_TOPIC,
                request.posts_per_topic
            );
        }

        let topics = clean_topics(&request.topics);
        if topics.is_empty() {
            bail!("Inserisci almeno un argomento");
        }

        let mut rows = Vec::new();
        for topic in &topics {
            rows.extend(self.plan_topic(request, topic).await?);
        }

        Ok(EditorialPlan::new(rows))
    }

    async fn plan_topic(&self, request: &PlanRequest, topic: &str) -> Result<Vec<PlanRow>> {
        let query = build_query(topic, &request.website, request.source_mode);
        info!(topic, %query, "planning topic");

        let serp = self.search.fetch_serp(&query).await;

        let mut sources_text = String::new();
        let mut source_urls = Vec::with_capacity(serp.len());
        for result in &serp {
            source_urls.push(result.url.clone());
            sources_text.push_str(&self.content.extract_text(&result.url).await);
            sources_text.push('\n');
        }

        let summary = self.summarizer.summarize(topic, &sources_text).await?;

        let brief = PostBrief {
            business: &request.business,
            sector: &request.sector,
            topic,
            brief: &request.brief,
            summary: &summary,
        };
        let posts = self
            .posts
            .generate_posts(brief, request.posts_per_topic)
            .await?
            .into_posts();

        info!(topic, sources = source_urls.len(), posts = posts.len(), "topic done");

        Ok(posts
            .iter()
            .map(|post| PlanRow::new(topic, &source_urls, post))
            .collect())
    }
}
