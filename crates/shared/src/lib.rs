// Public modules
pub mod cache;
pub mod config;
pub mod dataforseo;
pub mod error;
pub mod export;
pub mod extractor;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod posts;
pub mod serp;
pub mod session;
pub mod summarizer;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use cache::{CacheKey, TtlCache, DEFAULT_TTL};
pub use config::Config;
pub use dataforseo::DataForSeoClient;
pub use error::DataForSeoError;
pub use export::{ExportFormat, PlanExporter};
pub use extractor::{ContentExtractor, ContentSource};
pub use io::{default_output_path, save_plan};
pub use llm::{ChatModel, OpenAiClient};
pub use models::{EditorialPlan, PlanRequest, PlanRow, SearchResult, SourceMode};
pub use pipeline::{parse_topics, EditorialPlanner};
pub use posts::{parse_posts, ParsedPosts, PostGenerator};
pub use serp::{SearchProvider, SerpClient};
pub use session::{AuthError, Session};
pub use summarizer::Summarizer;
