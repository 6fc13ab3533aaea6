use anyhow::{Context, Result};
use std::sync::Arc;

use crate::llm::ChatModel;

const SUMMARY_MAX_TOKENS: u32 = 1200;
const SUMMARY_TEMPERATURE: f32 = 0.5;

/// Condenses the text scraped for a topic into a short Italian brief.
pub struct Summarizer {
    model: Arc<dyn ChatModel>,
}

impl Summarizer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// The reply is used verbatim; its shape is not checked.
    pub async fn summarize(&self, topic: &str, sources_text: &str) -> Result<String> {
        let prompt = Self::build_prompt(topic, sources_text);

        self.model
            .complete(&prompt, SUMMARY_MAX_TOKENS, SUMMARY_TEMPERATURE)
            .await
            .with_context(|| format!("Failed to summarize sources for \"{}\"", topic))
    }

    fn build_prompt(topic: &str, sources_text: &str) -> String {
        format!(
            r#"
Sei un analista SEO. Riassumi le informazioni più utili su "{topic}" basandoti sui testi forniti.
Sintesi 150-200 parole + 3-5 punti chiave.

TESTI:
{sources_text}

OUTPUT:
1. Sintesi
2. Punti chiave (bullet)
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingModel {
        prompts: Mutex<Vec<(String, u32, f32)>>,
    }

    #[async_trait]
    impl ChatModel for RecordingModel {
        async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), max_tokens, temperature));
            Ok("1. Sintesi\n...\n2. Punti chiave\n- uno".to_string())
        }
    }

    #[test]
    fn test_prompt_mentions_topic_and_sources() {
        let prompt = Summarizer::build_prompt("caffè artigianale", "Testo della fonte");
        assert!(prompt.contains("Riassumi le informazioni più utili su \"caffè artigianale\""));
        assert!(prompt.contains("TESTI:\nTesto della fonte\n"));
        assert!(prompt.contains("Sintesi 150-200 parole + 3-5 punti chiave."));
    }

    #[tokio::test]
    async fn test_returns_model_text_verbatim() {
        let model = Arc::new(RecordingModel {
            prompts: Mutex::new(Vec::new()),
        });
        let summarizer = Summarizer::new(model.clone());

        let summary = summarizer.summarize("pizza", "fonte").await.unwrap();
        assert_eq!(summary, "1. Sintesi\n...\n2. Punti chiave\n- uno");

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].1, 1200);
        assert_eq!(prompts[0].2, 0.5);
    }
}
