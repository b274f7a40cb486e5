//! Script selection backed by Gemini.

use async_trait::async_trait;
use rand::prelude::IndexedRandom;
use tracing::{info, warn};

use reel_ai_client::GeminiClient;

use crate::error::{StageError, StageResult};
use crate::ports::{Script, ScriptSelector};
use crate::script::{build_prompt, fit_sentences, parse_script};

pub struct GeminiScriptSelector {
    client: GeminiClient,
    sentence_count: usize,
}

impl GeminiScriptSelector {
    pub fn new(client: GeminiClient, sentence_count: usize) -> Self {
        Self {
            client,
            sentence_count,
        }
    }
}

#[async_trait]
impl ScriptSelector for GeminiScriptSelector {
    async fn select_and_generate(
        &self,
        topics: &[String],
        used_topics: &[String],
    ) -> StageResult<Script> {
        let topic = {
            let mut rng = rand::rng();
            topics
                .choose(&mut rng)
                .cloned()
                .ok_or_else(|| StageError::fatal("no topics to choose from"))?
        };

        let prompt = build_prompt(&topic, used_topics, self.sentence_count);
        let reply = self.client.generate_text(&prompt).await?;
        let parsed = parse_script(reply.trim());

        if parsed.sentences.len() != self.sentence_count {
            warn!(
                "Script for '{}' has {} sentences, expected {}",
                topic,
                parsed.sentences.len(),
                self.sentence_count
            );
        }

        let title = parsed.title.unwrap_or_else(|| topic.clone());
        info!("Script ready for '{}': {}", topic, title);

        Ok(Script {
            sentences: fit_sentences(parsed.sentences, self.sentence_count, &topic),
            title,
            topic,
        })
    }
}
