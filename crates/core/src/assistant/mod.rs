pub mod fixture;
pub mod intent;
pub mod reference;
pub mod stream;

use crate::assistant::fixture::AssistantFixture;
use crate::assistant::intent::Intent;
use crate::assistant::reference::Reference;
use crate::error::PromptError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PROMPT_MAX_CHARS: usize = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantRequest {
    pub prompt: String,
}

impl AssistantRequest {
    /// The trimmed prompt, 1..=1000 characters.
    pub fn validated_prompt(&self) -> Result<&str, PromptError> {
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(PromptError::Empty);
        }
        let len = prompt.chars().count();
        if len > PROMPT_MAX_CHARS {
            return Err(PromptError::TooLong {
                len,
                max: PROMPT_MAX_CHARS,
            });
        }
        Ok(prompt)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub interaction_id: Uuid,
    pub response: String,
    pub references: Vec<Reference>,
    pub first_token_latency_ms: u64,
}

/// Classifies the prompt, renders the matching template and checks the
/// citation tokens against the reference list before handing it back.
pub fn compose_reply(fixture: &AssistantFixture, prompt: &str) -> anyhow::Result<AssistantReply> {
    let intent = Intent::classify(prompt);
    let template = fixture
        .template_for(intent)
        .with_context(|| format!("no response template for intent {intent:?}"))?;
    let rendered = template
        .render()
        .with_context(|| format!("response template for intent {intent:?} failed to render"))?;

    let reply = AssistantReply {
        interaction_id: Uuid::new_v4(),
        response: rendered.text,
        references: rendered.references,
        first_token_latency_ms: fixture.first_token_latency_ms,
    };

    tracing::debug!(
        interaction_id = %reply.interaction_id,
        ?intent,
        references = reply.references.len(),
        "composed assistant reply"
    );
    Ok(reply)
}
