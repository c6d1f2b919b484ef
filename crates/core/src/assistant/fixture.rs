use crate::assistant::intent::Intent;
use crate::assistant::reference::{validate_lockstep, Reference};
use crate::error::ReferenceError;
use anyhow::{bail, Context};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::OnceLock;

fn slot_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\d+)\}").expect("slot pattern compiles"))
}

/// The canned response table the assistant answers from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantFixture {
    pub first_token_latency_ms: u64,
    pub responses: Vec<ResponseTemplate>,
}

/// Prose with positional citation slots (`{0}`, `{1}`, ...) that index into
/// `citations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseTemplate {
    pub intent: Intent,
    pub text: String,
    #[serde(default)]
    pub citations: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResponse {
    pub text: String,
    /// Citations in order of first use.
    pub references: Vec<Reference>,
}

impl ResponseTemplate {
    fn slots(&self) -> Vec<usize> {
        slot_regex()
            .captures_iter(&self.text)
            .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
            .collect()
    }

    /// Every slot must name an existing citation and every citation must be used.
    pub fn validate(&self) -> Result<(), ReferenceError> {
        let slots = self.slots();
        for &slot in &slots {
            if slot >= self.citations.len() {
                return Err(ReferenceError::UnknownSlot {
                    slot,
                    available: self.citations.len(),
                });
            }
        }

        let used: BTreeSet<usize> = slots.into_iter().collect();
        for (index, citation) in self.citations.iter().enumerate() {
            if !used.contains(&index) {
                return Err(ReferenceError::UnusedCitation {
                    index,
                    reference: citation.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Replaces each slot with its `[REF:kind:id]` token and mirrors the
    /// citations into the reference list. The result is checked in lock-step.
    pub fn render(&self) -> Result<RenderedResponse, ReferenceError> {
        self.validate()?;

        let mut references: Vec<Reference> = Vec::with_capacity(self.citations.len());
        for slot in self.slots() {
            let citation = &self.citations[slot];
            if !references.contains(citation) {
                references.push(citation.clone());
            }
        }

        let text = slot_regex()
            .replace_all(&self.text, |caps: &regex_lite::Captures<'_>| {
                caps.get(1)
                    .and_then(|m| m.as_str().parse::<usize>().ok())
                    .and_then(|slot| self.citations.get(slot))
                    .map(Reference::token)
                    .unwrap_or_default()
            })
            .into_owned();

        validate_lockstep(&text, &references)?;
        Ok(RenderedResponse { text, references })
    }
}

impl AssistantFixture {
    /// Intents must be unique, a `general` fallback must exist, and every
    /// template must render cleanly.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = BTreeSet::new();
        for template in &self.responses {
            if !seen.insert(template.intent) {
                bail!("duplicate response template for intent {:?}", template.intent);
            }
            template
                .render()
                .with_context(|| format!("invalid response template for intent {:?}", template.intent))?;
        }

        if !seen.contains(&Intent::General) {
            bail!("fixture must contain a response template for the general intent");
        }
        Ok(())
    }

    /// The template for `intent`, falling back to the general one.
    pub fn template_for(&self, intent: Intent) -> Option<&ResponseTemplate> {
        self.responses
            .iter()
            .find(|t| t.intent == intent)
            .or_else(|| self.responses.iter().find(|t| t.intent == Intent::General))
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let fixture = serde_json::from_str::<AssistantFixture>(json)
            .context("assistant fixture is not valid JSON for the fixture schema")?;
        fixture.validate()?;
        Ok(fixture)
    }
}

#[async_trait::async_trait]
pub trait FixtureSource: Send + Sync {
    fn describe(&self) -> String;

    async fn load(&self) -> anyhow::Result<AssistantFixture>;
}

/// Reads and validates the fixture from disk on every load.
#[derive(Debug, Clone)]
pub struct FileFixtureSource {
    path: PathBuf,
}

impl FileFixtureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl FixtureSource for FileFixtureSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn load(&self) -> anyhow::Result<AssistantFixture> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read assistant fixture {}", self.path.display()))?;
        AssistantFixture::from_json(&text)
            .with_context(|| format!("failed to load assistant fixture {}", self.path.display()))
    }
}
