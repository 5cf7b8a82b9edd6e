//! Decision service seam between the simulation core and text generation
//!
//! The core only sees [`DecisionService`]: one prompt in, one completion
//! out, or a [`DecisionServiceError`]. Callers never retry.

use crate::core::error::DecisionServiceError;
use crate::llm::client::LlmClient;
use tokio::runtime::Runtime;

/// System prompt sent with every live decision request
pub const DECISION_SYSTEM_PROMPT: &str = "You are a military unit in a tactical \
    training simulation. Answer with one short paragraph describing the action you \
    take this turn. Do not use lists or headings.";

/// Turns a textual prompt into a natural-language decision
///
/// `Send + Sync` so a force can dispatch subordinate decisions in parallel.
pub trait DecisionService: Send + Sync {
    fn decide(&self, prompt: &str) -> Result<String, DecisionServiceError>;
}

/// Live backend: blocks on the async [`LlmClient`] for each decision
pub struct LlmDecisionService {
    client: LlmClient,
    runtime: Runtime,
}

impl LlmDecisionService {
    pub fn new(client: LlmClient) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(Self { client, runtime })
    }
}

impl DecisionService for LlmDecisionService {
    fn decide(&self, prompt: &str) -> Result<String, DecisionServiceError> {
        let text = self
            .runtime
            .block_on(self.client.complete(DECISION_SYSTEM_PROMPT, prompt))
            .map_err(|e| DecisionServiceError::Request(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(DecisionServiceError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Backend used when no credentials are configured; every call fails
#[derive(Debug, Clone)]
pub struct UnavailableService {
    reason: String,
}

impl UnavailableService {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl DecisionService for UnavailableService {
    fn decide(&self, _prompt: &str) -> Result<String, DecisionServiceError> {
        Err(DecisionServiceError::Unavailable(self.reason.clone()))
    }
}

type ScriptFn = dyn Fn(&str) -> Result<String, DecisionServiceError> + Send + Sync;

/// Deterministic backend driven by a fixed reply or a closure over the prompt
pub struct ScriptedService {
    script: Box<ScriptFn>,
}

impl ScriptedService {
    /// Reply with the same text to every prompt
    pub fn constant(reply: impl Into<String>) -> Self {
        let reply = reply.into();
        Self::from_fn(move |_| Ok(reply.clone()))
    }

    pub fn from_fn<F>(script: F) -> Self
    where
        F: Fn(&str) -> Result<String, DecisionServiceError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
        }
    }
}

impl DecisionService for ScriptedService {
    fn decide(&self, prompt: &str) -> Result<String, DecisionServiceError> {
        (self.script)(prompt)
    }
}
