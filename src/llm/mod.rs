//! Decision service layer: HTTP client, service trait, and prompt builders

pub mod client;
pub mod prompt;
pub mod service;

pub use client::LlmClient;
pub use service::{DecisionService, LlmDecisionService, ScriptedService, UnavailableService};
