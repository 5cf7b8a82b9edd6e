//! Simulation configuration with documented defaults
//!
//! Loaded once at startup from an optional TOML file. Every field has a
//! default so a partial (or missing) file still yields a runnable setup.

use crate::core::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Highest accepted DDIL severity
pub const MAX_DDIL_LEVEL: i32 = 10;

/// Scenario metadata shown to every decision unit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: String,
    /// Coordinates or a place name
    pub location: String,
    /// Free-text description of the starting situation
    pub situation: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: "Border Skirmish".to_string(),
            location: "Grid 38T LP 12345 67890".to_string(),
            situation: "Red force probes a Blue defensive line at dawn.".to_string(),
        }
    }
}

/// Settings for the chat-completion endpoint
///
/// The API key is never stored here; it is read from `LLM_API_KEY`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o".to_string(),
            max_tokens: 512,
        }
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub scenario: ScenarioConfig,

    /// Subordinate units created for each side
    pub num_units: usize,

    /// Ticks executed by a full run
    pub num_ticks: u64,

    /// Real-time pause between ticks (milliseconds)
    ///
    /// Purely cosmetic pacing for the terminal feed; tests use 0.
    pub tick_duration_ms: u64,

    /// DDIL severity applied to the outgoing feed
    ///
    /// Each level adds 10% drop and redaction chance, saturating at 50%
    /// from level 5 upward. Zero leaves the feed untouched.
    pub ddil_level: i32,

    /// Seed for unit placement and movement; random when absent
    pub seed: Option<u64>,

    /// Dispatch subordinate decisions concurrently within a side
    ///
    /// Results are still merged in creation order.
    pub parallel_decisions: bool,

    pub llm: LlmConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scenario: ScenarioConfig::default(),
            num_units: 4,
            num_ticks: 10,
            tick_duration_ms: 2000,
            ddil_level: 2,
            seed: None,
            parallel_decisions: false,
            llm: LlmConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded simulation config");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.num_ticks == 0 {
            return Err(SimError::Config("num_ticks must be at least 1".into()));
        }

        if !(0..=MAX_DDIL_LEVEL).contains(&self.ddil_level) {
            return Err(SimError::Config(format!(
                "ddil_level ({}) must be within 0..={}",
                self.ddil_level, MAX_DDIL_LEVEL
            )));
        }

        if self.llm.model.trim().is_empty() {
            return Err(SimError::Config("llm.model must not be empty".into()));
        }

        Ok(())
    }
}
