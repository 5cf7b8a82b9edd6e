//! Shared scenario state owned by the coordinator

use crate::core::config::ScenarioConfig;
use crate::core::types::Tick;
use serde::Serialize;

/// Scenario metadata plus the global tick counter
///
/// Units only ever see a shared borrow; the counter is advanced
/// exclusively by [`crate::simulation::Coordinator::advance`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioState {
    pub scenario: String,
    pub location: String,
    pub situation: String,
    tick: Tick,
}

impl ScenarioState {
    pub fn new(
        scenario: impl Into<String>,
        location: impl Into<String>,
        situation: impl Into<String>,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            location: location.into(),
            situation: situation.into(),
            tick: 0,
        }
    }

    pub fn from_config(config: &ScenarioConfig) -> Self {
        Self::new(&config.name, &config.location, &config.situation)
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Move to the next tick and return its number
    pub(crate) fn next_tick(&mut self) -> Tick {
        self.tick += 1;
        self.tick
    }
}
