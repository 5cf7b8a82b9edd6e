//! Prompt construction for subordinate and leader decisions

use crate::core::error::Result;
use crate::core::types::{Side, Tick, Vec2};
use crate::simulation::state::ScenarioState;

/// Context entries from a unit's history included in each prompt
pub const CONTEXT_WINDOW: usize = 5;

/// Everything a subordinate unit reveals about itself to the decision service
pub struct UnitPrompt<'a> {
    pub unit_id: &'a str,
    pub role: &'a str,
    pub position: Vec2,
    pub status: &'a str,
    pub state: &'a ScenarioState,
    /// Most recent context entries, oldest first
    pub recent_context: &'a [String],
}

impl UnitPrompt<'_> {
    /// Render the prompt text
    ///
    /// Fails only if the scenario snapshot cannot be serialized.
    pub fn render(&self) -> Result<String> {
        let snapshot = serde_json::to_string(self.state)?;

        let mut s = String::new();
        s.push_str(&format!("Agent ID: {}\n", self.unit_id));
        s.push_str(&format!("Role: {}\n", self.role));
        s.push_str(&format!("Current Position: {}\n", self.position));
        s.push_str(&format!("Status: {}\n", self.status));
        s.push_str(&format!("Local State: {}\n", snapshot));
        s.push_str("Past Context:\n");
        for entry in self.recent_context {
            s.push_str(entry);
            s.push('\n');
        }
        s.push_str(
            "Based on the above, decide on your next tactical action. \
             Possible actions include: advancing to a new position, holding position, \
             or engaging an enemy. Provide a concise description of the chosen action \
             and update your position if applicable.",
        );
        Ok(s)
    }
}

/// Leader prompt summarizing one tick of subordinate events
pub struct LeaderPrompt<'a> {
    pub side: Side,
    pub objective: &'a str,
    pub subordinate_events: &'a [String],
    pub tick: Tick,
}

impl LeaderPrompt<'_> {
    pub fn render(&self) -> String {
        let mut s = format!(
            "As the {} Force Leader with objective '{}', review the following events:\n",
            self.side, self.objective
        );
        for event in self.subordinate_events {
            s.push_str(&format!("- {}\n", event));
        }
        s.push_str(&format!("Current simulation tick: {}\n", self.tick));
        s.push_str(
            "Based on these events, what is the most reasonable next action for your force? \
             Provide a concise summary.",
        );
        s
    }
}
