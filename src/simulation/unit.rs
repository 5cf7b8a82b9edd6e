//! Subordinate decision unit (squad level)
//!
//! Each unit asks the decision service for one action per tick, applies
//! the placeholder movement model to its position, and keeps an
//! append-only context history that feeds later prompts.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::error::Result;
use crate::core::types::{Side, Vec2};
use crate::llm::prompt::{UnitPrompt, CONTEXT_WINDOW};
use crate::llm::service::DecisionService;
use crate::simulation::event::{self, Event};
use crate::simulation::state::ScenarioState;

pub const SQUAD_ROLE: &str = "Squad Commander";
pub const READY_STATUS: &str = "Ready";

/// Substrings (lowercase) that mark a decision as a movement order
const MOVEMENT_TOKENS: [&str; 2] = ["advance", "move"];

/// Starting coordinates are drawn from 0..=MAX_START_COORD on each axis
const MAX_START_COORD: i32 = 100;

/// Per-tick displacement range, applied equally to both axes
const MIN_STEP: i32 = 1;
const MAX_STEP: i32 = 10;

/// A single squad-level decision maker
#[derive(Debug, Clone)]
pub struct DecisionUnit {
    id: String,
    role: String,
    position: Vec2,
    status: String,
    context: Vec<String>,
    rng: ChaCha8Rng,
}

impl DecisionUnit {
    /// Create a unit at a random integer position
    pub fn new(id: impl Into<String>, role: impl Into<String>, mut rng: ChaCha8Rng) -> Self {
        let position = Vec2::new(
            rng.gen_range(0..=MAX_START_COORD) as f32,
            rng.gen_range(0..=MAX_START_COORD) as f32,
        );
        Self::with_position(id, role, position, rng)
    }

    pub fn with_position(
        id: impl Into<String>,
        role: impl Into<String>,
        position: Vec2,
        rng: ChaCha8Rng,
    ) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            position,
            status: READY_STATUS.to_string(),
            context: Vec::new(),
            rng,
        }
    }

    /// Stable identifier for the `index`-th (1-based) squad of a side
    pub fn squad_id(side: Side, index: usize) -> String {
        format!("{}_Squad_{}", side, index)
    }

    /// Convenience constructor seeded directly from a `u64`
    pub fn seeded(id: impl Into<String>, seed: u64) -> Self {
        Self::new(id, SQUAD_ROLE, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Full context history, oldest first
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// The entries used when building the next prompt
    pub fn recent_context(&self) -> &[String] {
        let start = self.context.len().saturating_sub(CONTEXT_WINDOW);
        &self.context[start..]
    }

    /// Produce this unit's decision event for the current tick
    ///
    /// A decision service failure is not an error here: the placeholder
    /// text becomes the decision and the unit still completes its turn.
    /// `Err` is reserved for failures in the unit's own logic.
    pub fn advance(
        &mut self,
        state: &ScenarioState,
        service: &dyn DecisionService,
    ) -> Result<Event> {
        let prompt = UnitPrompt {
            unit_id: &self.id,
            role: &self.role,
            position: self.position,
            status: &self.status,
            state,
            recent_context: self.recent_context(),
        }
        .render()?;

        let outcome = service.decide(&prompt);
        if let Err(e) = &outcome {
            tracing::warn!(unit = %self.id, tick = state.tick(), error = %e, "decision service failed");
        }

        let mut decision = event::decision_text(&outcome);
        self.apply_movement(&mut decision);

        tracing::debug!(unit = %self.id, tick = state.tick(), %decision, "unit decided");

        let event = event::unit_decision(&self.id, &decision);
        self.context.push(decision);
        Ok(event)
    }

    /// Append a message (e.g. a direct order) to the context verbatim
    pub fn receive_message(&mut self, text: impl Into<String>) {
        self.context.push(text.into());
    }

    /// Placeholder consequence model: keyword-triggered diagonal step
    fn apply_movement(&mut self, decision: &mut String) {
        let lower = decision.to_lowercase();
        if MOVEMENT_TOKENS.iter().any(|t| lower.contains(t)) {
            let delta = self.rng.gen_range(MIN_STEP..=MAX_STEP) as f32;
            let old = self.position;
            self.position = old.offset_diagonal(delta);
            decision.push_str(&format!(
                " [Movement: position updated from {} to {}].",
                old, self.position
            ));
        } else {
            decision.push_str(" [No movement executed].");
        }
    }
}
