//! Force leader: one side's subordinates plus its leader decision

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::core::types::{Side, Vec2};
use crate::llm::prompt::LeaderPrompt;
use crate::llm::service::DecisionService;
use crate::simulation::event::{self, Event};
use crate::simulation::isolate::isolate;
use crate::simulation::state::ScenarioState;
use crate::simulation::unit::{DecisionUnit, SQUAD_ROLE};

/// How subordinate decisions are dispatched within a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// One decision call at a time, in creation order
    #[default]
    Sequential,
    /// Concurrent decision calls; results are merged in creation order
    Parallel,
}

/// One side's leader and its ordered subordinates
#[derive(Debug)]
pub struct ForceUnit {
    side: Side,
    objective: String,
    units: Vec<DecisionUnit>,
    log: Vec<Event>,
    dispatch: DispatchMode,
}

impl ForceUnit {
    /// Create a force with `num_units` squads named `{side}_Squad_{1..=n}`
    pub fn new(side: Side, num_units: usize, objective: impl Into<String>, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let units = (1..=num_units)
            .map(|i| {
                let unit_rng = ChaCha8Rng::seed_from_u64(rng.gen());
                DecisionUnit::new(DecisionUnit::squad_id(side, i), SQUAD_ROLE, unit_rng)
            })
            .collect();

        Self {
            side,
            objective: objective.into(),
            units,
            log: Vec::new(),
            dispatch: DispatchMode::default(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    /// Subordinates in creation order
    pub fn units(&self) -> &[DecisionUnit] {
        &self.units
    }

    /// Identity and position of every subordinate, for renderers
    pub fn positions(&self) -> Vec<(&str, Vec2)> {
        self.units.iter().map(|u| (u.id(), u.position())).collect()
    }

    /// This force's own append-only log
    pub fn log(&self) -> &[Event] {
        &self.log
    }

    pub fn dispatch(&self) -> DispatchMode {
        self.dispatch
    }

    pub fn set_dispatch(&mut self, dispatch: DispatchMode) {
        self.dispatch = dispatch;
    }

    /// Run one tick: every subordinate in order, then the leader
    ///
    /// Returns subordinate events in creation order followed by the leader
    /// event. A failing subordinate contributes one error event and the
    /// rest of the tick proceeds.
    pub fn advance(&mut self, state: &ScenarioState, service: &dyn DecisionService) -> Vec<Event> {
        let mut events = self.run_subordinates(state, service);

        let summary = self.leader_summary(&events, state, service);
        events.push(event::leader_decision(self.side, &summary));

        self.log.extend(events.iter().cloned());
        events
    }

    fn run_subordinates(
        &mut self,
        state: &ScenarioState,
        service: &dyn DecisionService,
    ) -> Vec<Event> {
        match self.dispatch {
            DispatchMode::Sequential => self
                .units
                .iter_mut()
                .map(|unit| run_unit(unit, state, service))
                .collect(),
            // indexed collect keeps creation order regardless of completion order
            DispatchMode::Parallel => self
                .units
                .par_iter_mut()
                .map(|unit| run_unit(unit, state, service))
                .collect(),
        }
    }

    fn leader_summary(
        &self,
        subordinate_events: &[Event],
        state: &ScenarioState,
        service: &dyn DecisionService,
    ) -> String {
        let prompt = LeaderPrompt {
            side: self.side,
            objective: &self.objective,
            subordinate_events,
            tick: state.tick(),
        }
        .render();

        let outcome = service.decide(&prompt);
        if let Err(e) = &outcome {
            tracing::warn!(side = %self.side, tick = state.tick(), error = %e, "leader decision failed");
        }
        event::summary_text(&outcome)
    }

    /// Log a direct order and forward it to every subordinate
    pub fn receive_order(&mut self, order: &str) {
        self.log
            .push(format!("{} Leader received direct order: {}", self.side, order));
        let message = format!("Received direct order: {}", order);
        for unit in &mut self.units {
            unit.receive_message(message.clone());
        }
        tracing::info!(side = %self.side, units = self.units.len(), "direct order propagated");
    }
}

fn run_unit(unit: &mut DecisionUnit, state: &ScenarioState, service: &dyn DecisionService) -> Event {
    let id = unit.id().to_string();
    match isolate(&id, || unit.advance(state, service)) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(unit = %id, error = %e, "unit failed during tick");
            event::unit_failure(&id, &e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DecisionServiceError;
    use crate::llm::service::ScriptedService;

    fn state() -> ScenarioState {
        ScenarioState::new("Test", "Here", "Calm")
    }

    #[test]
    fn test_creates_named_units_in_order() {
        let force = ForceUnit::new(Side::Red, 3, "Engage Blue", 42);
        let ids: Vec<&str> = force.units().iter().map(|u| u.id()).collect();
        assert_eq!(ids, ["Red_Squad_1", "Red_Squad_2", "Red_Squad_3"]);
        assert_eq!(force.positions().len(), 3);
    }

    #[test]
    fn test_same_seed_same_positions() {
        let a = ForceUnit::new(Side::Blue, 4, "Defend Position", 7);
        let b = ForceUnit::new(Side::Blue, 4, "Defend Position", 7);
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn test_advance_orders_subordinates_then_leader() {
        let mut force = ForceUnit::new(Side::Red, 2, "Engage Blue", 1);
        let service = ScriptedService::constant("Hold position");

        let events = force.advance(&state(), &service);

        assert_eq!(events.len(), 3);
        assert!(events[0].starts_with("Red_Squad_1 decision:"));
        assert!(events[1].starts_with("Red_Squad_2 decision:"));
        assert_eq!(events[2], "Red Leader Decision: Hold position");
        assert_eq!(force.log(), events.as_slice());
    }

    #[test]
    fn test_zero_units_still_yields_leader_event() {
        let mut force = ForceUnit::new(Side::Blue, 0, "Defend Position", 1);
        let events = force.advance(&state(), &ScriptedService::constant("Dig in"));
        assert_eq!(events, ["Blue Leader Decision: Dig in"]);
    }

    #[test]
    fn test_leader_prompt_sees_subordinate_events() {
        let service = ScriptedService::from_fn(|prompt| {
            if prompt.starts_with("As the Red Force Leader") {
                let listed = prompt.lines().filter(|l| l.starts_with("- Red_Squad_")).count();
                Ok(format!("saw {}", listed))
            } else {
                Ok("Hold".to_string())
            }
        });
        let mut force = ForceUnit::new(Side::Red, 3, "Engage Blue", 1);
        let events = force.advance(&state(), &service);
        assert_eq!(events.last().unwrap(), "Red Leader Decision: saw 3");
    }

    #[test]
    fn test_leader_failure_is_inline() {
        let service = ScriptedService::from_fn(|prompt| {
            if prompt.contains("Force Leader") {
                Err(DecisionServiceError::EmptyResponse)
            } else {
                Ok("Hold".to_string())
            }
        });
        let mut force = ForceUnit::new(Side::Blue, 1, "Defend Position", 1);
        let events = force.advance(&state(), &service);
        assert_eq!(
            events[1],
            "Blue Leader Decision: Error generating decision summary: decision service returned an empty response"
        );
    }

    #[test]
    fn test_panicking_subordinate_is_isolated() {
        let service = ScriptedService::from_fn(|prompt| {
            if prompt.contains("Agent ID: Red_Squad_2\n") {
                panic!("comms failure");
            }
            Ok("Hold".to_string())
        });
        let mut force = ForceUnit::new(Side::Red, 3, "Engage Blue", 1);
        let events = force.advance(&state(), &service);

        assert_eq!(events.len(), 4);
        assert!(events[0].starts_with("Red_Squad_1 decision:"));
        assert_eq!(events[1], "Error processing tick for Red_Squad_2: comms failure");
        assert!(events[2].starts_with("Red_Squad_3 decision:"));
        assert!(events[3].starts_with("Red Leader Decision:"));
    }

    #[test]
    fn test_parallel_dispatch_keeps_creation_order() {
        let service = ScriptedService::from_fn(|prompt| {
            // later squads answer faster
            if let Some(rest) = prompt.strip_prefix("Agent ID: Blue_Squad_") {
                let n: u64 = rest.split('\n').next().unwrap_or("0").parse().unwrap_or(0);
                std::thread::sleep(std::time::Duration::from_millis(40 - 5 * n));
            }
            Ok("Hold".to_string())
        });
        let mut force = ForceUnit::new(Side::Blue, 6, "Defend Position", 5);
        force.set_dispatch(DispatchMode::Parallel);

        let events = force.advance(&state(), &service);

        for (i, e) in events.iter().take(6).enumerate() {
            assert!(e.starts_with(&format!("Blue_Squad_{} decision:", i + 1)), "{}", e);
        }
        assert!(events[6].starts_with("Blue Leader Decision:"));
    }

    #[test]
    fn test_receive_order_reaches_every_unit() {
        let mut force = ForceUnit::new(Side::Red, 2, "Engage Blue", 1);
        force.receive_order("move to point A");

        assert_eq!(force.log(), ["Red Leader received direct order: move to point A"]);
        for unit in force.units() {
            assert_eq!(unit.context(), ["Received direct order: move to point A"]);
        }
    }
}
