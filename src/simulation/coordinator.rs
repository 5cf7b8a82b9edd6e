//! Top-level coordinator (director): drives both forces through each tick
//! and owns the cumulative event log.

use std::sync::Arc;

use crate::command::{self, SimCommand};
use crate::core::config::SimulationConfig;
use crate::core::types::{Side, Tick};
use crate::llm::service::DecisionService;
use crate::simulation::event::{self, Event, NO_EVENTS};
use crate::simulation::force::{DispatchMode, ForceUnit};
use crate::simulation::isolate::isolate;
use crate::simulation::state::ScenarioState;

pub struct Coordinator {
    state: ScenarioState,
    red: ForceUnit,
    blue: ForceUnit,
    /// Cumulative log; append-only, never truncated
    log: Vec<Event>,
    service: Arc<dyn DecisionService>,
}

impl Coordinator {
    /// Create a coordinator with a random placement seed
    pub fn new(state: ScenarioState, num_units: usize, service: Arc<dyn DecisionService>) -> Self {
        Self::with_seed(state, num_units, service, rand::random())
    }

    /// Create with a specific seed for reproducible placement and movement
    pub fn with_seed(
        state: ScenarioState,
        num_units: usize,
        service: Arc<dyn DecisionService>,
        seed: u64,
    ) -> Self {
        let red = ForceUnit::new(Side::Red, num_units, Side::Red.objective(), seed);
        let blue = ForceUnit::new(
            Side::Blue,
            num_units,
            Side::Blue.objective(),
            seed.wrapping_add(1),
        );

        tracing::info!(
            scenario = %state.scenario,
            units_per_side = num_units,
            seed,
            "coordinator initialized"
        );

        Self {
            state,
            red,
            blue,
            log: Vec::new(),
            service,
        }
    }

    pub fn from_config(config: &SimulationConfig, service: Arc<dyn DecisionService>) -> Self {
        let state = ScenarioState::from_config(&config.scenario);
        let mut coordinator = match config.seed {
            Some(seed) => Self::with_seed(state, config.num_units, service, seed),
            None => Self::new(state, config.num_units, service),
        };
        if config.parallel_decisions {
            coordinator.set_dispatch(DispatchMode::Parallel);
        }
        coordinator
    }

    pub fn set_dispatch(&mut self, dispatch: DispatchMode) {
        self.red.set_dispatch(dispatch);
        self.blue.set_dispatch(dispatch);
    }

    pub fn scenario(&self) -> &ScenarioState {
        &self.state
    }

    pub fn tick(&self) -> Tick {
        self.state.tick()
    }

    pub fn force(&self, side: Side) -> &ForceUnit {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }

    fn force_mut(&mut self, side: Side) -> &mut ForceUnit {
        match side {
            Side::Red => &mut self.red,
            Side::Blue => &mut self.blue,
        }
    }

    /// Both forces in tick order
    pub fn forces(&self) -> [&ForceUnit; 2] {
        [&self.red, &self.blue]
    }

    /// Every event and command entry logged so far
    pub fn log(&self) -> &[Event] {
        &self.log
    }

    /// Run one tick across both sides and return only this tick's events
    ///
    /// Order: tick marker, red subordinates, red leader, blue subordinates,
    /// blue leader. A side that fails outright is replaced by one error event.
    pub fn advance(&mut self) -> Vec<Event> {
        let tick = self.state.next_tick();
        let mut events = vec![event::tick_marker(tick)];

        for side in Side::ALL {
            let state = &self.state;
            let service = &*self.service;
            let force = match side {
                Side::Red => &mut self.red,
                Side::Blue => &mut self.blue,
            };

            match isolate(side.name(), || Ok(force.advance(state, service))) {
                Ok(side_events) => events.extend(side_events),
                Err(e) => {
                    tracing::warn!(%side, tick, error = %e, "force failed during tick");
                    events.push(event::force_failure(side, &e));
                }
            }
        }

        self.log.extend(events.iter().cloned());
        tracing::info!(tick, events = events.len(), "tick complete");
        events
    }

    /// Events from the most recent tick marker onward
    pub fn latest_feed(&self) -> String {
        if self.log.is_empty() {
            return NO_EVENTS.to_string();
        }

        let start = self
            .log
            .iter()
            .rposition(|line| event::is_tick_marker(line))
            .unwrap_or(0);
        self.log[start..].join("\n")
    }

    /// Apply an operator command; never fails
    ///
    /// Pause, rewind and fast forward are recorded only; they do not
    /// change tick progression.
    pub fn handle_command(&mut self, input: &str) {
        let entry = match command::parse(input) {
            SimCommand::Pause => "Simulation paused by user command.".to_string(),
            SimCommand::Rewind => "Simulation rewound by user command.".to_string(),
            SimCommand::FastForward => "Simulation fast-forwarded by user command.".to_string(),
            SimCommand::Redirect { side, text } => {
                self.force_mut(side).receive_order(&text);
                format!("{} Force received command: {}", side, text)
            }
            SimCommand::UnrecognizedRedirect { text } => {
                format!("Unrecognized redirection command: {}", text)
            }
            SimCommand::Unrecognized { text } => format!("Command not recognized: {}", text),
        };

        tracing::info!(tick = self.tick(), %entry, "command handled");
        self.log.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::service::ScriptedService;

    fn coordinator(units: usize) -> Coordinator {
        Coordinator::with_seed(
            ScenarioState::new("Test Scenario", "Testville", "Initial situation"),
            units,
            Arc::new(ScriptedService::constant("Hold position")),
            11,
        )
    }

    #[test]
    fn test_event_count_per_tick() {
        for n in 0..4 {
            let mut c = coordinator(n);
            assert_eq!(c.advance().len(), 1 + (n + 1) + (n + 1));
        }
    }

    #[test]
    fn test_tick_counter_increments_by_one() {
        let mut c = coordinator(1);
        assert_eq!(c.tick(), 0);
        for expected in 1..=5 {
            let events = c.advance();
            assert_eq!(c.tick(), expected);
            assert_eq!(events[0], format!("--- Tick {} ---", expected));
        }
    }

    #[test]
    fn test_latest_feed_sentinel_and_last_tick() {
        let mut c = coordinator(1);
        assert_eq!(c.latest_feed(), NO_EVENTS);

        c.advance();
        let second = c.advance();
        assert_eq!(c.latest_feed(), second.join("\n"));
        assert_eq!(c.log().len(), 10);
    }

    #[test]
    fn test_latest_feed_without_marker_returns_whole_log() {
        let mut c = coordinator(1);
        c.handle_command("pause");
        c.handle_command("rewind");
        assert_eq!(
            c.latest_feed(),
            "Simulation paused by user command.\nSimulation rewound by user command."
        );
    }

    #[test]
    fn test_commands_after_tick_extend_latest_feed() {
        let mut c = coordinator(1);
        c.advance();
        c.handle_command("fast forward");
        assert!(c.latest_feed().ends_with("Simulation fast-forwarded by user command."));
        assert!(c.latest_feed().starts_with("--- Tick 1 ---"));
    }

    #[test]
    fn test_advisory_commands_do_not_touch_ticks() {
        let mut c = coordinator(1);
        c.handle_command("PAUSE");
        c.handle_command("Rewind");
        assert_eq!(c.tick(), 0);
        assert_eq!(c.advance()[0], "--- Tick 1 ---");
    }

    #[test]
    fn test_redirect_only_affects_named_side() {
        let mut c = coordinator(2);
        c.handle_command("redirect red force: move to point A");

        for unit in c.force(Side::Red).units() {
            assert_eq!(
                unit.context(),
                ["Received direct order: redirect red force: move to point A"]
            );
        }
        for unit in c.force(Side::Blue).units() {
            assert!(unit.context().is_empty());
        }
        assert!(c.force(Side::Blue).log().is_empty());
        assert_eq!(
            c.log().last().unwrap(),
            "Red Force received command: redirect red force: move to point A"
        );
    }

    #[test]
    fn test_redirect_blue() {
        let mut c = coordinator(1);
        c.handle_command("Redirect BLUE force: fall back");
        assert_eq!(c.force(Side::Blue).log().len(), 1);
        assert!(c.force(Side::Red).log().is_empty());
    }

    #[test]
    fn test_redirect_without_side() {
        let mut c = coordinator(2);
        c.handle_command("redirect to nowhere");

        assert_eq!(c.log(), ["Unrecognized redirection command: redirect to nowhere"]);
        for force in c.forces() {
            assert!(force.log().is_empty());
            assert!(force.units().iter().all(|u| u.context().is_empty()));
        }
    }

    #[test]
    fn test_unknown_command() {
        let mut c = coordinator(1);
        c.handle_command("launch the nukes");
        assert_eq!(c.log(), ["Command not recognized: launch the nukes"]);
    }

    #[test]
    fn test_from_config_applies_units_and_dispatch() {
        let mut config = SimulationConfig::default();
        config.num_units = 3;
        config.seed = Some(5);
        config.parallel_decisions = true;

        let c = Coordinator::from_config(&config, Arc::new(ScriptedService::constant("Hold")));
        assert_eq!(c.force(Side::Red).units().len(), 3);
        assert_eq!(c.force(Side::Blue).dispatch(), DispatchMode::Parallel);
        assert_eq!(c.scenario().scenario, config.scenario.name);
    }
}
