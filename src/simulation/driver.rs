//! Simulation driver: one coordinator tick per step, plus DDIL degradation

use std::time::Duration;

use crate::core::config::SimulationConfig;
use crate::core::types::Tick;
use crate::simulation::coordinator::Coordinator;
use crate::simulation::ddil::FeedDegrader;

/// Feeds produced by one step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    pub tick: Tick,
    pub raw_feed: String,
    pub degraded_feed: String,
}

/// Owns the coordinator and turns each tick into a raw and a degraded feed
pub struct SimulationDriver {
    coordinator: Coordinator,
    degrader: FeedDegrader,
    ddil_level: i32,
    tick_duration: Duration,
    current_tick: Tick,
}

impl SimulationDriver {
    pub fn new(coordinator: Coordinator, ddil_level: i32) -> Self {
        Self {
            coordinator,
            degrader: FeedDegrader::new(),
            ddil_level,
            tick_duration: Duration::ZERO,
            current_tick: 0,
        }
    }

    pub fn from_config(coordinator: Coordinator, config: &SimulationConfig) -> Self {
        Self::new(coordinator, config.ddil_level)
            .with_tick_duration(Duration::from_millis(config.tick_duration_ms))
    }

    /// Pause inserted between steps by [`SimulationDriver::run`]
    pub fn with_tick_duration(mut self, tick_duration: Duration) -> Self {
        self.tick_duration = tick_duration;
        self
    }

    /// Ticks completed by this driver
    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn ddil_level(&self) -> i32 {
        self.ddil_level
    }

    pub fn set_ddil_level(&mut self, level: i32) {
        self.ddil_level = level;
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Mutable access for operator commands between steps
    pub fn coordinator_mut(&mut self) -> &mut Coordinator {
        &mut self.coordinator
    }

    /// Run one tick and return `(raw_feed, degraded_feed)`
    pub fn step(&mut self) -> (String, String) {
        self.current_tick += 1;

        let events = self.coordinator.advance();
        let raw_feed = events.join("\n");
        let degraded_feed = self.degrader.degrade(&raw_feed, self.ddil_level);

        tracing::debug!(
            tick = self.current_tick,
            raw_lines = events.len(),
            degraded_lines = degraded_feed.lines().count(),
            "step complete"
        );
        (raw_feed, degraded_feed)
    }

    /// Run `ticks` steps, pausing `tick_duration` between them
    ///
    /// `on_step` sees each step's feeds and may return `false` to stop early.
    /// Returns the number of steps executed.
    pub fn run<F>(&mut self, ticks: u64, mut on_step: F) -> u64
    where
        F: FnMut(&mut Self, &StepOutput) -> bool,
    {
        let mut executed = 0;
        for i in 0..ticks {
            if i > 0 && !self.tick_duration.is_zero() {
                std::thread::sleep(self.tick_duration);
            }

            let (raw_feed, degraded_feed) = self.step();
            executed += 1;
            let output = StepOutput {
                tick: self.current_tick,
                raw_feed,
                degraded_feed,
            };
            if !on_step(self, &output) {
                tracing::info!(tick = self.current_tick, "run stopped early");
                break;
            }
        }
        executed
    }
}
