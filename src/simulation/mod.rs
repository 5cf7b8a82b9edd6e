//! Hierarchical tick orchestration
//!
//! Driver -> Coordinator -> ForceUnit (red, then blue) -> DecisionUnit.
//! One tick runs to completion before the next begins; per-unit failures
//! become events instead of aborting the tick.

pub mod coordinator;
pub mod ddil;
pub mod driver;
pub mod event;
pub mod force;
mod isolate;
pub mod state;
pub mod unit;

pub use coordinator::Coordinator;
pub use ddil::FeedDegrader;
pub use driver::{SimulationDriver, StepOutput};
pub use event::Event;
pub use force::{DispatchMode, ForceUnit};
pub use state::ScenarioState;
pub use unit::DecisionUnit;
