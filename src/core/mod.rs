pub mod config;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use error::{DecisionServiceError, Result, SimError};
pub use types::{Side, Tick, Vec2};
