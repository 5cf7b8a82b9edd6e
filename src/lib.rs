//! Tactical Sim - two-sided tactical simulation with LLM-driven units
//!
//! Each tick a coordinator drives the red and blue forces; every squad and
//! leader decision comes from a [`llm::DecisionService`]. The resulting
//! feed can be degraded to emulate a DDIL communications link.

pub mod command;
pub mod core;
pub mod llm;
pub mod render;
pub mod simulation;
