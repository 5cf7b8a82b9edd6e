//! Event text formatting
//!
//! Every line that reaches a feed or log is built here, so typed results
//! from the decision service and the aggregators are turned into text in
//! exactly one place.

use crate::core::error::{DecisionServiceError, SimError};
use crate::core::types::{Side, Tick};

/// A single-line feed entry
pub type Event = String;

const TICK_MARKER_PREFIX: &str = "--- Tick";

/// Returned by `latest_feed` before anything has been logged
pub const NO_EVENTS: &str = "No events logged yet.";

pub fn tick_marker(tick: Tick) -> Event {
    format!("{} {} ---", TICK_MARKER_PREFIX, tick)
}

pub fn is_tick_marker(line: &str) -> bool {
    line.starts_with(TICK_MARKER_PREFIX)
}

/// Collapse multi-line text into one line
pub fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decision text for a subordinate, substituting a placeholder on failure
pub fn decision_text(outcome: &Result<String, DecisionServiceError>) -> String {
    match outcome {
        Ok(text) => single_line(text),
        Err(e) => format!("Error generating decision: {}", single_line(&e.to_string())),
    }
}

/// Leader summary text, substituting a placeholder on failure
pub fn summary_text(outcome: &Result<String, DecisionServiceError>) -> String {
    match outcome {
        Ok(text) => single_line(text),
        Err(e) => format!(
            "Error generating decision summary: {}",
            single_line(&e.to_string())
        ),
    }
}

pub fn unit_decision(unit_id: &str, decision: &str) -> Event {
    format!("{} decision: {}", unit_id, decision)
}

pub fn leader_decision(side: Side, summary: &str) -> Event {
    format!("{} Leader Decision: {}", side, summary)
}

/// Substitute event for a subordinate whose tick logic failed
pub fn unit_failure(unit_id: &str, err: &SimError) -> Event {
    format!("Error processing tick for {}: {}", unit_id, failure_reason(err))
}

/// Substitute event for a whole side whose tick logic failed
pub fn force_failure(side: Side, err: &SimError) -> Event {
    format!("Error in {} Force tick processing: {}", side, failure_reason(err))
}

fn failure_reason(err: &SimError) -> String {
    match err {
        SimError::UnitProcessing { reason, .. } => single_line(reason),
        other => single_line(&other.to_string()),
    }
}
