//! DDIL (denied, disrupted, intermittent, limited) feed degradation
//!
//! Models a degraded command-and-control link: each line of a feed may be
//! lost outright or arrive with its longer words garbled. Every call rolls
//! fresh dice, so the same feed degrades differently each time.

use rand::Rng;

/// Replacement for every garbled word
pub const REDACTION: &str = "???";

/// Words shorter than this survive redaction
const MIN_REDACTED_LEN: usize = 5;

/// Per-level increase in drop and redaction probability
const PROBABILITY_PER_LEVEL: f64 = 0.1;

/// Probability ceiling, reached at level 5
const MAX_PROBABILITY: f64 = 0.5;

/// Stateless feed degrader
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedDegrader;

impl FeedDegrader {
    pub fn new() -> Self {
        Self
    }

    /// Drop/redaction probability for a severity level, clamped to 0.0..=0.5
    pub fn probability(level: i32) -> f64 {
        (level as f64 * PROBABILITY_PER_LEVEL).clamp(0.0, MAX_PROBABILITY)
    }

    /// Degrade a feed using the thread-local RNG
    pub fn degrade(&self, raw_feed: &str, level: i32) -> String {
        self.degrade_with(raw_feed, level, &mut rand::thread_rng())
    }

    /// Degrade a feed with an explicit RNG
    ///
    /// Per line: drop with probability `p`; otherwise redact with
    /// probability `p`. Surviving lines keep their relative order.
    pub fn degrade_with<R: Rng + ?Sized>(&self, raw_feed: &str, level: i32, rng: &mut R) -> String {
        let p = Self::probability(level);
        if p == 0.0 {
            return raw_feed.to_string();
        }

        raw_feed
            .split('\n')
            .filter_map(|line| {
                if rng.gen_bool(p) {
                    return None;
                }
                if rng.gen_bool(p) {
                    Some(redact(line))
                } else {
                    Some(line.to_string())
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Replace every whitespace-delimited word of 5+ characters
fn redact(line: &str) -> String {
    line.split_whitespace()
        .map(|word| {
            if word.chars().count() < MIN_REDACTED_LEN {
                word
            } else {
                REDACTION
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
