//! Parse operator text into a [`SimCommand`]

use crate::core::types::Side;

const REDIRECT_KEYWORD: &str = "redirect";

/// An operator command, matched case-insensitively
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimCommand {
    Pause,
    Rewind,
    FastForward,
    /// Forward `text` (the full original command) to one side's leader
    Redirect { side: Side, text: String },
    /// A redirect that names neither side
    UnrecognizedRedirect { text: String },
    Unrecognized { text: String },
}

/// Parse a command; never fails
///
/// Pause, rewind and fast forward must match the whole input. Anything
/// containing `redirect` is a redirect; the side is the first side name
/// found once the `redirect` keyword itself (which contains "red") is
/// removed.
pub fn parse(input: &str) -> SimCommand {
    let lower = input.to_lowercase();

    match lower.as_str() {
        "pause" => return SimCommand::Pause,
        "rewind" => return SimCommand::Rewind,
        "fast forward" => return SimCommand::FastForward,
        _ => {}
    }

    if !lower.contains(REDIRECT_KEYWORD) {
        return SimCommand::Unrecognized {
            text: input.to_string(),
        };
    }

    match named_side(&lower.replace(REDIRECT_KEYWORD, " ")) {
        Some(side) => SimCommand::Redirect {
            side,
            text: input.to_string(),
        },
        None => SimCommand::UnrecognizedRedirect {
            text: input.to_string(),
        },
    }
}

/// Earliest-mentioned side in already-lowercased text
///
/// Precedence is by position, not by side: "blue force to flank red
/// positions" names Blue. Side names match as substrings.
fn named_side(lower: &str) -> Option<Side> {
    Side::ALL
        .iter()
        .filter_map(|&side| {
            lower
                .find(&side.name().to_lowercase())
                .map(|pos| (pos, side))
        })
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, side)| side)
}
