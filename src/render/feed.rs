//! Colored terminal rendering of event feeds

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};

use crate::simulation::event;

/// Width of the frame's horizontal rules
const FRAME_WIDTH: usize = 72;

/// Visual category of a feed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    TickMarker,
    Error,
    Decision,
    Order,
    Other,
}

impl LineKind {
    pub fn color(&self) -> Color {
        match self {
            LineKind::TickMarker => Color::Yellow,
            LineKind::Error => Color::Red,
            LineKind::Decision => Color::Green,
            LineKind::Order => Color::Cyan,
            LineKind::Other => Color::White,
        }
    }

    pub fn bold(&self) -> bool {
        matches!(self, LineKind::TickMarker | LineKind::Error)
    }
}

/// First matching rule wins: marker, error, decision, received order
pub fn classify(line: &str) -> LineKind {
    if event::is_tick_marker(line) {
        return LineKind::TickMarker;
    }
    if line.contains("Error") {
        return LineKind::Error;
    }
    let lower = line.to_lowercase();
    if lower.contains("decision") {
        LineKind::Decision
    } else if lower.contains("received") {
        LineKind::Order
    } else {
        LineKind::Other
    }
}

/// Write `feed` inside a titled frame, one colored line per entry
pub fn write_feed<W: Write>(out: &mut W, title: &str, feed: &str) -> io::Result<()> {
    let rule = "─".repeat(FRAME_WIDTH.saturating_sub(title.chars().count() + 4));
    queue!(
        out,
        SetForegroundColor(Color::Blue),
        Print(format!("╭─ {} {}\n", title, rule)),
        ResetColor
    )?;

    for line in feed.split('\n') {
        let kind = classify(line);
        queue!(out, SetForegroundColor(Color::Blue), Print("│ "), SetForegroundColor(kind.color()))?;
        if kind.bold() {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        queue!(out, Print(line), SetAttribute(Attribute::Reset), ResetColor, Print("\n"))?;
    }

    queue!(
        out,
        SetForegroundColor(Color::Blue),
        Print(format!("╰{}\n", "─".repeat(FRAME_WIDTH - 1))),
        ResetColor
    )?;
    out.flush()
}

/// Print a framed feed to stdout
pub fn display_feed(title: &str, feed: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_feed(&mut lock, title, feed)
}
