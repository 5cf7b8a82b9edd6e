//! Terminal rendering glue: colored feeds and unit rosters

pub mod feed;
pub mod roster;

pub use feed::{classify, display_feed, write_feed, LineKind};
pub use roster::roster_table;
