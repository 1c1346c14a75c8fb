//! Live vitals feed: line parsing, the background monitor and the session that owns it.

pub mod monitor;
pub mod parse;
pub mod session;

pub use monitor::{FeedEvent, FeedReader, FeedState, MonitorMode, MonitorOptions, connect_first};
pub use parse::{LineOutcome, REQUIRED_FIELDS, parse_line, parse_time_to_seconds, playback_delay};
pub use session::MonitorSession;
