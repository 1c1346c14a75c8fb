//! Ingestion of monitor exports and live vitals feeds.
//!
//! - **normalize**: rich-text export to flat scanning text
//! - **extract**: vital-sign rows from normalized text
//! - **feed**: tab-separated live feed reader and its monitor session

pub mod error;
pub mod extract;
pub mod feed;
pub mod normalize;

pub use error::{IngestError, Result};
pub use extract::{ExtractOutcome, Extraction, extract_rows};
pub use feed::{
    FeedEvent, FeedReader, FeedState, LineOutcome, MonitorMode, MonitorOptions, MonitorSession,
    connect_first, parse_line, parse_time_to_seconds, playback_delay,
};
pub use normalize::{is_rtf, normalize_text, read_export, rtf_to_text};
