//! Monitoring session owned by the composing application.

use crossbeam_channel::Receiver;
use tracing::info;
use vitals_model::StreamingReading;

use super::monitor::{FeedEvent, FeedReader, FeedState};
use crate::error::Result;

/// Holds the single active feed of an application session.
///
/// Starting a feed stops the previous one first, so two workers never write
/// the latest-reading slot at the same time.
#[derive(Debug, Default)]
pub struct MonitorSession {
    active: Option<FeedReader>,
}

impl MonitorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop any current feed, then connect (if needed) and start `reader`.
    ///
    /// Returns a receiver registered before the worker starts, so no event is missed.
    pub fn start(&mut self, mut reader: FeedReader) -> Result<Receiver<FeedEvent>> {
        if let Some(mut previous) = self.active.take() {
            info!(path = %previous.path().display(), "replacing active feed");
            previous.stop();
        }
        if reader.state() != FeedState::Connected {
            reader.connect()?;
        }
        let events = reader.subscribe();
        reader.start()?;
        self.active = Some(reader);
        Ok(events)
    }

    /// Stop the active feed. Its latest reading stays available.
    pub fn stop(&mut self) {
        if let Some(reader) = self.active.as_mut() {
            reader.stop();
        }
    }

    pub fn latest(&self) -> Option<StreamingReading> {
        self.active.as_ref().and_then(FeedReader::latest)
    }

    pub fn active(&self) -> Option<&FeedReader> {
        self.active.as_ref()
    }

    pub fn is_monitoring(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|reader| reader.state() == FeedState::Monitoring)
    }
}
