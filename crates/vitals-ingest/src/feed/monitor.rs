//! Background feed monitor.
//!
//! A [`FeedReader`] moves through `Disconnected -> Connected -> Monitoring ->
//! Stopped`. While monitoring, one worker thread reads the feed file and
//! hands events to observers over bounded channels. The latest reading is
//! kept in a slot guarded by a lock, so readers always see a whole reading.
//!
//! Cancellation is cooperative: the worker checks its stop flag at least once
//! per `stop_poll` interval, including while it waits on a full channel.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use chrono::Local;
use crossbeam_channel::{Receiver, SendTimeoutError, Sender};
use tracing::{debug, error, info, warn};
use vitals_model::{DEFAULT_FEED_TEMPERATURE, SkipReason, StreamingReading};

use super::parse::{LineOutcome, parse_line, playback_delay};
use crate::error::{IngestError, Result};

/// Lifecycle of a feed reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Disconnected,
    Connected,
    Monitoring,
    Stopped,
}

impl fmt::Display for FeedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::Monitoring => "monitoring",
            Self::Stopped => "stopped",
        })
    }
}

/// How the worker consumes the feed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorMode {
    /// Replay every line once, paced by the feed's own time column.
    #[default]
    Playback,
    /// Watch the file and emit its last line whenever it changes.
    Tail,
}

/// Worker timing and hand-off settings.
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub mode: MonitorMode,
    /// Pause used when the time delta is unusable and after a malformed line.
    pub default_delay: Duration,
    /// File polling interval in tail mode.
    pub tail_interval: Duration,
    /// Upper bound on how long the worker goes without checking for stop.
    pub stop_poll: Duration,
    /// Capacity of each observer channel.
    pub channel_capacity: usize,
    /// Temperature attached to every reading.
    pub temperature: String,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            mode: MonitorMode::Playback,
            default_delay: Duration::from_millis(1000),
            tail_interval: Duration::from_millis(500),
            stop_poll: Duration::from_millis(100),
            channel_capacity: 256,
            temperature: DEFAULT_FEED_TEMPERATURE.to_string(),
        }
    }
}

impl MonitorOptions {
    #[must_use]
    pub fn with_mode(mut self, mode: MonitorMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    #[must_use]
    pub fn with_tail_interval(mut self, interval: Duration) -> Self {
        self.tail_interval = interval;
        self
    }

    #[must_use]
    pub fn with_stop_poll(mut self, poll: Duration) -> Self {
        self.stop_poll = poll;
        self
    }

    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: impl Into<String>) -> Self {
        self.temperature = temperature.into();
        self
    }
}

/// Event delivered to feed observers.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Reading(StreamingReading),
    /// A line produced no reading. `line` is 1-based.
    Skipped { line: usize, reason: SkipReason },
    /// Playback reached the end of the file.
    Finished,
}

type LatestSlot = Arc<RwLock<Option<StreamingReading>>>;
type Observers = Arc<Mutex<Vec<Sender<FeedEvent>>>>;

/// Handle to a running worker.
struct MonitorHandle {
    cancel: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    fn cancel_and_join(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("feed monitor thread panicked");
        }
    }
}

/// Reader for one tab-separated vitals feed file.
pub struct FeedReader {
    path: PathBuf,
    state: FeedState,
    options: MonitorOptions,
    observers: Observers,
    latest: LatestSlot,
    handle: Option<MonitorHandle>,
}

impl FeedReader {
    pub fn new(path: impl Into<PathBuf>, options: MonitorOptions) -> Self {
        Self {
            path: path.into(),
            state: FeedState::Disconnected,
            options,
            observers: Arc::new(Mutex::new(Vec::new())),
            latest: Arc::new(RwLock::new(None)),
            handle: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn options(&self) -> &MonitorOptions {
        &self.options
    }

    /// Check that the feed file exists and is readable.
    ///
    /// Returns the number of lines currently in the file. On failure the
    /// reader stays disconnected and the caller may try another location.
    pub fn connect(&mut self) -> Result<usize> {
        if self.state == FeedState::Monitoring {
            return Err(IngestError::InvalidState {
                operation: "connect",
                state: self.state,
            });
        }
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let lines = contents.lines().count();
                info!(path = %self.path.display(), lines, "feed connected");
                self.state = FeedState::Connected;
                Ok(lines)
            }
            Err(source) => {
                self.state = FeedState::Disconnected;
                Err(IngestError::FeedUnavailable {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    /// Register an observer. Observers added while monitoring receive later events.
    pub fn subscribe(&self) -> Receiver<FeedEvent> {
        let (sender, receiver) = crossbeam_channel::bounded(self.options.channel_capacity.max(1));
        match self.observers.lock() {
            Ok(mut observers) => observers.push(sender),
            Err(poisoned) => poisoned.into_inner().push(sender),
        }
        receiver
    }

    /// Start the background worker.
    pub fn start(&mut self) -> Result<()> {
        if self.state != FeedState::Connected {
            return Err(IngestError::InvalidState {
                operation: "start",
                state: self.state,
            });
        }

        let cancel = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let worker = Worker {
            path: self.path.clone(),
            options: self.options.clone(),
            observers: Arc::clone(&self.observers),
            latest: Arc::clone(&self.latest),
            cancel: Arc::clone(&cancel),
            finished: Arc::clone(&finished),
        };
        let thread = std::thread::Builder::new()
            .name("vitals-feed".to_string())
            .spawn(move || worker.run())
            .map_err(|source| IngestError::WorkerSpawn { source })?;

        info!(path = %self.path.display(), mode = ?self.options.mode, "feed monitoring started");
        self.handle = Some(MonitorHandle {
            cancel,
            finished,
            thread: Some(thread),
        });
        self.state = FeedState::Monitoring;
        Ok(())
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// No event is sent after this returns.
    pub fn stop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.cancel_and_join();
            info!(path = %self.path.display(), "feed monitoring stopped");
        }
        if self.state == FeedState::Monitoring {
            self.state = FeedState::Stopped;
        }
    }

    /// Copy of the most recent reading.
    pub fn latest(&self) -> Option<StreamingReading> {
        match self.latest.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether the worker ran to completion on its own.
    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| handle.finished.load(Ordering::SeqCst))
    }
}

impl Drop for FeedReader {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for FeedReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedReader")
            .field("path", &self.path)
            .field("state", &self.state)
            .field("mode", &self.options.mode)
            .finish()
    }
}

/// Try each location in order and return a reader for the first that connects.
pub fn connect_first(candidates: &[PathBuf], options: &MonitorOptions) -> Result<FeedReader> {
    for path in candidates {
        let mut reader = FeedReader::new(path.clone(), options.clone());
        match reader.connect() {
            Ok(_) => return Ok(reader),
            Err(error) => debug!(path = %path.display(), %error, "feed candidate unavailable"),
        }
    }
    Err(IngestError::NoFeedAvailable {
        tried: candidates.to_vec(),
    })
}

struct Worker {
    path: PathBuf,
    options: MonitorOptions,
    observers: Observers,
    latest: LatestSlot,
    cancel: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

/// Marks the worker finished when it exits, and tells observers if it died.
struct ExitGuard<'a> {
    worker: &'a Worker,
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            error!(path = %self.worker.path.display(), "feed worker panicked");
            self.worker.broadcast(&FeedEvent::Finished);
        }
        self.worker.finished.store(true, Ordering::SeqCst);
    }
}

impl Worker {
    fn run(self) {
        let _exit = ExitGuard { worker: &self };
        match self.options.mode {
            MonitorMode::Playback => self.playback(),
            MonitorMode::Tail => self.tail(),
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    fn playback(&self) {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "feed file could not be read");
                self.broadcast(&FeedEvent::Finished);
                return;
            }
        };

        let mut previous_time: Option<String> = None;
        for (index, line) in contents.lines().enumerate() {
            if self.cancelled() {
                return;
            }
            match parse_line(line, &self.options.temperature) {
                LineOutcome::Reading(mut reading) => {
                    if let Some(previous) = &previous_time {
                        let delay =
                            playback_delay(previous, &reading.time, self.options.default_delay);
                        if !self.sleep(delay) {
                            return;
                        }
                        reading.captured_at = Local::now();
                    }
                    previous_time = Some(reading.time.clone());
                    if !self.publish(reading) {
                        return;
                    }
                }
                LineOutcome::Skipped(reason) => {
                    if !self.skip(index + 1, reason) {
                        return;
                    }
                    if reason.is_malformed() && !self.sleep(self.options.default_delay) {
                        return;
                    }
                }
            }
        }
        info!(path = %self.path.display(), "end of feed reached");
        self.broadcast(&FeedEvent::Finished);
    }

    fn tail(&self) {
        let mut last_len: Option<u64> = None;
        let mut last_line: Option<String> = None;
        let mut unavailable = false;

        while !self.cancelled() {
            match std::fs::metadata(&self.path) {
                Ok(meta) if Some(meta.len()) != last_len => {
                    unavailable = false;
                    last_len = Some(meta.len());
                    match std::fs::read_to_string(&self.path) {
                        Ok(contents) => {
                            if let Some((index, line)) = contents
                                .lines()
                                .enumerate()
                                .filter(|(_, line)| !line.trim().is_empty())
                                .last()
                                && last_line.as_deref() != Some(line)
                            {
                                last_line = Some(line.to_string());
                                let delivered = match parse_line(line, &self.options.temperature) {
                                    LineOutcome::Reading(reading) => self.publish(reading),
                                    LineOutcome::Skipped(reason) => self.skip(index + 1, reason),
                                };
                                if !delivered {
                                    return;
                                }
                            }
                        }
                        Err(error) => {
                            warn!(path = %self.path.display(), %error, "feed file could not be read");
                        }
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    if !unavailable {
                        warn!(path = %self.path.display(), %error, "feed file unavailable");
                        unavailable = true;
                    }
                    last_len = None;
                }
            }
            if !self.sleep(self.options.tail_interval) {
                return;
            }
        }
    }

    /// Store the reading as latest and send it to observers.
    fn publish(&self, reading: StreamingReading) -> bool {
        if self.cancelled() {
            return false;
        }
        match self.latest.write() {
            Ok(mut slot) => *slot = Some(reading.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(reading.clone()),
        }
        self.broadcast(&FeedEvent::Reading(reading))
    }

    fn skip(&self, line: usize, reason: SkipReason) -> bool {
        debug!(line, %reason, "feed line skipped");
        self.broadcast(&FeedEvent::Skipped { line, reason })
    }

    /// Send an event to every observer. Returns false once stop was requested.
    fn broadcast(&self, event: &FeedEvent) -> bool {
        let senders: Vec<Sender<FeedEvent>> = match self.observers.lock() {
            Ok(observers) => observers.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        let mut disconnected = Vec::new();
        for (index, sender) in senders.iter().enumerate() {
            let mut pending = event.clone();
            loop {
                if self.cancelled() {
                    return false;
                }
                match sender.send_timeout(pending, self.poll()) {
                    Ok(()) => break,
                    Err(SendTimeoutError::Timeout(event)) => pending = event,
                    Err(SendTimeoutError::Disconnected(_)) => {
                        disconnected.push(index);
                        break;
                    }
                }
            }
        }

        if !disconnected.is_empty() {
            warn!(count = disconnected.len(), "feed observer disconnected");
            let mut observers = match self.observers.lock() {
                Ok(observers) => observers,
                Err(poisoned) => poisoned.into_inner(),
            };
            observers.retain(|sender| {
                !disconnected
                    .iter()
                    .any(|index| senders[*index].same_channel(sender))
            });
        }
        !self.cancelled()
    }

    /// Sleep in stop-poll slices. Returns false if stop was requested.
    fn sleep(&self, total: Duration) -> bool {
        let deadline = Instant::now() + total;
        loop {
            if self.cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep((deadline - now).min(self.poll()));
        }
    }

    fn poll(&self) -> Duration {
        self.options.stop_poll.max(Duration::from_millis(1))
    }
}
