//! Row extraction from normalized export text.
//!
//! A row is a `HH:MM` timestamp followed by six whitespace-delimited tokens
//! (HR, SpO2, etCO2, RR, NIBP, rhythm) and then free event text. Event text
//! has no terminator of its own: it runs until the next timestamp or the end
//! of the input.
//!
//! Scanning is left to right and non-overlapping. A timestamp that is not
//! followed by six fixed tokens before the next timestamp produces a skipped
//! outcome rather than an error.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, info};
use vitals_model::{SkipReason, VitalRow};

static ROW_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(\d{2}:\d{2})\s+(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\S+)")
        .expect("valid row header regex")
});

static TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}:\d{2}").expect("valid timestamp regex"));

/// Result of examining one timestamp in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// A complete row.
    Kept(VitalRow),
    /// A timestamp that did not start a complete row.
    Skipped { time: String, reason: SkipReason },
}

/// Every outcome of one extraction pass, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub outcomes: Vec<ExtractOutcome>,
}

impl Extraction {
    /// Kept rows in document order.
    pub fn rows(&self) -> impl Iterator<Item = &VitalRow> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ExtractOutcome::Kept(row) => Some(row),
            ExtractOutcome::Skipped { .. } => None,
        })
    }

    /// Consume the extraction, keeping only complete rows.
    pub fn into_rows(self) -> Vec<VitalRow> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                ExtractOutcome::Kept(row) => Some(row),
                ExtractOutcome::Skipped { .. } => None,
            })
            .collect()
    }

    pub fn kept_count(&self) -> usize {
        self.rows().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.kept_count()
    }

    /// True when no complete row was found.
    pub fn is_empty(&self) -> bool {
        self.kept_count() == 0
    }
}

/// Extract vital-sign rows from normalized text.
///
/// Matching is case-insensitive and spans line boundaries, so text that was
/// not normalized still scans. No match yields an empty extraction.
pub fn extract_rows(text: &str) -> Extraction {
    let mut outcomes = Vec::new();
    let mut position = 0;

    while position < text.len() {
        let header = ROW_HEADER.captures_at(text, position);
        let scan_end = header
            .as_ref()
            .and_then(|caps| caps.get(0))
            .map_or(text.len(), |m| m.start());

        for stray in TIMESTAMP.find_iter(&text[position..scan_end]) {
            debug!(time = stray.as_str(), "incomplete row skipped");
            outcomes.push(ExtractOutcome::Skipped {
                time: stray.as_str().to_string(),
                reason: SkipReason::IncompleteRow,
            });
        }

        let Some(caps) = header else { break };
        let Some(whole) = caps.get(0) else { break };

        // A fixed field holding a timestamp means this row ran short and
        // borrowed tokens from the next one.
        if let Some(next_row) = (2..=7)
            .filter_map(|index| caps.get(index))
            .find_map(|token| TIMESTAMP.find(token.as_str()).map(|ts| token.start() + ts.start()))
        {
            let time = caps.get(1).as_ref().map_or("", regex::Match::as_str);
            debug!(time, "incomplete row skipped");
            outcomes.push(ExtractOutcome::Skipped {
                time: time.to_string(),
                reason: SkipReason::IncompleteRow,
            });
            position = next_row;
            continue;
        }

        let event_end = TIMESTAMP
            .find_at(text, whole.end())
            .map_or(text.len(), |next| next.start());

        outcomes.push(ExtractOutcome::Kept(row_from_captures(
            &caps,
            &text[whole.end()..event_end],
        )));
        position = event_end;
    }

    let extraction = Extraction { outcomes };
    info!(
        kept = extraction.kept_count(),
        skipped = extraction.skipped_count(),
        "rows extracted"
    );
    extraction
}

fn row_from_captures(caps: &Captures<'_>, event: &str) -> VitalRow {
    let field = |index: usize| {
        caps.get(index)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };
    VitalRow {
        time: field(1),
        heart_rate: field(2),
        spo2: field(3),
        etco2: field(4),
        respiratory_rate: field(5),
        nibp: field(6),
        rhythm: field(7),
        event: event.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_runs_to_next_timestamp() {
        let text = "00:01 80 97 35 14 120/80 Sinus Fluid bolus given 00:02 82 96 36 15 118/79 Sinus";
        let rows = extract_rows(text).into_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].event, "Fluid bolus given");
        assert_eq!(rows[1].time, "00:02");
        assert_eq!(rows[1].nibp, "118/79");
        assert_eq!(rows[1].event, "");
    }

    #[test]
    fn header_text_before_first_row_is_ignored() {
        let text = "Time HR SpO2 etCO2 RR NIBP Rhythm Event 00:05 70 99 38 12 110/70 AFib";
        let extraction = extract_rows(text);
        assert_eq!(extraction.kept_count(), 1);
        assert_eq!(extraction.skipped_count(), 0);
        let row = extraction.rows().next().expect("one row");
        assert_eq!(row.rhythm, "AFib");
        assert_eq!(row.heart_rate, "70");
    }

    #[test]
    fn no_match_is_empty_not_error() {
        assert!(extract_rows("").is_empty());
        assert!(extract_rows("nothing to see here").outcomes.is_empty());
    }

    #[test]
    fn trailing_short_row_is_reported_as_skipped() {
        let text = "00:01 80 97 35 14 120/80 Sinus 00:02 81 96";
        let extraction = extract_rows(text);
        assert_eq!(extraction.kept_count(), 1);
        assert_eq!(
            extraction.outcomes[1],
            ExtractOutcome::Skipped {
                time: "00:02".to_string(),
                reason: SkipReason::IncompleteRow
            }
        );
    }

    #[test]
    fn short_row_inside_table_does_not_swallow_the_next() {
        let text = "00:01 80 97 35 14 120/80 Sinus 00:02 81 96 00:03 82 95 34 16 119/78 Sinus Suction";
        let extraction = extract_rows(text);
        let times: Vec<&str> = extraction.rows().map(|row| row.time.as_str()).collect();
        assert_eq!(times, ["00:01", "00:03"]);
        assert_eq!(extraction.skipped_count(), 1);
        assert_eq!(
            extraction.rows().nth(1).map(|row| row.event.as_str()),
            Some("Suction")
        );
    }

    #[test]
    fn matching_spans_newlines() {
        let text = "00:01\n80\n97\n35\n14\n120/80\nSinus\nStart\n00:02 81 96 34 15 121/80 sinus";
        let rows = extract_rows(text).into_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].event, "Start");
        assert_eq!(rows[1].rhythm, "sinus");
    }
}
