//! Single-event detection and parsing for "Name on Date at Start - End"

use super::utils::collapse_whitespace;
use log::debug;
use serde::{Deserialize, Serialize};

const ON: &str = " on ";
const AT: &str = " at ";
const RANGE: &str = " - ";

/// Raw pieces of one event as they appear in the text.
///
/// `date` is opaque and never interpreted; `start_time` and `end_time` are
/// the untouched time tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEvent {
    pub name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

impl ParsedEvent {
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Elapsed minutes between the start and end tokens.
    pub fn duration_minutes(&self) -> i32 {
        super::time::calculate_duration(&self.start_time, &self.end_time)
    }

    /// `"<start> - <end>"` display string.
    pub fn time_range(&self) -> String {
        super::format::format_time_range(&self.start_time, &self.end_time)
    }
}

/// Single-line check for the `X on Y at S - E` shape.
///
/// Multi-line text is never a single event; that is the extractor's job.
pub fn is_event_format_string(text: &str) -> bool {
    text.contains(ON) && text.contains(AT) && text.contains(RANGE) && !text.contains('\n')
}

/// Split an event string into name, date, start and end tokens.
///
/// Returns `None` when any of the `" on "`, `" at "` or `" - "` delimiters is
/// missing. A trailing HTML fragment glued onto the end time is cut off.
pub fn parse_event_string(text: &str) -> Option<ParsedEvent> {
    let normalized = collapse_whitespace(text);

    // Only the first delimiter splits; later ones stay in the right-hand side.
    let (name, remainder) = normalized.split_once(ON)?;
    let (date, time_part) = remainder.split_once(AT)?;
    let (start_time, end_time) = time_part.split_once(RANGE)?;

    let mut end_time = end_time.trim();
    if let Some(pos) = end_time.find('<') {
        if pos > 0 {
            end_time = end_time[..pos].trim();
        }
    }

    let parsed = ParsedEvent::new(name.trim(), date.trim(), start_time.trim(), end_time);
    debug!("Parsed event string: {:?}", parsed);
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_event_shape() {
        assert!(is_event_format_string("Meeting on Monday at 3 PM - 4 PM"));
        assert!(!is_event_format_string("Meeting on Monday at 3 PM - 4 PM\nExtra"));
        assert!(!is_event_format_string("Meeting on Monday at 3 PM"));
        assert!(!is_event_format_string("Meeting Monday at 3 PM - 4 PM"));
        assert!(!is_event_format_string(""));
    }

    #[test]
    fn parses_basic_event() {
        let parsed = parse_event_string("Team Sync on Jan 5 at 3:00 PM - 4:00 PM").unwrap();
        assert_eq!(parsed, ParsedEvent::new("Team Sync", "Jan 5", "3:00 PM", "4:00 PM"));
        assert_eq!(parsed.duration_minutes(), 60);
        assert_eq!(parsed.time_range(), "3:00 PM - 4:00 PM");
    }

    #[test]
    fn rejects_missing_delimiters() {
        assert_eq!(parse_event_string("no delimiter here"), None);
        assert_eq!(parse_event_string("Lunch on Friday"), None);
        assert_eq!(parse_event_string("Lunch on Friday at noon"), None);
        assert_eq!(parse_event_string(""), None);
    }

    #[test]
    fn later_delimiters_stay_in_the_remainder() {
        let parsed =
            parse_event_string("Hands on Workshop on Mar 3 at the lab at 9 AM - 10 AM - late").unwrap();
        assert_eq!(parsed.name, "Hands");
        assert_eq!(parsed.date, "Workshop on Mar 3");
        assert_eq!(parsed.start_time, "the lab at 9 AM");
        assert_eq!(parsed.end_time, "10 AM - late");
    }

    #[test]
    fn collapses_whitespace_before_splitting() {
        let parsed = parse_event_string("  Review \t on  Tue\nat   1 PM   -  2 PM  ").unwrap();
        assert_eq!(parsed, ParsedEvent::new("Review", "Tue", "1 PM", "2 PM"));
    }

    #[test]
    fn strips_html_tail_from_end_time() {
        let parsed = parse_event_string("X on Y at 3 PM - 4 PM<p>desc</p>").unwrap();
        assert_eq!(parsed.end_time, "4 PM");

        // a leading '<' is kept as-is
        let parsed = parse_event_string("X on Y at 3 PM - <b>4 PM").unwrap();
        assert_eq!(parsed.end_time, "<b>4 PM");
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let parsed = ParsedEvent::new("A", "B", "1 PM", "2 PM");
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["startTime"], "1 PM");
        assert_eq!(json["endTime"], "2 PM");
    }
}
