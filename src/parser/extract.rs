//! Multi-event extraction from pasted text
//!
//! The line-oriented path (preprocess, split, detect, parse) handles most
//! calendar pastes. When it finds nothing, a single regex scan over the
//! HTML-stripped input text picks up events wherever they sit.

use super::event::{ParsedEvent, is_event_format_string, parse_event_string};
use super::preprocess::preprocess_event_text;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

const TIME_FIELD: &str = r"(?:\d{1,2}(?::\d{2})?(?:[ \t]*(?i:[ap]\.?m\b\.?))?|(?i:noon))";

static EVENT_SCAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"([^\n]+?)\s+on\s+([^\n]+?)\s+at\s+({tf})\s*-\s*({tf})",
        tf = TIME_FIELD
    ))
    .unwrap()
});

/// Knobs for [`extract_events_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Run the regex scan when the line-oriented pass finds nothing.
    pub fallback_scan: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { fallback_scan: true }
    }
}

/// Extract every event found in `text`, in source order.
///
/// An empty result means "no events found", not an error.
pub fn extract_events_from_text(text: &str) -> Vec<ParsedEvent> {
    extract_events_with(text, ExtractOptions::default())
}

pub fn extract_events_with(text: &str, options: ExtractOptions) -> Vec<ParsedEvent> {
    let preprocessed = preprocess_event_text(text);

    let events: Vec<ParsedEvent> = preprocessed
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('<'))
        .filter(|line| is_event_format_string(line))
        .filter_map(parse_event_string)
        .collect();

    if !events.is_empty() {
        debug!("Extracted {} event(s) line by line", events.len());
        return events;
    }

    if !options.fallback_scan {
        debug!("No events found line by line; fallback scan disabled");
        return events;
    }

    let scanned = scan_events(&strip_html_tags(text));
    debug!("Fallback scan found {} event(s)", scanned.len());
    scanned
}

/// Global `<name> on <date> at <start> - <end>` scan over plain text.
fn scan_events(text: &str) -> Vec<ParsedEvent> {
    EVENT_SCAN_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps[1].trim();
            if name.is_empty() {
                return None;
            }
            Some(ParsedEvent::new(name, caps[2].trim(), caps[3].trim(), caps[4].trim()))
        })
        .collect()
}

/// Drop everything inside `<...>` and join the remaining text pieces with a
/// space. An unterminated tag swallows the rest of the input.
pub fn strip_html_tags(text: &str) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_tag = false;

    for c in text.chars() {
        match c {
            '<' if !in_tag => {
                in_tag = true;
                if !current.trim().is_empty() {
                    segments.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => current.push(c),
        }
    }
    if !in_tag && !current.trim().is_empty() {
        segments.push(current);
    }

    segments.join(" ")
}
