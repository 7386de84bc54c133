//! Event sheet: an ordered list of events with per-row and total durations
//!
//! This is the stateful layer on top of the pure parser functions. Rows are
//! updated in place as the user types or pastes; every duration shown here
//! comes from `parser::calculate_duration`.

use crate::parser::{
    ParsedEvent, calculate_duration, extract_events_from_text, format_duration,
    format_time_range, is_event_format_string, parse_event_string,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id given to the first row of a fresh or cleared sheet.
pub const FIRST_ROW_ID: &str = "1";

/// One row of the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,
    pub time_range: String,
    pub duration: String,
    pub duration_minutes: i32,
}

impl Event {
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            date: String::new(),
            time_range: String::new(),
            duration: String::new(),
            duration_minutes: 0,
        }
    }

    /// Build a fully computed row from parsed event pieces.
    pub fn from_parsed(id: impl Into<String>, parsed: &ParsedEvent) -> Self {
        let minutes = calculate_duration(&parsed.start_time, &parsed.end_time);
        Self {
            id: id.into(),
            name: parsed.name.clone(),
            date: parsed.date.clone(),
            time_range: format_time_range(&parsed.start_time, &parsed.end_time),
            duration: format_duration(minutes),
            duration_minutes: minutes,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.time_range.is_empty()
    }
}

fn new_row_id() -> String {
    Uuid::new_v4().to_string()
}

/// Ordered collection of events. Never empty: the last row is cleared
/// instead of removed.
#[derive(Debug, Clone)]
pub struct EventSheet {
    events: Vec<Event>,
}

impl Default for EventSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSheet {
    pub fn new() -> Self {
        Self { events: vec![Event::blank(FIRST_ROW_ID)] }
    }

    /// Start a sheet from already parsed events; an empty slice gives a
    /// fresh sheet.
    pub fn from_parsed(parsed: &[ParsedEvent]) -> Self {
        let mut sheet = Self::new();
        if !parsed.is_empty() {
            sheet.events = rows_from_parsed(FIRST_ROW_ID, parsed);
        }
        sheet
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Append a blank row and return it.
    pub fn add_event(&mut self) -> &Event {
        let id = new_row_id();
        debug!("Adding blank event row {}", id);
        self.events.push(Event::blank(id));
        &self.events[self.events.len() - 1]
    }

    /// Remove a row. Removing the only row clears it instead.
    pub fn remove_event(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            warn!("Cannot remove unknown event row {}", id);
            return false;
        }
        if self.events.len() == 1 {
            self.clear();
        } else {
            self.events.retain(|e| e.id != id);
        }
        true
    }

    pub fn clear(&mut self) {
        self.events = vec![Event::blank(FIRST_ROW_ID)];
    }

    /// Set a row's name. An event-shaped value fills the whole row instead.
    pub fn update_name(&mut self, id: &str, value: &str) -> Option<&Event> {
        let index = self.index_of(id)?;
        self.apply_name(index, value);
        Some(&self.events[index])
    }

    /// Set a row's time range and recompute its duration when both ends
    /// are present.
    pub fn update_time_range(&mut self, id: &str, value: &str) -> Option<&Event> {
        let index = self.index_of(id)?;
        let row = &mut self.events[index];
        row.time_range = value.to_string();

        let mut halves = value.split(" - ").map(str::trim);
        if let (Some(start), Some(end)) = (halves.next(), halves.next()) {
            if !start.is_empty() && !end.is_empty() {
                let minutes = calculate_duration(start, end);
                row.duration_minutes = minutes;
                row.duration = format_duration(minutes);
            }
        }
        Some(&self.events[index])
    }

    /// Replace row `id` with every event found in `text`.
    ///
    /// The first extracted event keeps the row's id, the others get new ids,
    /// and the remaining rows follow. Nothing changes when no event is
    /// found. Returns the number of events added.
    pub fn paste(&mut self, id: &str, text: &str) -> usize {
        let parsed = extract_events_from_text(text);
        if parsed.is_empty() {
            info!("No events found in pasted text");
            return 0;
        }

        let mut rows = rows_from_parsed(id, &parsed);
        rows.extend(self.events.drain(..).filter(|e| e.id != id));
        self.events = rows;

        info!("Pasted {} event(s)", parsed.len());
        parsed.len()
    }

    /// Route raw name-field input: multi-line text that mentions "on" and
    /// "at" is treated as a paste, anything else as a name update. Returns
    /// how many rows were filled from parsed events.
    pub fn handle_name_input(&mut self, id: &str, value: &str) -> usize {
        let multi_line = value.contains('\n') || value.contains('\r');
        if multi_line && value.contains("on") && value.contains("at") {
            return self.paste(id, value);
        }
        match self.index_of(id) {
            Some(index) => usize::from(self.apply_name(index, value)),
            None => 0,
        }
    }

    pub fn total_minutes(&self) -> i32 {
        self.events.iter().fold(0i32, |total, e| total.saturating_add(e.duration_minutes))
    }

    pub fn total_display(&self) -> String {
        format_duration(self.total_minutes())
    }

    /// Returns true when the value parsed as a full event.
    fn apply_name(&mut self, index: usize, value: &str) -> bool {
        if is_event_format_string(value) {
            if let Some(parsed) = parse_event_string(value) {
                debug!("Name input parsed as event: {:?}", parsed);
                let id = self.events[index].id.clone();
                self.events[index] = Event::from_parsed(id, &parsed);
                return true;
            }
        }
        self.events[index].name = value.to_string();
        false
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        let index = self.events.iter().position(|e| e.id == id);
        if index.is_none() {
            warn!("Unknown event row {}", id);
        }
        index
    }
}

fn rows_from_parsed(first_id: &str, parsed: &[ParsedEvent]) -> Vec<Event> {
    parsed
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let id = if i == 0 { first_id.to_string() } else { new_row_id() };
            Event::from_parsed(id, p)
        })
        .collect()
}
