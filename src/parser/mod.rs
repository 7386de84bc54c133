/// Event text parser module
///
/// Pure functions that turn pasted "Name on Date at Start - End" text into
/// structured events and compute their durations.
pub mod event;
pub mod extract;
pub mod format;
pub mod preprocess;
pub mod time;
pub mod utils;

pub use event::{ParsedEvent, is_event_format_string, parse_event_string};
pub use extract::{ExtractOptions, extract_events_from_text, extract_events_with, strip_html_tags};
pub use format::{format_duration, format_minutes_of_day, format_time_input, format_time_range};
pub use preprocess::preprocess_event_text;
pub use time::{TimeError, TimeOfDay, calculate_duration, parse_time_to_minutes};
