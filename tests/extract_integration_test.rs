// End-to-end checks of pasted calendar text through extraction, the sheet
// and the rendered output
use evcalc::export::render;
use evcalc::parser::{
    ParsedEvent, extract_events_from_text, is_event_format_string, parse_event_string,
    preprocess_event_text,
};
use evcalc::{EventSheet, OutputFormat};
use pretty_assertions::assert_eq;

#[test]
fn event_shape_detection() {
    evcalc::init_logger();
    let line = "Meeting on Monday at 3 PM - 4 PM";
    assert!(is_event_format_string(line));
    assert!(!is_event_format_string(&format!("{}\nExtra", line)));
}

#[test]
fn single_event_parsing() {
    assert_eq!(
        parse_event_string("Team Sync on Jan 5 at 3:00 PM - 4:00 PM"),
        Some(ParsedEvent::new("Team Sync", "Jan 5", "3:00 PM", "4:00 PM"))
    );
    assert_eq!(parse_event_string("no delimiter here"), None);

    let event = parse_event_string("X on Y at 3 PM - 4 PM<p>desc</p>").unwrap();
    assert_eq!(event.end_time, "4 PM");
}

#[test]
fn nothing_to_extract() {
    assert!(extract_events_from_text("").is_empty());
    assert!(extract_events_from_text("random text").is_empty());
}

#[test]
fn collapsed_calendar_paste_is_split_back_into_events() {
    evcalc::init_logger();
    let paste = "Lunch on Jan 5 at 11 AM - noon Design Review on Jan 5 at 1:30 PM - 3 PM";
    assert_eq!(
        preprocess_event_text(paste),
        "Lunch on Jan 5 at 11 AM - noon\nDesign Review on Jan 5 at 1:30 PM - 3 PM"
    );

    let events = extract_events_from_text(paste);
    assert_eq!(
        events,
        vec![
            ParsedEvent::new("Lunch", "Jan 5", "11 AM", "noon"),
            ParsedEvent::new("Design Review", "Jan 5", "1:30 PM", "3 PM"),
        ]
    );

    let sheet = EventSheet::from_parsed(&events);
    assert_eq!(sheet.total_minutes(), 60 + 90);
    assert_eq!(sheet.total_display(), "2 h 30 min");
}

#[test]
fn html_descriptions_do_not_become_events() {
    let paste = "Standup on Mon at 9 AM - 9:15 AM<p>Daily sync</p>\n\
                 Planning on Mon at 10 AM - 11 AM<div>Room 4</div>";
    let names: Vec<String> = extract_events_from_text(paste).into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["Standup", "Planning"]);
}

#[test]
fn pasting_into_a_sheet_and_exporting() {
    let mut sheet = EventSheet::new();
    let first = sheet.events()[0].id.clone();
    let added = sheet.paste(&first, "A on Mon at 9 AM - 10 AM\nB on Tue at 11:00 PM - 1:00 AM");
    assert_eq!(added, 2);

    let mut buf = Vec::new();
    render(sheet.events(), OutputFormat::Csv, true, &mut buf).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "name,date,time_range,duration,duration_minutes\n\
         A,Mon,9 AM - 10 AM,1 h 00 min,60\n\
         B,Tue,11:00 PM - 1:00 AM,2 h 00 min,120\n"
    );
}
