//! Display formatting for times, ranges and durations

use super::time::MINUTES_PER_DAY;

/// Render a duration as `"<H> h <MM> min"`.
///
/// Hours are floored and the remainder keeps the sign of the input, so
/// negative durations come out as e.g. `"-1 h -30 min"` rather than failing.
pub fn format_duration(minutes: i32) -> String {
    let hours = minutes.div_euclid(60);
    let mins = minutes % 60;
    format!("{} h {:02} min", hours, mins)
}

/// Join a start and end token into the `"<start> - <end>"` display range.
pub fn format_time_range(start: &str, end: &str) -> String {
    format!("{} - {}", start.trim(), end.trim())
}

/// Render a minute-of-day as a 12-hour clock string such as `"3:15 PM"`.
pub fn format_minutes_of_day(minutes: i32) -> String {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    let hour_24 = minutes / 60;
    let minute = minutes % 60;
    let meridiem = if hour_24 < 12 { "AM" } else { "PM" };
    let hour_12 = match hour_24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour_12, minute, meridiem)
}

/// Live formatting for the time-range field while the user is typing.
///
/// Keeps digits, colons, whitespace, hyphens and the letters A/P/M, then
/// shapes each side of the range into `H:MM` with an optional meridiem.
/// Partial input like `"3"`, `"3:1"` or `"3:15 A"` is always accepted.
pub fn format_time_input(raw: &str) -> String {
    let filtered: String = raw
        .chars()
        .filter(|c| {
            c.is_ascii_digit()
                || *c == ':'
                || c.is_whitespace()
                || *c == '-'
                || matches!(*c, 'A' | 'a' | 'P' | 'p' | 'M' | 'm')
        })
        .collect();

    if filtered.contains('-') {
        let mut halves = filtered.split('-').map(str::trim);
        let start = halves.next().unwrap_or("");
        let end = halves.next().unwrap_or("");
        format!("{} - {}", format_time_with_meridiem(start), format_time_with_meridiem(end))
    } else {
        format_time_with_meridiem(&filtered)
    }
}

/// Shape one side of a time range into `H:MM` plus `AM`/`PM` if started.
pub fn format_time_with_meridiem(time: &str) -> String {
    if time.is_empty() {
        return String::new();
    }

    let upper = time.to_uppercase();
    let (meridiem, stripped) = if upper.contains('A') {
        ("AM", strip_meridiem_letters(time, 'a'))
    } else if upper.contains('P') {
        ("PM", strip_meridiem_letters(time, 'p'))
    } else {
        ("", time.to_string())
    };

    let stripped = stripped.trim();
    let digits_only = |s: &str| s.chars().filter(char::is_ascii_digit).collect::<String>();

    let parts: Vec<&str> = stripped.split(':').collect();
    let mut formatted = stripped.to_string();
    if parts.len() == 1 {
        let hours = digits_only(parts[0]);
        if !hours.is_empty() {
            formatted = format!("{}:00", hours);
        }
    } else {
        let hours = digits_only(parts[0]);
        let mut minutes = digits_only(parts[1]);
        if minutes.len() == 1 {
            minutes.push('0');
        } else if minutes.len() > 2 {
            minutes.truncate(2);
        }
        if !hours.is_empty() {
            formatted = format!("{}:{}", hours, minutes);
        }
    }

    if !meridiem.is_empty() {
        formatted = format!("{} {}", formatted, meridiem);
    }
    formatted
}

/// Remove every `x` / `xm` pair (either case) for the given meridiem letter.
fn strip_meridiem_letters(time: &str, letter: char) -> String {
    let mut out = String::with_capacity(time.len());
    let mut chars = time.chars().peekable();
    while let Some(c) = chars.next() {
        if c.eq_ignore_ascii_case(&letter) {
            if chars.peek().is_some_and(|n| n.eq_ignore_ascii_case(&'m')) {
                chars.next();
            }
            continue;
        }
        out.push(c);
    }
    out
}
