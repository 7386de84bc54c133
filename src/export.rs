//! Rendering of event rows as a text table, JSON or CSV

use crate::calculator::Event;
use crate::parser::format_duration;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    events: Vec<&'a Event>,
    total_minutes: i32,
    total: String,
}

/// Write the non-blank rows of `events` plus their total in `format`.
pub fn render<W: Write>(
    events: &[Event],
    format: OutputFormat,
    show_date: bool,
    out: &mut W,
) -> Result<()> {
    let rows: Vec<&Event> = events.iter().filter(|e| !e.is_blank()).collect();
    match format {
        OutputFormat::Table => write_table(&rows, show_date, out),
        OutputFormat::Json => write_json(&rows, out),
        OutputFormat::Csv => write_csv(&rows, out),
    }
}

fn total_minutes(rows: &[&Event]) -> i32 {
    rows.iter().fold(0i32, |total, e| total.saturating_add(e.duration_minutes))
}

fn write_table<W: Write>(rows: &[&Event], show_date: bool, out: &mut W) -> Result<()> {
    let name_width = rows.iter().map(|e| e.name.chars().count()).max().unwrap_or(0).max(5);
    let date_width = rows.iter().map(|e| e.date.chars().count()).max().unwrap_or(0).max(4);
    let range_width = rows.iter().map(|e| e.time_range.chars().count()).max().unwrap_or(0).max(10);

    let mut header = format!("{:<name_width$}  ", "Event");
    if show_date {
        header.push_str(&format!("{:<date_width$}  ", "Date"));
    }
    header.push_str(&format!("{:<range_width$}  Duration", "Time range"));
    writeln!(out, "{}", header)?;
    writeln!(out, "{}", "-".repeat(header.chars().count()))?;

    for event in rows {
        let mut line = format!("{:<name_width$}  ", event.name);
        if show_date {
            line.push_str(&format!("{:<date_width$}  ", event.date));
        }
        line.push_str(&format!("{:<range_width$}  {}", event.time_range, event.duration));
        writeln!(out, "{}", line.trim_end())?;
    }

    writeln!(out, "{}", "-".repeat(header.chars().count()))?;
    writeln!(out, "Total: {}", format_duration(total_minutes(rows)))?;
    Ok(())
}

fn write_json<W: Write>(rows: &[&Event], out: &mut W) -> Result<()> {
    let minutes = total_minutes(rows);
    let report = Report {
        events: rows.to_vec(),
        total_minutes: minutes,
        total: format_duration(minutes),
    };
    serde_json::to_writer_pretty(&mut *out, &report).context("Failed to write JSON output")?;
    writeln!(out)?;
    Ok(())
}

fn write_csv<W: Write>(rows: &[&Event], out: &mut W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["name", "date", "time_range", "duration", "duration_minutes"])?;
    for event in rows {
        let minutes = event.duration_minutes.to_string();
        writer
            .write_record([
                event.name.as_str(),
                event.date.as_str(),
                event.time_range.as_str(),
                event.duration.as_str(),
                minutes.as_str(),
            ])
            .context("Failed to write CSV row")?;
    }
    writer.flush()?;
    Ok(())
}
