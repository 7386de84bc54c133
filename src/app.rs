use crate::calculator::{Event, EventSheet, FIRST_ROW_ID};
use crate::cli::Commands;
use crate::config::Config;
use crate::export::{OutputFormat, render};
use crate::parser::utils::sanitize_user_input;
use crate::parser::{
    TimeOfDay, calculate_duration, extract_events_with, format_duration, format_time_input,
    is_event_format_string, parse_event_string,
};
use anyhow::{Context, Result, anyhow};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

const PROMPT: &str = "evcalc> ";
const CONTINUATION_PROMPT: &str = "...> ";

const HELP_TEXT: &str = "\
Type or paste an event (\"<name> on <date> at <start> - <end>\") to fill the current row.
Plain text sets the current row's name. End a line with \\ to continue a multi-line paste.

Commands:
  add                 - Add a blank row and make it current
  list                - Show all rows with durations and the total
  range <n> <range>   - Set the time range of row n, e.g. range 2 9 AM - 10:30 AM
  remove <n>          - Remove row n
  total               - Show the total duration
  clear               - Reset to a single blank row
  help                - Show this help
  exit, quit          - Leave evcalc";

/// Whether the interactive loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Application {
    config: Config,
    sheet: EventSheet,
    current: String,
    pending: String,
}

impl Application {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sheet: EventSheet::new(),
            current: FIRST_ROW_ID.to_string(),
            pending: String::new(),
        }
    }

    pub fn sheet(&self) -> &EventSheet {
        &self.sheet
    }

    /// Run a one-shot command, or the interactive sheet when none is given.
    pub fn run(&mut self, command: Option<Commands>) -> Result<()> {
        match command {
            Some(command) => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                self.run_command(command, &mut out)
            }
            None => self.run_interactive(),
        }
    }

    pub fn run_command<W: Write>(&self, command: Commands, out: &mut W) -> Result<()> {
        match command {
            Commands::Duration { start, end } => {
                for time in [&start, &end] {
                    if let Err(e) = TimeOfDay::parse(time) {
                        log::warn!("'{}' is not a well-formed time ({}); using best effort", time, e);
                    }
                }
                let minutes = calculate_duration(&start, &end);
                writeln!(out, "{}", format_duration(minutes))?;
            }
            Commands::Parse { text } => {
                let text = sanitize_user_input(&text);
                match parse_event_string(&text) {
                    Some(event) => {
                        writeln!(
                            out,
                            "{} on {}: {} ({})",
                            event.name,
                            event.date,
                            event.time_range(),
                            format_duration(event.duration_minutes())
                        )?;
                    }
                    None => {
                        writeln!(
                            out,
                            "Not an event. Expected \"<name> on <date> at <start> - <end>\"."
                        )?;
                    }
                }
            }
            Commands::Extract { file, format } => {
                let text = read_input(file.as_deref())?;
                let format = format.unwrap_or(self.config.output.format);
                self.extract_to(&text, format, out)?;
            }
            Commands::FormatInput { raw } => {
                writeln!(out, "{}", format_time_input(&raw))?;
            }
        }
        Ok(())
    }

    /// Extract events from pasted text and render them with their total.
    pub fn extract_to<W: Write>(&self, text: &str, format: OutputFormat, out: &mut W) -> Result<()> {
        let text = sanitize_user_input(text);
        let events = extract_events_with(&text, self.config.parser.extract_options());
        log::info!("Extracted {} event(s)", events.len());

        if events.is_empty() {
            writeln!(out, "No events found.")?;
            return Ok(());
        }

        let sheet = EventSheet::from_parsed(&events);
        render(sheet.events(), format, self.config.output.show_date, out)
    }

    pub fn run_interactive(&mut self) -> Result<()> {
        log::info!("Starting evcalc interactive sheet");

        let mut rl = DefaultEditor::new()?;
        println!("Welcome to evcalc! Type 'help' for commands.");

        let stdout = io::stdout();
        loop {
            let prompt = if self.pending.is_empty() { PROMPT } else { CONTINUATION_PROMPT };
            match rl.readline(prompt) {
                Ok(line) => {
                    let _ = rl.add_history_entry(line.as_str());
                    let mut out = stdout.lock();
                    match self.process_line(&line, &mut out) {
                        Ok(Flow::Exit) => break,
                        Ok(Flow::Continue) => {}
                        Err(err) => log::error!("Failed to process input: {:?}", err),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handle one line of interactive input.
    ///
    /// A line ending in `\` is buffered and joined with the following lines
    /// by newlines, so a multi-line calendar paste reaches the sheet in one
    /// piece.
    pub fn process_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let line = sanitize_user_input(line);
        if let Some(head) = line.strip_suffix('\\') {
            self.pending.push_str(head);
            self.pending.push('\n');
            return Ok(Flow::Continue);
        }

        let input = if self.pending.is_empty() {
            line
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.push_str(&line);
            joined
        };

        // Event text wins over command words, so "list on Mon at ..." is an event
        if input.contains('\n') || is_event_format_string(&input) {
            return self.fill_current_row(&input, out);
        }

        let trimmed = input.trim();
        let (command, rest) = trimmed.split_once(char::is_whitespace).unwrap_or((trimmed, ""));
        let rest = rest.trim();

        match command {
            "" => Ok(Flow::Continue),
            "exit" | "quit" => Ok(Flow::Exit),
            "help" => {
                writeln!(out, "{}", HELP_TEXT)?;
                Ok(Flow::Continue)
            }
            "add" => {
                let id = self.sheet.add_event().id.clone();
                self.current = id;
                writeln!(out, "Added row {}", self.sheet.events().len())?;
                Ok(Flow::Continue)
            }
            "list" => {
                render(self.sheet.events(), OutputFormat::Table, self.config.output.show_date, out)?;
                Ok(Flow::Continue)
            }
            "total" => {
                writeln!(out, "Total: {}", self.sheet.total_display())?;
                Ok(Flow::Continue)
            }
            "clear" => {
                self.sheet.clear();
                self.current = FIRST_ROW_ID.to_string();
                writeln!(out, "Cleared all rows")?;
                Ok(Flow::Continue)
            }
            "range" => {
                let Some((row, range)) = rest.split_once(char::is_whitespace) else {
                    writeln!(out, "Usage: range <n> <start> - <end>")?;
                    return Ok(Flow::Continue);
                };
                let id = self.row_id(row)?;
                if let Some(event) = self.sheet.update_time_range(&id, range.trim()) {
                    writeln!(out, "{}", describe(event))?;
                }
                Ok(Flow::Continue)
            }
            "remove" => {
                if rest.is_empty() {
                    writeln!(out, "Usage: remove <n>")?;
                    return Ok(Flow::Continue);
                }
                let id = self.row_id(rest)?;
                self.sheet.remove_event(&id);
                if self.sheet.get(&self.current).is_none() {
                    self.current = self.last_row_id();
                }
                writeln!(out, "Removed row {}", rest)?;
                Ok(Flow::Continue)
            }
            _ => self.fill_current_row(&input, out),
        }
    }

    fn fill_current_row<W: Write>(&mut self, input: &str, out: &mut W) -> Result<Flow> {
        let filled = self.sheet.handle_name_input(&self.current, input);
        if filled > 1 {
            writeln!(out, "Added {} events", filled)?;
            writeln!(out, "Total: {}", self.sheet.total_display())?;
        } else if let Some(event) = self.sheet.get(&self.current) {
            writeln!(out, "{}", describe(event))?;
        }
        Ok(Flow::Continue)
    }

    /// Map a 1-based row number to the row's id.
    fn row_id(&self, row: &str) -> Result<String> {
        let n: usize = row
            .trim()
            .parse()
            .with_context(|| format!("Invalid row number '{}'", row.trim()))?;
        n.checked_sub(1)
            .and_then(|index| self.sheet.events().get(index))
            .map(|event| event.id.clone())
            .ok_or_else(|| anyhow!("No row {} (the sheet has {})", n, self.sheet.events().len()))
    }

    fn last_row_id(&self) -> String {
        self.sheet
            .events()
            .last()
            .map(|event| event.id.clone())
            .unwrap_or_else(|| FIRST_ROW_ID.to_string())
    }
}

fn describe(event: &Event) -> String {
    let mut text = if event.name.is_empty() { "(unnamed)".to_string() } else { event.name.clone() };
    if !event.date.is_empty() {
        text.push_str(&format!(" on {}", event.date));
    }
    if !event.time_range.is_empty() {
        text.push_str(&format!(": {}", event.time_range));
    }
    if !event.duration.is_empty() {
        text.push_str(&format!(" ({})", event.duration));
    }
    text
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn feed(app: &mut Application, line: &str) -> (Flow, String) {
        let mut buf = Vec::new();
        let flow = app.process_line(line, &mut buf).unwrap();
        (flow, String::from_utf8(buf).unwrap())
    }

    fn command_output(command: Commands) -> String {
        let app = Application::new(Config::default());
        let mut buf = Vec::new();
        app.run_command(command, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn duration_command_prints_formatted_minutes() {
        let output = command_output(Commands::Duration {
            start: "11:00 PM".to_string(),
            end: "1:00 AM".to_string(),
        });
        assert_eq!(output, "2 h 00 min\n");
    }

    #[test]
    fn parse_command_reports_event_or_rejection() {
        let output = command_output(Commands::Parse {
            text: "Team Sync on Jan 5 at 3:00 PM - 4:00 PM".to_string(),
        });
        assert_eq!(output, "Team Sync on Jan 5: 3:00 PM - 4:00 PM (1 h 00 min)\n");

        let output = command_output(Commands::Parse { text: "no delimiter here".to_string() });
        assert!(output.starts_with("Not an event."));
    }

    #[test]
    fn format_input_command() {
        let output = command_output(Commands::FormatInput { raw: "9-5p".to_string() });
        assert_eq!(output, "9:00 - 5:00 PM\n");
    }

    #[test]
    fn extract_reads_file_in_requested_format() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path: PathBuf = dir.path().join("paste.txt");
        fs::write(&path, "A on Mon at 9 AM - 10 AM\nB on Tue at noon - 1:30 PM\n")?;

        let output = command_output(Commands::Extract {
            file: Some(path),
            format: Some(OutputFormat::Csv),
        });
        assert_eq!(
            output,
            "name,date,time_range,duration,duration_minutes\n\
             A,Mon,9 AM - 10 AM,1 h 00 min,60\n\
             B,Tue,noon - 1:30 PM,1 h 30 min,90\n"
        );
        Ok(())
    }

    #[test]
    fn extract_reports_when_nothing_found() {
        let app = Application::new(Config::default());
        let mut buf = Vec::new();
        app.extract_to("random text", OutputFormat::Table, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No events found.\n");
    }

    #[test]
    fn extract_honours_disabled_fallback() {
        let mut config = Config::default();
        config.parser.fallback_scan = false;
        let app = Application::new(config);
        let mut buf = Vec::new();
        app.extract_to("<b>Demo</b> on <i>Thu</i> at 4 PM - 5 PM", OutputFormat::Json, &mut buf)
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No events found.\n");
    }

    #[test]
    fn missing_extract_file_is_an_error() {
        let app = Application::new(Config::default());
        let mut buf = Vec::new();
        let result = app.run_command(
            Commands::Extract { file: Some(PathBuf::from("/nonexistent/paste.txt")), format: None },
            &mut buf,
        );
        assert!(result.is_err());
    }

    #[test]
    fn typed_event_fills_current_row() {
        let mut app = Application::new(Config::default());
        let (flow, output) = feed(&mut app, "Lunch on Fri at noon - 1 PM");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(output, "Lunch on Fri: noon - 1 PM (1 h 00 min)\n");
        assert_eq!(app.sheet().total_minutes(), 60);
    }

    #[test]
    fn continued_lines_paste_many_events() {
        let mut app = Application::new(Config::default());
        assert_eq!(feed(&mut app, "Standup on Mon at 9 AM - 9:15 AM\\").1, "");
        let (_, output) = feed(&mut app, "Retro on Fri at 4 PM - 5 PM");
        assert_eq!(output, "Added 2 events\nTotal: 1 h 15 min\n");
        assert_eq!(app.sheet().events().len(), 2);
    }

    #[test]
    fn add_range_and_remove_rows() {
        let mut app = Application::new(Config::default());
        feed(&mut app, "Planning");
        assert_eq!(feed(&mut app, "add").1, "Added row 2\n");
        feed(&mut app, "Review");

        let (_, output) = feed(&mut app, "range 2 2 PM - 3:30 PM");
        assert_eq!(output, "Review: 2 PM - 3:30 PM (1 h 30 min)\n");
        assert_eq!(feed(&mut app, "total").1, "Total: 1 h 30 min\n");

        assert_eq!(feed(&mut app, "remove 2").1, "Removed row 2\n");
        assert_eq!(app.sheet().events().len(), 1);
        // current row falls back to the remaining one
        assert_eq!(feed(&mut app, "Retitled").1, "Retitled\n");
    }

    #[test]
    fn event_lines_starting_with_command_words_fill_the_row() {
        let mut app = Application::new(Config::default());
        let (flow, output) = feed(&mut app, "list on Mon at 9 AM - 10 AM");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(output, "list on Mon: 9 AM - 10 AM (1 h 00 min)\n");

        feed(&mut app, "add");
        let (_, output) = feed(&mut app, "total on Fri at 1 PM - 2:30 PM");
        assert_eq!(output, "total on Fri: 1 PM - 2:30 PM (1 h 30 min)\n");
        assert_eq!(app.sheet().total_minutes(), 150);

        feed(&mut app, "add");
        assert_eq!(feed(&mut app, "exit on Sat at noon - 1 PM").0, Flow::Continue);
        assert_eq!(feed(&mut app, "total").1, "Total: 3 h 30 min\n");
    }

    #[test]
    fn bad_row_numbers_are_errors() {
        let mut app = Application::new(Config::default());
        let mut buf = Vec::new();
        assert!(app.process_line("remove 5", &mut buf).is_err());
        assert!(app.process_line("range x 1 PM - 2 PM", &mut buf).is_err());
        assert!(app.process_line("remove 0", &mut buf).is_err());
    }

    #[test]
    fn usage_hints_and_exit() {
        let mut app = Application::new(Config::default());
        assert_eq!(feed(&mut app, "range").1, "Usage: range <n> <start> - <end>\n");
        assert_eq!(feed(&mut app, "remove").1, "Usage: remove <n>\n");
        assert_eq!(feed(&mut app, "   ").0, Flow::Continue);
        assert_eq!(feed(&mut app, "quit").0, Flow::Exit);
        assert_eq!(feed(&mut app, "exit").0, Flow::Exit);
    }

    #[test]
    fn clear_resets_the_sheet() {
        let mut app = Application::new(Config::default());
        feed(&mut app, "A on Mon at 9 AM - 10 AM");
        feed(&mut app, "add");
        assert_eq!(feed(&mut app, "clear").1, "Cleared all rows\n");
        assert_eq!(app.sheet().events(), EventSheet::new().events());
    }
}
