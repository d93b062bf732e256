//! The interactive front end: renders the active screen, reads one action per
//! line and feeds it to the session. All state changes go through
//! [`Screen::apply`]; this module only translates text.

use std::io::{self, BufRead, Write};

use serde::Serialize;

use crate::model::{Field, Registry, RegistrationForm};
use crate::session::{Action, Screen};
use crate::view;

/// How receipts and listings are printed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// What the voter typed.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Action(Action),
    Quit,
    Unknown(String),
}

/// Parse a single command line outside the registration form.
fn parse_command(line: &str) -> Input {
    let line = line.trim();
    if let Ok(id) = line.parse() {
        return Input::Action(Action::Select(id));
    }
    match line.to_ascii_lowercase().as_str() {
        "cast" => Input::Action(Action::Cast),
        "confirm" => Input::Action(Action::Confirm),
        "change" => Input::Action(Action::Change),
        "new" => Input::Action(Action::NewVote),
        "quit" | "exit" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

fn to_json(value: &impl Serialize) -> io::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print the registry, for `--list-candidates`.
pub fn list_candidates(
    registry: &Registry,
    format: OutputFormat,
    out: &mut impl Write,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => write!(out, "{}", view::candidates(registry, None)),
        OutputFormat::Json => writeln!(out, "{}", to_json(&registry.list())?),
    }
}

pub struct Wizard<R, W> {
    input: R,
    output: W,
    format: OutputFormat,
}

impl<R: BufRead, W: Write> Wizard<R, W> {
    pub fn new(input: R, output: W, format: OutputFormat) -> Self {
        Self {
            input,
            output,
            format,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the voter quits or the input ends. Returns the final screen.
    pub fn run(&mut self, mut screen: Screen) -> io::Result<Screen> {
        loop {
            self.render(&screen)?;
            let action = match self.read_input(&screen)? {
                Some(Input::Action(action)) => action,
                Some(Input::Quit) | None => break,
                Some(Input::Unknown(text)) => {
                    writeln!(self.output, "Notice: Unknown command \"{text}\"")?;
                    continue;
                }
            };
            let (next, result) = screen.apply(action);
            screen = next;
            if let Err(err) = result {
                writeln!(self.output, "Notice: {err}")?;
            }
        }
        writeln!(self.output, "Goodbye.")?;
        self.output.flush()?;
        Ok(screen)
    }

    fn render(&mut self, screen: &Screen) -> io::Result<()> {
        match screen {
            Screen::Registration(_) => {
                writeln!(self.output, "\n== Voter Registration ==")?;
            }
            Screen::CandidateSelection(session) => {
                let selected = session.selected().map(|c| c.id);
                writeln!(self.output, "\n== Select a Candidate ==")?;
                write!(
                    self.output,
                    "{}",
                    view::candidates(session.registry(), selected)
                )?;
                let cast = if session.can_cast_vote() {
                    "enabled"
                } else {
                    "disabled"
                };
                writeln!(
                    self.output,
                    "Enter a candidate number to select, `cast` to vote ({cast}), or `quit`."
                )?;
            }
            Screen::Confirmation(session) => {
                writeln!(self.output, "\n== Confirm Your Vote ==")?;
                write!(self.output, "{}", view::summary(session.summary()))?;
                writeln!(self.output, "Enter `confirm` to submit or `change` to go back.")?;
            }
            Screen::Receipt(session) => {
                writeln!(self.output, "\n== Thank You for Voting ==")?;
                match self.format {
                    OutputFormat::Text => {
                        write!(self.output, "{}", view::receipt(session.receipt()))?
                    }
                    OutputFormat::Json => {
                        writeln!(self.output, "{}", to_json(session.receipt())?)?
                    }
                }
                writeln!(self.output, "Enter `new` to start a new vote, or `quit`.")?;
            }
        }
        Ok(())
    }

    /// Read a line, without its trailing newline. `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        self.read_line()
    }

    fn read_input(&mut self, screen: &Screen) -> io::Result<Option<Input>> {
        if let Screen::Registration(_) = screen {
            let mut form = RegistrationForm::default();
            for field in Field::ALL {
                match self.prompt(field.label())? {
                    Some(value) => *form.field_mut(field) = value,
                    None => return Ok(None),
                }
            }
            return Ok(Some(Input::Action(Action::Register(form))));
        }
        Ok(self.prompt(">")?.map(|line| parse_command(&line)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::session::{FixedClock, Rules, Session};

    fn screen() -> Screen {
        log4rs_test_utils::test_logging::init_logging_once_for(["mock_voting"], None, None);
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        Session::with_clock(
            Arc::new(Registry::default()),
            Rules::default(),
            FixedClock::on(today),
        )
        .into()
    }

    fn run(script: &str, format: OutputFormat) -> (Screen, String) {
        let mut wizard = Wizard::new(Cursor::new(script.to_string()), Vec::new(), format);
        let screen = wizard.run(screen()).unwrap();
        let output = String::from_utf8(wizard.into_output()).unwrap();
        (screen, output)
    }

    #[test]
    fn commands() {
        assert_eq!(parse_command(" 3 "), Input::Action(Action::Select(3)));
        assert_eq!(parse_command("CAST"), Input::Action(Action::Cast));
        assert_eq!(parse_command("new"), Input::Action(Action::NewVote));
        assert_eq!(parse_command("exit"), Input::Quit);
        assert_eq!(parse_command("vote!"), Input::Unknown("vote!".to_string()));
        assert_eq!(parse_command("-1"), Input::Unknown("-1".to_string()));
    }

    #[test]
    fn scripted_vote() {
        let script = "V1\nAnn Lee\na@x.com\n2006-10-16\n3\ncast\nconfirm\nquit\n";
        let (screen, output) = run(script, OutputFormat::Text);
        assert_eq!(screen.name(), "receipt");
        assert!(output.contains("* [3] Michael Chen"));
        assert!(output.contains("Party: Future Forward"));
        assert!(output.contains("Voter: Ann Lee (V1)"));
        assert!(output.contains("Candidate: Michael Chen"));
        assert!(output.contains("Vote ID: VOTE-"));
        assert!(output.ends_with("Goodbye.\n"));
    }

    #[test]
    fn notices_keep_screen() {
        let script = "V1\n\na@x.com\n2006-10-16\n\
                      V1\nKid\nk@x.com\n2010-01-01\n\
                      V1\nAnn Lee\na@x.com\n2006-10-16\n\
                      cast\n12\nconfirm\nfoo\n";
        let (screen, output) = run(script, OutputFormat::Text);
        assert_eq!(screen.name(), "candidate selection");
        assert!(output.contains("Notice: Please fill in all fields"));
        assert!(output.contains("Notice: You must be at least 18 years old to vote"));
        assert!(output.contains("Notice: Please select a candidate"));
        assert!(output.contains("Notice: Candidate 12 not found"));
        assert!(output
            .contains("Notice: `confirm` is not available on the candidate selection screen"));
        assert!(output.contains("Notice: Unknown command \"foo\""));
        assert!(output.contains("`cast` to vote (disabled)"));
    }

    #[test]
    fn change_and_new_vote() {
        let script = "V1\nAnn Lee\na@x.com\n2006-10-16\n1\ncast\nchange\n2\ncast\nconfirm\nnew\n";
        let (screen, output) = run(script, OutputFormat::Text);
        // Input ran out on the registration form.
        assert_eq!(screen.name(), "registration");
        assert!(output.contains("`cast` to vote (enabled)"));
        assert!(output.contains("Candidate: Sarah Johnson"));
        assert_eq!(output.matches("== Voter Registration ==").count(), 2);
    }

    #[test]
    fn command_words_are_valid_field_values() {
        let script = "quit\nAnn\na@x.com\n1990-01-01\n1\n";
        let (screen, output) = run(script, OutputFormat::Text);
        assert_eq!(screen.name(), "candidate selection");
        assert!(output.contains("* [1] John Smith"));
        match screen {
            Screen::CandidateSelection(session) => {
                assert_eq!(session.voter().external_id, "quit")
            }
            other => panic!("expected candidate selection, got {}", other.name()),
        }
    }

    #[test]
    fn missing_fields_are_named() {
        let script = "V1\n\n\n2006-10-16\n";
        let (_, output) = run(script, OutputFormat::Text);
        assert!(output.contains("Notice: Please fill in all fields (missing: Full name, Email)"));
    }

    #[test]
    fn json_receipt() {
        let script = "V1\nAnn Lee\na@x.com\n2006-10-16\n4\ncast\nconfirm\n";
        let (_, output) = run(script, OutputFormat::Json);
        assert!(output.contains("\"voteId\": \"VOTE-"));
        assert!(output.contains("\"party\": \"Green Initiative\""));
        assert!(output.contains("\"externalId\": \"V1\""));
    }

    #[test]
    fn listing() {
        let registry = Registry::default();
        let mut out = Vec::new();
        list_candidates(&registry, OutputFormat::Json, &mut out).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[2]["name"], "Michael Chen");

        let mut out = Vec::new();
        list_candidates(&registry, OutputFormat::Text, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("[4] Emily Williams"));
    }
}
