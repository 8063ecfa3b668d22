//! Operator interaction surface.
//!
//! The pipeline suspends only on blocking prompts: a missing module
//! configuration, a machine display name, or the recipe opt-in. All of
//! them go through the [`Operator`] trait so the core transform logic can
//! be tested with a scripted operator instead of stdin.
//!
//! The console implementation re-prompts on invalid input; a blank path
//! answer means "cancel" and is surfaced as `None`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::error::{PromptError, PromptResult};
use crate::models::Language;

/// Capability interface for operator prompts.
pub trait Operator {
    /// Ask for a non-empty string.
    fn ask_str(&mut self, prompt: &str) -> PromptResult<String>;

    /// Ask for an integer.
    fn ask_int(&mut self, prompt: &str) -> PromptResult<i64>;

    /// Ask a yes/no question.
    fn ask_yes_no(&mut self, prompt: &str) -> PromptResult<bool>;

    /// Ask for an existing file path with one of the allowed extensions.
    /// A blank answer cancels and returns `None`.
    fn ask_path(&mut self, prompt: &str, allowed_suffixes: &[&str]) -> PromptResult<Option<PathBuf>>;
}

// =============================================================================
// Console operator
// =============================================================================

/// Operator reading answers from stdin, writing prompts to stderr.
#[derive(Debug, Default)]
pub struct ConsoleOperator;

impl ConsoleOperator {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self, prompt: &str) -> PromptResult<String> {
        eprint!("{}", prompt);
        io::stderr().flush().map_err(PromptError::Io)?;
        read_trimmed(&mut io::stdin().lock())
    }
}

/// Read one answer line. Zero bytes means the input is closed, which must
/// surface as an error: the re-prompting loops would otherwise treat EOF
/// as an endless stream of blank answers.
fn read_trimmed(reader: &mut dyn BufRead) -> PromptResult<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(PromptError::ClosedInput);
    }
    Ok(line.trim().trim_matches('"').to_string())
}

impl Operator for ConsoleOperator {
    fn ask_str(&mut self, prompt: &str) -> PromptResult<String> {
        loop {
            let answer = self.read_line(prompt)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            eprintln!("Invalid input. Please enter a non-empty string.");
        }
    }

    fn ask_int(&mut self, prompt: &str) -> PromptResult<i64> {
        loop {
            let answer = self.read_line(prompt)?;
            match answer.parse::<i64>() {
                Ok(n) => return Ok(n),
                Err(_) => eprintln!("Invalid input. Please enter a number."),
            }
        }
    }

    fn ask_yes_no(&mut self, prompt: &str) -> PromptResult<bool> {
        loop {
            let answer = self
                .read_line(&format!("{} (y/n): ", prompt))?
                .to_lowercase();
            match answer.as_str() {
                "y" | "yes" | "o" | "oui" => return Ok(true),
                "n" | "no" | "non" => return Ok(false),
                _ => eprintln!("Invalid input. Please answer y/n."),
            }
        }
    }

    fn ask_path(&mut self, prompt: &str, allowed_suffixes: &[&str]) -> PromptResult<Option<PathBuf>> {
        loop {
            let answer = self.read_line(prompt)?;
            if answer.is_empty() {
                eprintln!("No file selected.");
                return Ok(None);
            }

            let path = PathBuf::from(&answer);
            if !path.exists() {
                eprintln!("The file does not exist.");
                continue;
            }
            if !path.is_file() {
                eprintln!("The given path is not a file.");
                continue;
            }

            let suffix = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
                .unwrap_or_default();
            if !allowed_suffixes.contains(&suffix.as_str()) {
                eprintln!("Please select a file among: {}", allowed_suffixes.join(", "));
                continue;
            }

            return Ok(Some(path));
        }
    }
}

// =============================================================================
// Fixed prompts
// =============================================================================

/// Allowed workbook extensions.
pub const WORKBOOK_SUFFIXES: &[&str] = &[".xlsx", ".xlsm", ".xls"];

/// Allowed recipe store extensions.
pub const STORE_SUFFIXES: &[&str] = &[".sqlite3", ".db"];

/// Ask for the input workbook path. `None` means the operator cancelled.
pub fn ask_workbook(op: &mut dyn Operator) -> PromptResult<Option<PathBuf>> {
    op.ask_path("Path to the Excel workbook: ", WORKBOOK_SUFFIXES)
}

/// Ask for the recipe store path. `None` means the operator cancelled.
pub fn ask_store(op: &mut dyn Operator) -> PromptResult<Option<PathBuf>> {
    op.ask_path("Path to the recipe store (sqlite3): ", STORE_SUFFIXES)
}

/// Show the language menu and ask for the client language.
pub fn ask_language(op: &mut dyn Operator) -> PromptResult<Language> {
    eprintln!("Available languages:");
    for (i, lang) in Language::MENU.iter().enumerate() {
        eprintln!("{} - {}", i, lang.as_str());
    }

    loop {
        let choice = op.ask_int("Language number to use for the client: ")?;
        if let Ok(index) = usize::try_from(choice) {
            if let Some(lang) = Language::from_menu_index(index) {
                return Ok(lang);
            }
        }
        eprintln!(
            "Please enter a number between 0 and {}.",
            Language::MENU.len() - 1
        );
    }
}

// =============================================================================
// Scripted operator (tests)
// =============================================================================

/// Test operator replaying a fixed list of answers.
#[cfg(test)]
#[derive(Debug)]
pub struct ScriptedOperator {
    answers: std::collections::VecDeque<String>,
}

#[cfg(test)]
impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn exhausted(&self) -> bool {
        self.answers.is_empty()
    }

    fn next(&mut self) -> String {
        self.answers
            .pop_front()
            .expect("scripted operator ran out of answers")
    }
}

#[cfg(test)]
impl Operator for ScriptedOperator {
    fn ask_str(&mut self, _prompt: &str) -> PromptResult<String> {
        Ok(self.next())
    }

    fn ask_int(&mut self, _prompt: &str) -> PromptResult<i64> {
        Ok(self.next().parse().expect("scripted answer is not an int"))
    }

    fn ask_yes_no(&mut self, _prompt: &str) -> PromptResult<bool> {
        Ok(matches!(self.next().as_str(), "y" | "yes"))
    }

    fn ask_path(&mut self, _prompt: &str, _allowed: &[&str]) -> PromptResult<Option<PathBuf>> {
        let answer = self.next();
        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(answer)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_language_retries_out_of_range() {
        let mut op = ScriptedOperator::new(["9", "2"]);
        let lang = ask_language(&mut op).unwrap();
        assert_eq!(lang, Language::En);
        assert!(op.exhausted());
    }

    #[test]
    fn test_scripted_path_blank_cancels() {
        let mut op = ScriptedOperator::new([""]);
        assert_eq!(ask_store(&mut op).unwrap(), None);
    }

    #[test]
    fn test_closed_input_errors_instead_of_blank_answer() {
        let mut closed: &[u8] = b"";
        let err = read_trimmed(&mut closed).unwrap_err();
        assert!(matches!(err, PromptError::ClosedInput));
    }

    #[test]
    fn test_read_trimmed_strips_whitespace_and_quotes() {
        let mut input: &[u8] = b"  \"C:\\config.xlsx\"  \n";
        assert_eq!(read_trimmed(&mut input).unwrap(), "C:\\config.xlsx");
    }
}
