pub mod command;
pub mod menu;
pub mod run;

pub use run::run_app;

use crate::domain::{AppError, Contact, Field, LoadOutcome, SaveStatus, Stats};
use std::io::{self, BufRead, Write};

/// Line-oriented terminal. Generic so the menu can be driven from tests.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    // INPUT FUNCTIONS

    /// Reads one trimmed line. A closed input is reported as `UnexpectedEof`.
    pub fn get_input(&mut self) -> Result<String, AppError> {
        self.output.flush()?;
        let mut input = String::new();
        if self.input.read_line(&mut input)? == 0 {
            return Err(AppError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        Ok(input.trim().to_string())
    }

    pub fn ask(&mut self, prompt: &str) -> Result<String, AppError> {
        write!(self.output, "{}", prompt)?;
        self.get_input()
    }

    pub fn confirm_action(&mut self, action: &str) -> Result<String, AppError> {
        self.ask(&format!("\nAre you sure you want to {}? (y/n): ", action))
    }

    /// Asks until the answer is blank or passes `field`'s format check.
    pub fn retry_optional(&mut self, prompt: &str, field: Field) -> Result<String, AppError> {
        loop {
            let input = self.ask(prompt)?;
            if input.is_empty() || field.accepts(&input) {
                return Ok(input);
            }
            self.say(&format!("{}", AppError::Validation(field.requirement().to_string())))?;
        }
    }
}

// OUTPUT FUNCTIONS

pub fn display_contact(position: usize, contact: &Contact) -> String {
    let mut output = format!("{}. {}", position, contact.name);

    let details = [
        ("Nickname", &contact.nickname),
        ("Phone", &contact.phone),
        ("Email", &contact.email),
        ("Web", &contact.website),
        ("Birthday", &contact.birthday),
        ("Category", &contact.category),
        ("Note", &contact.note),
    ];
    for (label, value) in details {
        if !value.is_empty() {
            output.push_str(&format!("\n   {}: {}", label, value));
        }
    }
    output
}

pub fn display_contacts<'a>(contacts: impl IntoIterator<Item = &'a Contact>) -> String {
    contacts
        .into_iter()
        .enumerate()
        .map(|(i, contact)| display_contact(i + 1, contact))
        .collect::<Vec<String>>()
        .join("\n\n")
}

/// One line: name plus whichever of phone and email are present.
pub fn display_summary(contact: &Contact) -> String {
    let mut info = contact.name.clone();
    if !contact.phone.is_empty() {
        info.push_str(&format!(" - Phone: {}", contact.phone));
    }
    if !contact.email.is_empty() {
        info.push_str(&format!(" - Email: {}", contact.email));
    }
    info
}

pub fn display_stats(stats: &Stats) -> String {
    let mut output = format!(
        "Total: {}\n\
        With phone: {}\n\
        With email: {}\n\
        With web: {}\n\
        With birthday: {}\n\
        With notes: {}",
        stats.total,
        stats.with_phone,
        stats.with_email,
        stats.with_website,
        stats.with_birthday,
        stats.with_note
    );

    if !stats.categories.is_empty() {
        output.push_str("\n\nCategories:");
        for (category, count) in &stats.categories {
            output.push_str(&format!("\n   - {}: {}", category, count));
        }
    }
    output
}

pub fn describe_load(outcome: &LoadOutcome) -> String {
    match outcome {
        LoadOutcome::Missing => "No saved contacts yet. Starting a new agenda.".to_string(),
        LoadOutcome::Loaded(count) => format!("{} contact(s) loaded", count),
        LoadOutcome::Degraded(e) => format!("Warning: {}. Starting a new agenda.", e),
    }
}

pub fn describe_save(status: &SaveStatus, location: &str) -> String {
    match status {
        SaveStatus::Saved(bytes) => format!("Saved to {} ({} bytes)", location, bytes),
        SaveStatus::Failed(e) => format!("Warning: could not save: {}", e),
    }
}

pub fn describe_cleared(field: &Field) -> String {
    format!("Ignored invalid {}: {}", field, field.requirement())
}
