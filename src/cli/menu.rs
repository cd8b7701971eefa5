use super::*;
use crate::domain::contact::{valid_email, valid_phone};
use crate::domain::{Confirmation, ContactChanges, ContactDraft, ContactManager, parse_position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddContact,
    ListContacts,
    SearchContacts,
    EditContact,
    DeleteContact,
    ShowStats,
    SaveAndExit,
}

impl MenuChoice {
    pub fn from_input(input: &str) -> Result<Self, AppError> {
        match input.trim() {
            "1" => Ok(MenuChoice::AddContact),
            "2" => Ok(MenuChoice::ListContacts),
            "3" => Ok(MenuChoice::SearchContacts),
            "4" => Ok(MenuChoice::EditContact),
            "5" => Ok(MenuChoice::DeleteContact),
            "6" => Ok(MenuChoice::ShowStats),
            "7" => Ok(MenuChoice::SaveAndExit),
            other => Err(AppError::ParseCommand(other.to_string())),
        }
    }
}

/// The interactive agenda: a numbered menu over one `ContactManager`.
pub struct Menu<'a, R, W> {
    manager: &'a mut ContactManager,
    console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(manager: &'a mut ContactManager, console: Console<R, W>) -> Self {
        Self { manager, console }
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Runs until the user picks save & exit or the input closes.
    pub fn run(&mut self) -> Result<(), AppError> {
        loop {
            let choice = match self.parse_choice() {
                Ok(choice) => choice,
                Err(e) if is_closed(&e) => return self.save_and_exit(),
                Err(e) => return Err(e),
            };

            let result = match choice {
                MenuChoice::AddContact => self.add_contact(),
                MenuChoice::ListContacts => self.list_contacts(),
                MenuChoice::SearchContacts => self.search_contacts(),
                MenuChoice::EditContact => self.edit_contact(),
                MenuChoice::DeleteContact => self.delete_contact(),
                MenuChoice::ShowStats => self.show_stats(),
                MenuChoice::SaveAndExit => return self.save_and_exit(),
            };

            match result {
                Ok(()) => {}
                Err(e) if is_closed(&e) => return self.save_and_exit(),
                Err(AppError::Io(e)) => return Err(AppError::Io(e)),
                Err(e) => self.console.say(&format!("{}", e))?,
            }
        }
    }

    fn parse_choice(&mut self) -> Result<MenuChoice, AppError> {
        self.console.say(
            "\n==================================================\n\
            \x20       CONTACT BOOK\n\
            ==================================================\n\
            1. Add contact\n\
            2. List contacts\n\
            3. Search contacts\n\
            4. Edit contact\n\
            5. Delete contact\n\
            6. Stats\n\
            7. Save and exit\n\
            ==================================================",
        )?;

        loop {
            let input = self.console.ask("Choose (1-7): ")?;
            match MenuChoice::from_input(&input) {
                Ok(choice) => return Ok(choice),
                Err(e) => self.console.say(&format!("{}. Try again.", e))?,
            }
        }
    }

    fn add_contact(&mut self) -> Result<(), AppError> {
        self.console.say("\n--- Add contact ---")?;

        let name = loop {
            let name = self.console.ask("Full name (* to go back): ")?;
            if name == "*" {
                return Ok(());
            }
            if !name.is_empty() {
                break name;
            }
            self.console.say("Name cannot be empty.")?;
        };

        let nickname = self.console.ask("Nickname (Enter to skip): ")?;
        let mut phone = self
            .console
            .retry_optional("Phone (Enter to skip): ", Field::Phone)?;
        let mut email = self
            .console
            .retry_optional("Email (Enter to skip): ", Field::Email)?;
        let website = self
            .console
            .retry_optional("Web page (Enter to skip): ", Field::Website)?;

        if phone.is_empty() && email.is_empty() {
            self.console.say("\nYou must enter at least a phone or an email")?;

            while phone.is_empty() && email.is_empty() {
                let candidate = self.console.ask("Phone: ")?;
                if !candidate.is_empty() {
                    if valid_phone(&candidate) {
                        phone = candidate;
                    } else {
                        self.console.say(Field::Phone.requirement())?;
                    }
                    continue;
                }

                let candidate = self.console.ask("Email: ")?;
                if valid_email(&candidate) {
                    email = candidate;
                } else if !candidate.is_empty() {
                    self.console.say(Field::Email.requirement())?;
                }
            }
        }

        let birthday = self.console.ask("Birthday (Enter to skip): ")?;
        let category = self.console.ask("Category (Enter to skip): ")?;
        let note = self.console.ask("Note (Enter to skip): ")?;

        let created = self.manager.create(ContactDraft {
            name,
            nickname,
            phone,
            email,
            website,
            birthday,
            category,
            note,
        })?;

        for field in &created.cleared {
            self.console.say(&describe_cleared(field))?;
        }
        self.report_save(&created.save)?;
        self.console.say(&format!(
            "\nContact #{} added successfully",
            created.position
        ))
    }

    fn list_contacts(&mut self) -> Result<(), AppError> {
        self.console.say("\n--- Contacts ---")?;
        if self.manager.is_empty() {
            return self.console.say("No contacts yet");
        }
        let listing = display_contacts(self.manager.iter());
        self.console.say(&listing)
    }

    fn search_contacts(&mut self) -> Result<(), AppError> {
        self.console.say("\n--- Search ---")?;
        let query = self.console.ask("Search by name/phone/email: ")?;

        let lines: Vec<String> = self
            .manager
            .find(&query)
            .into_iter()
            .map(display_summary)
            .collect();

        if lines.is_empty() {
            return self.console.say("No contacts found");
        }

        self.console.say(&format!("\n{} contact(s) found:", lines.len()))?;
        for line in lines {
            self.console.say(&format!("   - {}", line))?;
        }
        Ok(())
    }

    fn edit_contact(&mut self) -> Result<(), AppError> {
        self.console.say("\n--- Edit contact ---")?;
        let Some(position) = self.pick_position("\nNumber (or 'c' to cancel): ")? else {
            return Ok(());
        };

        let current = self.manager.get(position)?.clone();
        self.console.say(&format!("\nEditing: {}", current.name))?;
        self.console.say("Tip: type 'c' to cancel")?;

        let mut changes = ContactChanges::default();
        for field in [Field::Name, Field::Phone, Field::Email, Field::Website] {
            let value = current.value_of(field);
            let shown = if value.is_empty() { "(none)" } else { value };
            self.console.say(&format!("\n{}: {}", field, shown))?;

            let new_value = self.console.ask("New (Enter=keep, c=cancel): ")?;
            if new_value.eq_ignore_ascii_case("c") {
                return Err(AppError::Cancelled);
            }
            if !new_value.is_empty() {
                changes.set(field, new_value);
            }
        }

        let updated = self.manager.update(position, changes)?;
        for field in &updated.ignored {
            self.console.say(&describe_cleared(field))?;
        }
        self.report_save(&updated.save)?;
        self.console.say("\nContact updated")
    }

    fn delete_contact(&mut self) -> Result<(), AppError> {
        self.console.say("\n--- Delete contact ---")?;
        let Some(position) =
            self.pick_position("\nNumber of the contact to delete (or 'c' to cancel): ")?
        else {
            return Ok(());
        };

        let name = self.manager.get(position)?.name.clone();
        let reply = self.console.confirm_action(&format!("delete {}", name))?;

        let deleted = self
            .manager
            .delete(position, Confirmation::from_reply(&reply))?;
        self.report_save(&deleted.save)?;
        self.console.say("Contact deleted")
    }

    fn show_stats(&mut self) -> Result<(), AppError> {
        self.console.say("\n--- Stats ---")?;
        if self.manager.is_empty() {
            return self.console.say("No contacts yet");
        }
        let stats = self.manager.stats();
        self.console.say(&display_stats(&stats))
    }

    fn save_and_exit(&mut self) -> Result<(), AppError> {
        self.console.say("\nSaving...")?;
        let status = self.manager.save();
        self.report_save(&status)?;
        self.console.say("Goodbye!")
    }

    /// Lists the contacts and reads a position. `None` when there is nothing to
    /// pick or the user cancelled.
    fn pick_position(&mut self, prompt: &str) -> Result<Option<usize>, AppError> {
        if self.manager.is_empty() {
            self.console.say("No contacts yet")?;
            return Ok(None);
        }
        self.list_contacts()?;

        let entry = self.console.ask(prompt)?;
        if entry.eq_ignore_ascii_case("c") {
            self.console.say(&format!("{}", AppError::Cancelled))?;
            return Ok(None);
        }
        parse_position(&entry).map(Some)
    }

    fn report_save(&mut self, status: &SaveStatus) -> Result<(), AppError> {
        let location = self.manager.location();
        self.console.say(&describe_save(status, &location))
    }
}

fn is_closed(err: &AppError) -> bool {
    matches!(err, AppError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
}
