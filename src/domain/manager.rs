use super::*;

use super::contact::now_local;
use log::{debug, warn};

/// Owns the ordered contact list and mediates every change through validation.
/// Contacts are addressed by their 1-based position at the time of the call.
pub struct ContactManager {
    contacts: Vec<Contact>,
    storage: Box<dyn ContactStore>,
}

#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing persisted yet.
    Missing,
    Loaded(usize),
    /// The file could not be read or parsed; the list starts empty.
    Degraded(AppError),
}

#[derive(Debug)]
pub enum SaveStatus {
    Saved(u64),
    Failed(AppError),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved(_))
    }
}

#[derive(Debug)]
pub struct Created {
    pub position: usize,
    /// Optional fields dropped because their format was invalid.
    pub cleared: Vec<Field>,
    pub save: SaveStatus,
}

#[derive(Debug)]
pub struct Updated {
    pub applied: Vec<Field>,
    pub ignored: Vec<Field>,
    pub save: SaveStatus,
}

#[derive(Debug)]
pub struct Deleted {
    pub contact: Contact,
    pub save: SaveStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

impl Confirmation {
    pub fn from_reply(reply: &str) -> Self {
        match reply.trim().to_lowercase().as_str() {
            "y" | "yes" | "s" | "si" | "sí" => Confirmation::Yes,
            _ => Confirmation::No,
        }
    }
}

impl ContactManager {
    pub fn new(storage: Box<dyn ContactStore>) -> Self {
        Self {
            contacts: Vec::new(),
            storage,
        }
    }

    /// Builds a manager and loads whatever the storage holds.
    pub fn open(storage: Box<dyn ContactStore>) -> (Self, LoadOutcome) {
        let mut manager = Self::new(storage);
        let outcome = manager.load();
        (manager, outcome)
    }

    /// Replaces the in-memory list with the persisted one. Never fails:
    /// unreadable or malformed files leave the list empty.
    pub fn load(&mut self) -> LoadOutcome {
        match self.storage.load() {
            Ok(Some(contacts)) => {
                debug!(
                    "loaded {} contact(s) from {}",
                    contacts.len(),
                    self.storage.location()
                );
                self.contacts = contacts;
                LoadOutcome::Loaded(self.contacts.len())
            }
            Ok(None) => {
                debug!("no contact file at {}", self.storage.location());
                self.contacts = Vec::new();
                LoadOutcome::Missing
            }
            Err(e) => {
                warn!(
                    "could not load contacts from {}: {}",
                    self.storage.location(),
                    e
                );
                self.contacts = Vec::new();
                LoadOutcome::Degraded(e)
            }
        }
    }

    pub fn save(&self) -> SaveStatus {
        match self.storage.save(&self.contacts) {
            Ok(bytes) => {
                debug!("saved {} bytes to {}", bytes, self.storage.location());
                SaveStatus::Saved(bytes)
            }
            Err(e) => {
                warn!(
                    "could not save contacts to {}: {}",
                    self.storage.location(),
                    e
                );
                SaveStatus::Failed(e)
            }
        }
    }

    pub fn location(&self) -> String {
        self.storage.location()
    }

    pub fn contact_list(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn get(&self, position: usize) -> Result<&Contact, AppError> {
        let index = self.index_of(position)?;
        Ok(&self.contacts[index])
    }

    /// Appends a new contact and saves. Invalid phone, email or website values are
    /// cleared; the contact is rejected when the name is blank or neither phone nor
    /// email survives.
    pub fn create(&mut self, draft: ContactDraft) -> Result<Created, AppError> {
        let (draft, cleared) = draft.sanitize();

        for field in &cleared {
            warn!("cleared invalid {} for new contact", field);
        }

        if draft.name.is_empty() {
            return Err(AppError::Validation(Field::Name.requirement().to_string()));
        }

        let contact = Contact::from_draft(draft, now_local());
        if !contact.has_phone_or_email() {
            return Err(AppError::Validation(
                "A contact needs at least a valid phone or email".to_string(),
            ));
        }

        self.contacts.push(contact);
        let position = self.contacts.len();

        Ok(Created {
            position,
            cleared,
            save: self.save(),
        })
    }

    pub fn find(&self, query: &str) -> Vec<&Contact> {
        search::search_contacts(&self.contacts, query)
    }

    /// Overwrites the supplied fields of the contact at `position` and saves.
    /// Blank values keep the current one; values failing their format check are
    /// skipped without failing the update.
    pub fn update(&mut self, position: usize, changes: ContactChanges) -> Result<Updated, AppError> {
        let index = self.index_of(position)?;
        let contact = &mut self.contacts[index];

        let mut applied = Vec::new();
        let mut ignored = Vec::new();

        let replacements = [
            (Field::Name, changes.name, &mut contact.name),
            (Field::Phone, changes.phone, &mut contact.phone),
            (Field::Email, changes.email, &mut contact.email),
            (Field::Website, changes.website, &mut contact.website),
        ];

        for (field, value, slot) in replacements {
            let Some(value) = value else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            if field.accepts(value) {
                *slot = value.to_string();
                applied.push(field);
            } else {
                warn!("ignored invalid {} for contact #{}", field, position);
                ignored.push(field);
            }
        }

        Ok(Updated {
            applied,
            ignored,
            save: self.save(),
        })
    }

    /// Removes the contact at `position` once the caller has confirmed, then saves.
    /// Later contacts move up one position.
    pub fn delete(
        &mut self,
        position: usize,
        confirmation: Confirmation,
    ) -> Result<Deleted, AppError> {
        let index = self.index_of(position)?;

        if confirmation != Confirmation::Yes {
            return Err(AppError::Cancelled);
        }

        let contact = self.contacts.remove(index);

        Ok(Deleted {
            contact,
            save: self.save(),
        })
    }

    pub fn stats(&self) -> Stats {
        Stats::collect(&self.contacts)
    }

    fn index_of(&self, position: usize) -> Result<usize, AppError> {
        if position == 0 || position > self.contacts.len() {
            return Err(AppError::IndexOutOfRange {
                position,
                len: self.contacts.len(),
            });
        }
        Ok(position - 1)
    }
}

/// Parses a 1-based position typed by the user.
pub fn parse_position(input: &str) -> Result<usize, AppError> {
    input
        .trim()
        .parse::<usize>()
        .map_err(|_| AppError::Selector(input.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonStorage, MemStorage};
    use std::fs;
    use std::rc::Rc;

    /// Shares one in-memory backend between a manager and the test body.
    struct Shared(Rc<MemStorage>);

    impl ContactStore for Shared {
        fn load(&self) -> Result<Option<Vec<Contact>>, AppError> {
            self.0.load()
        }
        fn save(&self, contacts: &[Contact]) -> Result<u64, AppError> {
            self.0.save(contacts)
        }
        fn location(&self) -> String {
            self.0.location()
        }
    }

    fn shared_manager() -> (ContactManager, Rc<MemStorage>) {
        let backend = Rc::new(MemStorage::new());
        let manager = ContactManager::new(Box::new(Shared(Rc::clone(&backend))));
        (manager, backend)
    }

    fn draft(name: &str, phone: &str, email: &str) -> ContactDraft {
        ContactDraft {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    fn names(manager: &ContactManager) -> Vec<&str> {
        manager.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn create_appends_and_saves() -> Result<(), AppError> {
        let (mut manager, backend) = shared_manager();

        let created = manager.create(draft("Uche", "0123-456-7890", ""))?;
        assert_eq!(created.position, 1);
        assert!(created.cleared.is_empty());
        assert!(created.save.is_saved());

        let created = manager.create(draft("Alex", "", "alex@example.com"))?;
        assert_eq!(created.position, 2);

        assert_eq!(names(&manager), vec!["Uche", "Alex"]);
        assert_eq!(backend.snapshot().unwrap_or_default(), manager.contact_list());
        Ok(())
    }

    #[test]
    fn create_rejects_blank_name_even_with_valid_phone() {
        let (mut manager, backend) = shared_manager();

        let err = manager.create(draft("   ", "5551234567", "")).unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(manager.is_empty());
        assert!(backend.snapshot().is_none());
    }

    #[test]
    fn create_rejects_contact_without_phone_or_email() {
        let (mut manager, _backend) = shared_manager();

        let mut input = draft("Ana", "", "");
        input.website = "ana.dev".to_string();
        input.note = "met at the conference".to_string();
        input.category = "work".to_string();

        assert!(matches!(
            manager.create(input),
            Err(AppError::Validation(_))
        ));
        assert!(manager.is_empty());
    }

    #[test]
    fn create_clears_invalid_optional_fields() -> Result<(), AppError> {
        let (mut manager, _backend) = shared_manager();

        let mut input = draft("Ana", "12345", "ana@mail.com");
        input.website = "ana dev".to_string();

        let created = manager.create(input)?;

        assert_eq!(created.cleared, vec![Field::Phone, Field::Website]);
        let stored = manager.get(1)?;
        assert_eq!(stored.phone, "");
        assert_eq!(stored.website, "");
        assert_eq!(stored.email, "ana@mail.com");
        Ok(())
    }

    #[test]
    fn create_rejects_when_only_phone_was_invalid() {
        let (mut manager, _backend) = shared_manager();

        assert!(manager.create(draft("Ana", "12345", "")).is_err());
        assert!(manager.is_empty());
    }

    #[test]
    fn find_matches_name_phone_and_email() -> Result<(), AppError> {
        let (mut manager, _backend) = shared_manager();
        manager.create(draft("John Smith", "5551234567", ""))?;
        manager.create(draft("Jane", "4449876543", "JOHN@X.com"))?;
        manager.create(draft("Zed", "", "zed@x.com"))?;

        let by_phone: Vec<&str> = manager.find("555").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(by_phone, vec!["John Smith"]);

        let by_name: Vec<&str> = manager.find("JOHN").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(by_name, vec!["John Smith", "Jane"]);

        assert!(manager.find("nobody").is_empty());
        Ok(())
    }

    #[test]
    fn update_with_invalid_email_keeps_current_and_still_saves() -> Result<(), AppError> {
        let (mut manager, backend) = shared_manager();
        manager.create(draft("Ana", "5551234567", "ana@mail.com"))?;

        // Drop what was saved on create so the update's save is observable
        backend.save(&[])?;

        let updated = manager.update(
            1,
            ContactChanges {
                email: Some("not-an-email".to_string()),
                ..Default::default()
            },
        )?;

        assert_eq!(updated.ignored, vec![Field::Email]);
        assert!(updated.applied.is_empty());
        assert!(updated.save.is_saved());
        assert_eq!(manager.get(1)?.email, "ana@mail.com");
        assert_eq!(backend.snapshot().unwrap_or_default().len(), 1);
        Ok(())
    }

    #[test]
    fn update_overwrites_valid_fields_only() -> Result<(), AppError> {
        let (mut manager, _backend) = shared_manager();
        manager.create(draft("Ana", "5551234567", ""))?;
        let created_at = manager.get(1)?.created_at.clone();

        let updated = manager.update(
            1,
            ContactChanges {
                name: Some("  Ana María ".to_string()),
                phone: Some("444-987-6543".to_string()),
                email: Some("   ".to_string()),
                website: Some("ana.dev".to_string()),
            },
        )?;

        assert_eq!(updated.applied, vec![Field::Name, Field::Phone, Field::Website]);
        assert!(updated.ignored.is_empty());

        let contact = manager.get(1)?;
        assert_eq!(contact.name, "Ana María");
        assert_eq!(contact.phone, "444-987-6543");
        assert_eq!(contact.email, "");
        assert_eq!(contact.website, "ana.dev");
        assert_eq!(contact.created_at, created_at);
        Ok(())
    }

    #[test]
    fn update_out_of_range_does_not_save() -> Result<(), AppError> {
        let (mut manager, backend) = shared_manager();
        manager.create(draft("Ana", "5551234567", ""))?;
        backend.save(&[])?;

        for position in [0, 2] {
            let err = manager
                .update(
                    position,
                    ContactChanges {
                        name: Some("Other".to_string()),
                        ..Default::default()
                    },
                )
                .unwrap_err();
            assert!(matches!(err, AppError::IndexOutOfRange { len: 1, .. }));
        }

        assert_eq!(manager.get(1)?.name, "Ana");
        assert_eq!(backend.snapshot(), Some(Vec::new()));
        Ok(())
    }

    #[test]
    fn delete_middle_contact_shifts_positions() -> Result<(), AppError> {
        let (mut manager, backend) = shared_manager();
        manager.create(draft("First", "5551111111", ""))?;
        manager.create(draft("Second", "5552222222", ""))?;
        manager.create(draft("Third", "5553333333", ""))?;

        let deleted = manager.delete(2, Confirmation::Yes)?;

        assert_eq!(deleted.contact.name, "Second");
        assert!(deleted.save.is_saved());
        assert_eq!(names(&manager), vec!["First", "Third"]);
        assert_eq!(manager.get(2)?.name, "Third");
        assert_eq!(backend.snapshot().unwrap_or_default().len(), 2);
        Ok(())
    }

    #[test]
    fn delete_requires_confirmation() -> Result<(), AppError> {
        let (mut manager, _backend) = shared_manager();
        manager.create(draft("Keep", "5551111111", ""))?;

        let err = manager.delete(1, Confirmation::No).unwrap_err();

        assert!(matches!(err, AppError::Cancelled));
        assert_eq!(manager.len(), 1);
        Ok(())
    }

    #[test]
    fn delete_out_of_range_is_reported() {
        let (mut manager, _backend) = shared_manager();

        let err = manager.delete(1, Confirmation::Yes).unwrap_err();

        assert!(matches!(
            err,
            AppError::IndexOutOfRange {
                position: 1,
                len: 0
            }
        ));
    }

    #[test]
    fn confirmation_replies() {
        for reply in ["y", "Y", "yes", "s", "SI", "sí", " y "] {
            assert_eq!(Confirmation::from_reply(reply), Confirmation::Yes, "{reply}");
        }
        for reply in ["", "n", "no", "maybe"] {
            assert_eq!(Confirmation::from_reply(reply), Confirmation::No, "{reply}");
        }
    }

    #[test]
    fn parses_positions() {
        assert_eq!(parse_position(" 3 ").unwrap(), 3);
        assert!(matches!(parse_position("two"), Err(AppError::Selector(_))));
        assert!(matches!(parse_position("-1"), Err(AppError::Selector(_))));
        assert!(matches!(parse_position(""), Err(AppError::Selector(_))));
    }

    #[test]
    fn stats_reflect_current_contacts() -> Result<(), AppError> {
        let (mut manager, _backend) = shared_manager();
        let mut input = draft("Ana", "5551234567", "ana@mail.com");
        input.category = "family".to_string();
        input.birthday = "12 May".to_string();
        manager.create(input)?;
        manager.create(draft("Beto", "", "beto@mail.com"))?;

        let stats = manager.stats();

        assert_eq!(stats.total, 2);
        assert_eq!(stats.with_phone, 1);
        assert_eq!(stats.with_email, 2);
        assert_eq!(stats.with_birthday, 1);
        assert_eq!(stats.categories, vec![("family".to_string(), 1)]);
        Ok(())
    }

    #[test]
    fn save_then_load_round_trips_through_json_file() -> Result<(), AppError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("contactos.json");

        let (mut manager, outcome) = ContactManager::open(Box::new(JsonStorage::new(&path)));
        assert!(matches!(outcome, LoadOutcome::Missing));

        let mut full = draft("Núria", "555 123 4567", "nuria@mail.com");
        full.nickname = "Nuri".to_string();
        full.website = "nuria.cat".to_string();
        full.birthday = "1990-02-03".to_string();
        full.category = "amigos".to_string();
        full.note = "prefers calls".to_string();
        manager.create(full)?;
        manager.create(draft("Bob", "", "bob@mail.com"))?;

        let (reloaded, outcome) = ContactManager::open(Box::new(JsonStorage::new(&path)));

        assert!(matches!(outcome, LoadOutcome::Loaded(2)));
        assert_eq!(reloaded.contact_list(), manager.contact_list());
        Ok(())
    }

    #[test]
    fn corrupted_file_degrades_to_empty_list() -> Result<(), AppError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("contactos.json");
        fs::write(&path, "{ broken")?;

        let (manager, outcome) = ContactManager::open(Box::new(JsonStorage::new(&path)));

        assert!(manager.is_empty());
        assert!(matches!(outcome, LoadOutcome::Degraded(AppError::Parse(_))));
        Ok(())
    }

    #[test]
    fn unreadable_file_degrades_to_empty_list() -> Result<(), AppError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("contactos.json");
        fs::create_dir(&path)?;

        let (manager, outcome) = ContactManager::open(Box::new(JsonStorage::new(&path)));

        assert!(manager.is_empty());
        assert!(matches!(outcome, LoadOutcome::Degraded(AppError::Io(_))));
        Ok(())
    }

    #[test]
    fn non_utf8_file_degrades_to_empty_list() -> Result<(), AppError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("contactos.json");
        fs::write(&path, [0xff, 0xfe, 0x5b, 0x5d])?;

        let (manager, outcome) = ContactManager::open(Box::new(JsonStorage::new(&path)));

        assert!(manager.is_empty());
        assert!(matches!(outcome, LoadOutcome::Degraded(AppError::Io(_))));
        Ok(())
    }

    #[test]
    fn odd_timestamp_does_not_cost_other_contacts() -> Result<(), AppError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("contactos.json");
        fs::write(
            &path,
            r#"[
                {"nombre": "Ana", "telefono": "5551234567", "fecha_creacion": "2024-01-02 03:04:05"},
                {"nombre": "Beto", "correo": "beto@mail.com", "fecha_creacion": "2024-01-02T03:04:05"}
            ]"#,
        )?;

        let (mut manager, outcome) = ContactManager::open(Box::new(JsonStorage::new(&path)));
        assert!(matches!(outcome, LoadOutcome::Loaded(2)));

        let created = manager.create(draft("Cy", "5559876543", ""))?;
        assert!(created.save.is_saved());

        let (reloaded, _) = ContactManager::open(Box::new(JsonStorage::new(&path)));
        let names: Vec<&str> = reloaded.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Beto", "Cy"]);
        assert_eq!(reloaded.get(2)?.created_at, "2024-01-02T03:04:05");
        Ok(())
    }

    #[test]
    fn failed_save_keeps_mutation_and_reports() -> Result<(), AppError> {
        let dir = tempfile::tempdir()?;
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "plain file")?;

        let mut manager = ContactManager::new(Box::new(JsonStorage::new(
            blocker.join("contactos.json"),
        )));

        let created = manager.create(draft("Ana", "5551234567", ""))?;

        assert!(matches!(created.save, SaveStatus::Failed(AppError::Io(_))));
        assert_eq!(manager.len(), 1);
        Ok(())
    }
}
