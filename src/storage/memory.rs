use super::*;
use std::cell::RefCell;

/// Keeps the last saved collection in memory. Nothing touches the disk.
pub struct MemStorage {
    data: RefCell<Option<Vec<Contact>>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            data: RefCell::new(None),
        }
    }

    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        Self {
            data: RefCell::new(Some(contacts)),
        }
    }

    pub fn snapshot(&self) -> Option<Vec<Contact>> {
        self.data.borrow().clone()
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactStore for MemStorage {
    fn load(&self) -> Result<Option<Vec<Contact>>, AppError> {
        Ok(self.data.borrow().clone())
    }

    fn save(&self, contacts: &[Contact]) -> Result<u64, AppError> {
        let size = serde_json::to_vec(contacts)?.len() as u64;
        *self.data.borrow_mut() = Some(contacts.to_vec());
        Ok(size)
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
