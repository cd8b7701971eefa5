pub mod memory;
pub mod stores;

use crate::prelude::{AppError, Contact};
use std::fs;
use std::path::Path;

pub use memory::MemStorage;
pub use stores::JsonStorage;

/// Whole-collection persistence. Implementations rewrite everything on save.
pub trait ContactStore {
    /// `Ok(None)` means nothing has been persisted yet.
    fn load(&self) -> Result<Option<Vec<Contact>>, AppError>;

    /// Returns the number of bytes written.
    fn save(&self, contacts: &[Contact]) -> Result<u64, AppError>;

    fn location(&self) -> String;
}

pub fn create_file_parent(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
