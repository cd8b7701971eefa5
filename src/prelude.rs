pub use crate::cli::{command, run_app};
pub use crate::domain::{
    AppError, Confirmation, ContactManager, Created, Deleted, LoadOutcome, SaveStatus, Stats,
    Updated,
    contact::{self, Contact, ContactChanges, ContactDraft, Field},
    parse_position,
    search::search_contacts,
};
pub use crate::helper::{HostProbe, Location, ResolvedPath, resolve_storage_path};
pub use crate::storage::{self, ContactStore, JsonStorage, MemStorage};
