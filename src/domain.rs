pub mod contact;
pub mod manager;
pub mod search;
pub mod stats;

pub use crate::errors::AppError;
pub use crate::storage::ContactStore;
pub use contact::{Contact, ContactChanges, ContactDraft, Field};
pub use manager::{
    Confirmation, ContactManager, Created, Deleted, LoadOutcome, SaveStatus, Updated,
    parse_position,
};
pub use stats::Stats;
