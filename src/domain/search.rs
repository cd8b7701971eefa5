use super::*;

/// Lowercased, trimmed form of a search query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// `needle` must already be normalized. Name and email are compared
/// case-folded, the phone as stored.
pub fn contact_matches(contact: &Contact, needle: &str) -> bool {
    contact.name.to_lowercase().contains(needle)
        || contact.phone.contains(needle)
        || contact.email.to_lowercase().contains(needle)
}

pub fn search_contacts<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    let needle = normalize_query(query);
    contacts
        .iter()
        .filter(|contact| contact_matches(contact, &needle))
        .collect()
}
