use super::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub with_phone: usize,
    pub with_email: usize,
    pub with_website: usize,
    pub with_birthday: usize,
    pub with_note: usize,
    /// Non-empty categories, most frequent first. Ties keep first-seen order.
    pub categories: Vec<(String, usize)>,
}

impl Stats {
    pub fn collect(contacts: &[Contact]) -> Self {
        let count = |filled: fn(&Contact) -> bool| contacts.iter().filter(|c| filled(c)).count();

        let mut categories: Vec<(String, usize)> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();

        for contact in contacts.iter().filter(|c| !c.category.is_empty()) {
            match slots.get(contact.category.as_str()) {
                Some(&slot) => categories[slot].1 += 1,
                None => {
                    slots.insert(&contact.category, categories.len());
                    categories.push((contact.category.clone(), 1));
                }
            }
        }

        // sort_by is stable
        categories.sort_by(|a, b| b.1.cmp(&a.1));

        Stats {
            total: contacts.len(),
            with_phone: count(|c| !c.phone.is_empty()),
            with_email: count(|c| !c.email.is_empty()),
            with_website: count(|c| !c.website.is_empty()),
            with_birthday: count(|c| !c.birthday.is_empty()),
            with_note: count(|c| !c.note.is_empty()),
            categories,
        }
    }
}
