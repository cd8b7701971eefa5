use std::fmt;

use chrono::{Local, NaiveDateTime, SubsecRound};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static PHONE_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10,}$").expect("valid phone regex"));

/// One record of the agenda. Optional fields are stored as empty text when absent,
/// which is also how they are written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "nombre_favorito", default, deserialize_with = "deserialize_text")]
    pub nickname: String,

    #[serde(rename = "telefono", default, deserialize_with = "deserialize_text")]
    pub phone: String,

    #[serde(rename = "correo", default, deserialize_with = "deserialize_text")]
    pub email: String,

    #[serde(rename = "pageweb", default, deserialize_with = "deserialize_text")]
    pub website: String,

    #[serde(rename = "cumples", default, deserialize_with = "deserialize_text")]
    pub birthday: String,

    #[serde(rename = "foco", default, deserialize_with = "deserialize_text")]
    pub category: String,

    #[serde(rename = "nota", default, deserialize_with = "deserialize_text")]
    pub note: String,

    /// Kept as written. Older files are not guaranteed to use `TIMESTAMP_FORMAT`.
    #[serde(
        rename = "fecha_creacion",
        default = "default_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub created_at: String,
}

/// Raw input for a new contact, as gathered by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub nickname: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub birthday: String,
    pub category: String,
    pub note: String,
}

/// Replacement values for an existing contact. `None` or blank keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phone,
    Email,
    Website,
}

impl Field {
    pub fn requirement(&self) -> &'static str {
        match self {
            Field::Name => "Name must not be empty",
            Field::Phone => {
                "Phone must contain at least 10 digits; spaces and hyphens are ignored"
            }
            Field::Email => "Email must contain '@' followed somewhere by a '.'",
            Field::Website => "Website must contain a '.' and no spaces (e.g. example.com)",
        }
    }

    /// Runs the format check for this field. Names only need to be non-empty.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Field::Name => !value.trim().is_empty(),
            Field::Phone => valid_phone(value),
            Field::Email => valid_email(value),
            Field::Website => valid_website(value),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Website => "website",
        };
        f.write_str(label)
    }
}

impl ContactDraft {
    /// Trims every field and clears phone, email or website values that fail
    /// their format check. Returns the cleaned draft and the cleared fields.
    pub fn sanitize(self) -> (ContactDraft, Vec<Field>) {
        let mut rejected = Vec::new();

        let mut checked = |field: Field, value: String| -> String {
            let value = value.trim().to_string();
            if value.is_empty() || field.accepts(&value) {
                value
            } else {
                rejected.push(field);
                String::new()
            }
        };

        let phone = checked(Field::Phone, self.phone);
        let email = checked(Field::Email, self.email);
        let website = checked(Field::Website, self.website);

        let draft = ContactDraft {
            name: self.name.trim().to_string(),
            nickname: self.nickname.trim().to_string(),
            phone,
            email,
            website,
            birthday: self.birthday.trim().to_string(),
            category: self.category.trim().to_string(),
            note: self.note.trim().to_string(),
        };
        (draft, rejected)
    }
}

impl ContactChanges {
    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::Website => &mut self.website,
        };
        *slot = Some(value);
    }
}

impl Contact {
    pub fn from_draft(draft: ContactDraft, created_at: NaiveDateTime) -> Self {
        Contact {
            name: draft.name,
            nickname: draft.nickname,
            phone: draft.phone,
            email: draft.email,
            website: draft.website,
            birthday: draft.birthday,
            category: draft.category,
            note: draft.note,
            created_at: created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn value_of(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::Website => &self.website,
        }
    }

    pub fn has_phone_or_email(&self) -> bool {
        !self.phone.is_empty() || !self.email.is_empty()
    }

    pub fn created_at_display(&self) -> &str {
        &self.created_at
    }
}

pub fn valid_phone(phone: &str) -> bool {
    // Spaces and hyphens are separators, everything else must be a digit
    let stripped: String = phone
        .trim()
        .chars()
        .filter(|&c| c != '-' && c != ' ')
        .collect();
    PHONE_DIGITS.is_match(&stripped)
}

pub fn valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((_, domain)) => domain.contains('.'),
        None => false,
    }
}

pub fn valid_website(website: &str) -> bool {
    website.contains('.') && !website.chars().any(char::is_whitespace)
}

/// Local time truncated to whole seconds, matching what the file can hold.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

fn default_timestamp() -> String {
    now_local().format(TIMESTAMP_FORMAT).to_string()
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_else(default_timestamp)) // records written without a date
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
