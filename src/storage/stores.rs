use super::*;

use serde::Serialize;
use serde_json::{Serializer, Value, ser::PrettyFormatter};
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

const INDENT: &[u8] = b"    ";

/// Contacts kept in a single JSON file whose path is resolved by the caller.
pub struct JsonStorage {
    pub path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn scratch_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("contactos.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ContactStore for JsonStorage {
    fn load(&self) -> Result<Option<Vec<Contact>>, AppError> {
        if !fs::exists(&self.path)? {
            return Ok(None);
        }

        let data = fs::read_to_string(&self.path)?;

        // serde_json will give an error if data is empty
        if data.trim().is_empty() {
            return Ok(Some(Vec::new()));
        }

        let value: Value = serde_json::from_str(&data)?;
        Ok(Some(contacts_from_value(value)?))
    }

    fn save(&self, contacts: &[Contact]) -> Result<u64, AppError> {
        create_file_parent(&self.path)?;

        let mut data = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut data, PrettyFormatter::with_indent(INDENT));
        contacts.serialize(&mut serializer)?;

        // Write everything beside the target, then swap it in
        let scratch = self.scratch_path();
        let swapped = write_synced(&scratch, &data).and_then(|()| fs::rename(&scratch, &self.path));
        if let Err(e) = swapped {
            let _ = fs::remove_file(&scratch);
            return Err(e.into());
        }

        if !fs::exists(&self.path)? {
            return Err(AppError::Unverified(self.location()));
        }
        Ok(fs::metadata(&self.path)?.len())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

/// Accepts the current layout (a bare array) and the wrapped
/// `{"contacts": [...]}` layout of older files.
fn contacts_from_value(value: Value) -> Result<Vec<Contact>, AppError> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => {
            let list = map
                .remove("contacts")
                .or_else(|| map.remove("contactos"))
                .ok_or_else(|| {
                    AppError::Parse("expected an array or an object with \"contacts\"".to_string())
                })?;
            Ok(serde_json::from_value(list)?)
        }
        _ => Err(AppError::Parse(
            "expected an array or an object with \"contacts\"".to_string(),
        )),
    }
}
