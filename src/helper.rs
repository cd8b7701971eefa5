use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

pub const FILE_NAME: &str = "contactos.json";
pub const NOTEBOOK_ROOT: &str = "/content";
pub const NOTEBOOK_DRIVE: &str = "/content/drive/MyDrive";
pub const DRIVE_FOLDER: &str = "AgendaContactos";

/// Where the contact file ended up being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Explicit,
    NotebookDrive,
    NotebookScratch,
    Local,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Location::Explicit => "explicit path",
            Location::NotebookDrive => "hosted notebook + drive",
            Location::NotebookScratch => "hosted notebook (temporary)",
            Location::Local => "local directory",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub location: Location,
}

/// What the resolver needs to know about the host.
#[derive(Debug, Clone)]
pub struct HostProbe {
    pub hosted_notebook: bool,
    pub notebook_root: PathBuf,
    pub drive_root: PathBuf,
}

impl HostProbe {
    pub fn detect() -> Self {
        let hosted_notebook =
            get_env_value_by_key("COLAB_RELEASE_TAG").is_some() || Path::new(NOTEBOOK_ROOT).is_dir();
        Self {
            hosted_notebook,
            notebook_root: PathBuf::from(NOTEBOOK_ROOT),
            drive_root: PathBuf::from(NOTEBOOK_DRIVE),
        }
    }
}

/// Picks the contact file once at startup. An explicit path always wins; on a hosted
/// notebook the mounted drive is preferred, then the notebook's scratch directory;
/// anywhere else the file lives in the working directory.
pub fn resolve_storage_path(explicit: Option<&str>, probe: &HostProbe) -> ResolvedPath {
    if let Some(path) = explicit.map(str::trim).filter(|p| !p.is_empty()) {
        return ResolvedPath {
            path: PathBuf::from(path),
            location: Location::Explicit,
        };
    }

    if probe.hosted_notebook {
        if probe.drive_root.is_dir() {
            let folder = probe.drive_root.join(DRIVE_FOLDER);
            match fs::create_dir_all(&folder) {
                Ok(()) => {
                    debug!("using drive folder {}", folder.display());
                    return ResolvedPath {
                        path: folder.join(FILE_NAME),
                        location: Location::NotebookDrive,
                    };
                }
                Err(e) => warn!("could not prepare {}: {}", folder.display(), e),
            }
        }

        return ResolvedPath {
            path: probe.notebook_root.join(FILE_NAME),
            location: Location::NotebookScratch,
        };
    }

    ResolvedPath {
        path: PathBuf::from(FILE_NAME),
        location: Location::Local,
    }
}

/// `None` when the variable is unset or not valid unicode.
pub fn get_env_value_by_key(key: &str) -> Option<String> {
    env::var(key).ok()
}
