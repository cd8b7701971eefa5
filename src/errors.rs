use core::fmt;

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Parse(String),
    ParseCommand(String),
    Validation(String),
    IndexOutOfRange { position: usize, len: usize },
    Selector(String),
    Unverified(String),
    Cancelled,
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => {
                write!(f, "I/O error while accessing a file or resource: {}", e)
            }
            AppError::Parse(msg) => {
                write!(f, "Contact file is not in the expected format: {}", msg)
            }
            AppError::ParseCommand(cmd) => {
                write!(f, "Unrecognized command: '{}'", cmd)
            }
            AppError::Validation(msg) => {
                write!(f, "Validation failed: {}", msg)
            }
            AppError::IndexOutOfRange { position, len } => {
                if *len == 0 {
                    write!(f, "Position {} is out of range: no contacts yet", position)
                } else {
                    write!(
                        f,
                        "Position {} is out of range: choose between 1 and {}",
                        position, len
                    )
                }
            }
            AppError::Selector(input) => {
                write!(f, "'{}' is not a contact number", input)
            }
            AppError::Unverified(path) => {
                write!(f, "Could not verify that {} was written", path)
            }
            AppError::Cancelled => {
                write!(f, "Operation cancelled")
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(e) => Some(e),
            _ => None,
        }
    }
}
