//! Output-related errors

use std::fmt;
use std::error::Error;

pub enum OutputError {
    /// A distribution function that could not be parsed, with the
    /// reason if known
    Conversion(String, String, Option<String>),
    /// A file that could not be written
    Write(String, std::io::Error),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutputError::Conversion(s, t, Some(cause)) => write!(f, "'{}' is not a valid {}: {}", s, t, cause),
            OutputError::Conversion(s, t, None) => write!(f, "'{}' is not a valid {}", s, t),
            OutputError::Write(s, e) => write!(f, "could not write '{}': {}", s, e),
        }
    }
}

impl fmt::Debug for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for OutputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            OutputError::Write(_, e) => Some(e),
            _ => None,
        }
    }
}

impl OutputError {
    pub fn conversion(field: &str, target: &str) -> Self {
        Self::Conversion(field.to_owned(), target.to_owned(), None)
    }

    pub fn conversion_explained(field: &str, target: &str, cause: &str) -> Self {
        Self::Conversion(field.to_owned(), target.to_owned(), Some(cause.to_owned()))
    }

    pub fn write(filename: &str, err: std::io::Error) -> Self {
        Self::Write(filename.to_owned(), err)
    }
}
