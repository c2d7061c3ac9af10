//! Errors raised while building or loading tables

use std::fmt;
use std::error::Error;

/// Why a table could not be constructed.
pub enum TableError {
    /// The table has fewer entries than the lookup needs
    TooShort(String, usize),
    /// The data does not fill the declared shape
    Shape(String, usize, usize),
    /// A header that must be strictly ascending is not
    NotAscending(String, usize),
    /// A value could not be parsed as a number
    Parse(String, usize, String),
    /// A required section or row is absent
    Missing(String, String),
    /// The values were read, but are not acceptable
    Invalid(String, String),
    /// The source could not be read at all
    Io(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TableError::TooShort(name, n) =>
                write!(f, "table '{}' has {} entries, at least 2 are required", name, n),
            TableError::Shape(name, expected, got) =>
                write!(f, "table '{}' expected {} values, got {}", name, expected, got),
            TableError::NotAscending(name, i) =>
                write!(f, "table '{}' is not strictly ascending at entry {}", name, i),
            TableError::Parse(name, line, token) =>
                write!(f, "table '{}', line {}: could not parse '{}' as a number", name, line, token),
            TableError::Missing(name, what) =>
                write!(f, "table '{}' is missing {}", name, what),
            TableError::Invalid(name, cause) =>
                write!(f, "table '{}': {}", name, cause),
            TableError::Io(cause) =>
                write!(f, "unable to read table: {}", cause),
        }
    }
}

impl fmt::Debug for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for TableError {}

impl From<std::io::Error> for TableError {
    fn from(e: std::io::Error) -> Self {
        TableError::Io(e.to_string())
    }
}

/// Checks that `v` is strictly ascending, reporting the first
/// offending index otherwise.
pub fn check_ascending(name: &str, v: &[f64]) -> Result<(), TableError> {
    if v.len() < 2 {
        return Err(TableError::TooShort(name.to_owned(), v.len()));
    }
    match v.windows(2).position(|w| !(w[1] > w[0])) {
        Some(i) => Err(TableError::NotAscending(name.to_owned(), i + 1)),
        None => Ok(()),
    }
}
