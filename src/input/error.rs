//! Input parsing errors

use std::fmt;
use std::error::Error;

/// Why did reading the configuration fail?
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum InputErrorKind {
    File,
    Location,
    Conversion,
    Invalid,
}

/// Error returned when Config::read fails, or when the values read
/// do not describe a valid region, beam or table.
pub struct InputError {
    kind: InputErrorKind,
    path: String,
    cause: String,
}

impl fmt::Debug for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let help_msg = "Usage: synrad input-file";
        match self.kind {
            InputErrorKind::File => write!(f, "Unable to open configuration file{}.\n{}", if self.path.is_empty() {String::new()} else {format!(" \"{}\"", self.path)}, help_msg),
            InputErrorKind::Location => write!(f, "Failed to follow specified path \"{}\": component \"{}\" is missing.\n{}", self.path, self.cause, help_msg),
            InputErrorKind::Conversion => write!(f, "Could not convert field \"{}\" (at \"{}\") to the expected type.\n{}", self.cause, self.path, help_msg),
            InputErrorKind::Invalid => write!(f, "Invalid value for \"{}\": {}.", self.path, self.cause),
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for InputError {}

impl InputError {
    fn new(kind: InputErrorKind, path: &str, cause: &str) -> Self {
        Self {kind, path: path.to_owned(), cause: cause.to_owned()}
    }

    pub fn file() -> Self {
        Self::new(InputErrorKind::File, "", "")
    }

    /// As [`InputError::file`], naming the file that could not be read.
    pub fn file_named(path: &str) -> Self {
        Self::new(InputErrorKind::File, path, "")
    }

    /// The component `cause` of `path` is missing.
    pub fn location(path: &str, cause: &str) -> Self {
        Self::new(InputErrorKind::Location, path, cause)
    }

    pub fn conversion(path: &str, cause: &str) -> Self {
        Self::new(InputErrorKind::Conversion, path, cause)
    }

    /// The value at `path` was read successfully, but is not acceptable.
    pub fn invalid(path: &str, cause: &str) -> Self {
        Self::new(InputErrorKind::Invalid, path, cause)
    }

    pub fn kind(&self) -> InputErrorKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = InputError::invalid("region:step", "must be positive");
        println!("{}", err);
        assert_eq!(err.kind(), InputErrorKind::Invalid);
        assert!(format!("{}", err).contains("region:step"));
        let err = InputError::location("beam:energy", "energy");
        assert!(format!("{}", err).contains("component \"energy\" is missing"));
    }
}
