use std::fmt;

use thiserror::Error;

/// The scanner hit a byte no accepting prefix could absorb.
#[derive(Debug, Error, PartialEq, Eq)]
pub struct Error {
    pub byte: u8,
    pub offset: usize,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized character `{}` at byte {}",
            char::from(self.byte).escape_default(),
            self.offset
        )
    }
}
