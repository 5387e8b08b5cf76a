use std::{io, string::FromUtf8Error};

use thiserror::Error;

use crate::item::csv::automaton::State;

/// Result type used throughout the crate.
pub type CsvResult<T> = Result<T, CsvError>;

#[derive(Error, Debug)]
/// Csv error
pub enum CsvError {
    /// The automaton found no transition for the current state and byte.
    ///
    /// The reader that returned this error is left in an indeterminate state
    /// and must be discarded.
    #[error(
        "unexpected {} in state {state} at byte {offset}",
        describe(.character)
    )]
    Parse {
        state: State,
        character: Option<u8>,
        offset: u64,
    },

    /// A field ending at `offset` could not be decoded as UTF-8.
    #[error("field ending at byte {offset} is not valid UTF-8")]
    Encoding {
        offset: u64,
        #[source]
        source: FromUtf8Error,
    },

    /// A format description could not be used.
    #[error("invalid CSV format: {0}")]
    Format(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn describe(character: &Option<u8>) -> String {
    match character {
        Some(byte) => format!("character '{}'", byte.escape_ascii()),
        None => "end of stream".to_string(),
    }
}
