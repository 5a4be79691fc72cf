//! # Error Types
//!
//! This module defines all error types for the MML compiler.
//!
//! Every failure is terminal for the compilation it happens in. Errors raised
//! while scanning or parsing carry the position of the offending token; errors
//! raised while executing commands are wrapped in [`MmlError::Execution`] with
//! the position of the command that failed.
//!
//! ## Error Kinds
//! - `Lexical` - an illegal character in the source
//! - `Syntax` - a missing argument or a token that cannot start a command
//! - `Range` - numeric overflow, or a tempo/length/octave outside its bounds
//! - `Semantic` - unknown note, pitch outside the playable range, bad length
//!
//! ## Usage
//! ```rust
//! use mmlc::{compile, ErrorKind};
//!
//! match compile(" ABCDo7") {
//!     Ok(segments) => println!("{} segments", segments.len()),
//!     Err(e) if e.kind() == ErrorKind::Range => {
//!         let position = e.position().unwrap();
//!         assert_eq!((position.line, position.column), (1, 6));
//!     }
//!     Err(e) => panic!("unexpected error: {}", e),
//! }
//! ```

use crate::ast::{CommandName, Position};
use std::fmt;
use thiserror::Error;

/// Broad classification of an [`MmlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Range,
    Semantic,
}

/// Performer settings with bounded values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Tempo,
    DefaultLength,
    Octave,
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Setting::Tempo => "tempo",
            Setting::DefaultLength => "default length",
            Setting::Octave => "octave",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MmlError {
    /// A character the scanner does not recognize.
    ///
    /// # Example
    /// ```
    /// # use mmlc::{MmlError, Position};
    /// let err = MmlError::InvalidToken {
    ///     lexeme: "H".to_string(),
    ///     position: Position::new(1, 2),
    /// };
    /// assert_eq!(err.to_string(), "invalid token 'H' at line 1, column 2");
    /// ```
    #[error("invalid token '{lexeme}' at {position}")]
    InvalidToken { lexeme: String, position: Position },

    /// A command that requires a numeric argument was not followed by one.
    #[error("{command} command at {position}: expected numeric argument")]
    MissingArgument {
        command: CommandName,
        position: Position,
    },

    /// A valid token in a place where a new command must start.
    #[error("expected command, got '{lexeme}' at {position}")]
    UnexpectedToken { lexeme: String, position: Position },

    /// A numeric literal that does not fit in a signed 64-bit integer.
    #[error("{command} command at {position}: numeric argument {literal}: value out of range")]
    NumericOverflow {
        command: CommandName,
        literal: String,
        position: Position,
    },

    /// A tempo, default length or octave outside its allowed bounds.
    ///
    /// # Example
    /// ```
    /// # use mmlc::{MmlError, Setting};
    /// let err = MmlError::OutOfRange {
    ///     setting: Setting::Tempo,
    ///     value: 901,
    ///     constraint: "greater than 900",
    /// };
    /// assert_eq!(err.to_string(), "cannot set tempo to greater than 900");
    /// ```
    #[error("cannot set {setting} to {constraint}")]
    OutOfRange {
        setting: Setting,
        value: i64,
        constraint: &'static str,
    },

    #[error("invalid note: {note}")]
    InvalidNote { note: String },

    #[error("invalid note: {note} at octave {octave}")]
    NoteOutOfRange { note: String, octave: i64 },

    #[error("invalid length: {0}")]
    InvalidLength(i64),

    /// A command failed while being performed.
    #[error("execution error at {position}: {source}")]
    Execution {
        position: Position,
        #[source]
        source: Box<MmlError>,
    },
}

impl MmlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MmlError::InvalidToken { .. } => ErrorKind::Lexical,
            MmlError::MissingArgument { .. } | MmlError::UnexpectedToken { .. } => {
                ErrorKind::Syntax
            }
            MmlError::NumericOverflow { .. } | MmlError::OutOfRange { .. } => ErrorKind::Range,
            MmlError::InvalidNote { .. }
            | MmlError::NoteOutOfRange { .. }
            | MmlError::InvalidLength(_) => ErrorKind::Semantic,
            MmlError::Execution { source, .. } => source.kind(),
        }
    }

    /// Source position the error is attributed to, if any.
    pub fn position(&self) -> Option<Position> {
        match self {
            MmlError::InvalidToken { position, .. }
            | MmlError::MissingArgument { position, .. }
            | MmlError::UnexpectedToken { position, .. }
            | MmlError::NumericOverflow { position, .. }
            | MmlError::Execution { position, .. } => Some(*position),
            MmlError::OutOfRange { .. }
            | MmlError::InvalidNote { .. }
            | MmlError::NoteOutOfRange { .. }
            | MmlError::InvalidLength(_) => None,
        }
    }

    pub(crate) fn at(self, position: Position) -> Self {
        MmlError::Execution {
            position,
            source: Box::new(self),
        }
    }
}
