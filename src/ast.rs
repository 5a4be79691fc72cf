//! # Abstract Syntax Tree (AST) Types
//!
//! This module defines the command sequence produced by the parser.
//!
//! ## Type Hierarchy
//! ```text
//! Program
//!   ├── Vec<Command>
//!   │     ├── Note { letter, modifier, length, dotted }
//!   │     ├── Rest { length, dotted }
//!   │     ├── Tempo { value }
//!   │     ├── DefaultLength { value, dotted }
//!   │     ├── Octave { value }
//!   │     ├── OctaveUp / OctaveDown
//!   │     └── NoOp (volume)
//!   └── Vec<Position> (one per command, index-aligned)
//! ```
//!
//! ## Key Concepts
//!
//! ### Lengths
//! A length is the denominator `d` of a `1/d` whole note. `None` means the
//! command did not spell one out and the performer's default length applies.
//! An explicit `0` is the fixed 20 ms staccato length.
//!
//! ### Values
//! Numeric arguments are kept as parsed (`i64`). Range checks belong to the
//! performer, so `O9` parses fine and only fails when executed.
//!
//! ## Related Modules
//! - `parser` - Creates these types from MML source
//! - `performer` - Executes commands into events

use std::fmt;

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Accidental following a note letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `#`
    Sharp,
    /// `+`, same pitch as `#`
    Plus,
    /// `-`
    Flat,
}

impl Modifier {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Modifier::Sharp),
            '+' => Some(Modifier::Plus),
            '-' => Some(Modifier::Flat),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Modifier::Sharp => '#',
            Modifier::Plus => '+',
            Modifier::Flat => '-',
        }
    }

    /// Semitone shift applied to the natural pitch.
    pub fn semitones(self) -> i64 {
        match self {
            Modifier::Sharp | Modifier::Plus => 1,
            Modifier::Flat => -1,
        }
    }
}

/// Commands that take a numeric argument, named as they appear in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    Note,
    Rest,
    Tempo,
    Length,
    Octave,
    Volume,
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandName::Note => "Note",
            CommandName::Rest => "Rest",
            CommandName::Tempo => "Tempo",
            CommandName::Length => "Length",
            CommandName::Octave => "Octave",
            CommandName::Volume => "Volume",
        };
        f.write_str(name)
    }
}

/// A single parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Note {
        letter: char,
        modifier: Option<Modifier>,
        length: Option<i64>,
        dotted: bool,
    },
    Rest {
        length: Option<i64>,
        dotted: bool,
    },
    Tempo {
        value: i64,
    },
    DefaultLength {
        value: i64,
        dotted: bool,
    },
    Octave {
        value: i64,
    },
    OctaveUp,
    OctaveDown,
    /// Volume command: parsed and discarded
    NoOp,
}

/// The parsed program: commands in source order with the position of each.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    commands: Vec<Command>,
    positions: Vec<Position>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command together with the position of its first token.
    pub fn push(&mut self, command: Command, position: Position) {
        self.commands.push(command);
        self.positions.push(position);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Command, Position)> + '_ {
        self.commands.iter().zip(self.positions.iter().copied())
    }
}
