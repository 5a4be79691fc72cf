//! # Public API
//!
//! This module contains the main entry points for the MML compiler library.
//!
//! ## Compilation Functions
//!
//! - [`compile()`] - Full pipeline from source text to perform segments
//! - [`compile_events()`] - Stop after performing, before segmentation
//! - [`source_until_nul()`] - Cut raw input at its first NUL character
//!
//! ## Typical Usage
//!
//! ```rust
//! use mmlc::compile;
//!
//! let segments = compile("t88 b2al2b+.")?;
//!
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].block.length, 29);
//! assert_eq!(segments[0].duration_ms, 3044);
//! assert_eq!(segments[1].block.length, 10);
//! assert_eq!(segments[1].duration_ms, 1044);
//! # Ok::<(), mmlc::MmlError>(())
//! ```

use crate::{parse, perform, segment, Event, MmlError, Segment};

/// Compile MML source into perform segments.
///
/// # Pipeline
/// 1. Tokenize and parse source into a program
/// 2. Execute the program into note and delay events
/// 3. Pack the events into 32-byte blocks
///
/// # Errors
/// Returns the first [`MmlError`] encountered. Parse errors carry the
/// offending token's position; execution errors are wrapped with the position
/// of the failing command. No segments are returned on error.
pub fn compile(source: &str) -> Result<Vec<Segment>, MmlError> {
    let events = compile_events(source)?;
    Ok(segment(&events))
}

/// Parse and perform without packing into blocks.
///
/// # Example
/// ```rust
/// use mmlc::{compile_events, Event};
///
/// let events = compile_events("t100 r")?;
/// assert_eq!(events, vec![Event::Delay(250), Event::Delay(250), Event::Delay(100)]);
/// # Ok::<(), mmlc::MmlError>(())
/// ```
pub fn compile_events(source: &str) -> Result<Vec<Event>, MmlError> {
    let program = parse(source)?;
    perform(&program)
}

/// The part of `input` before its first NUL character, or all of it.
pub fn source_until_nul(input: &str) -> &str {
    match input.find('\0') {
        Some(end) => &input[..end],
        None => input,
    }
}
