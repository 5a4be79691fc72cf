//! # Performer
//!
//! Executes a parsed [`Program`] into an ordered sequence of [`Event`]s.
//!
//! ## State
//! The performer tracks tempo, default length (and whether it is dotted) and
//! octave. All three start unset and fall back to 120 BPM, a quarter note and
//! octave 4 respectively.
//!
//! ## Pitch Ids
//! Octave 3 occupies ids 1..=12 (C=1 ... B=12), octave 4 ids 13..=24 and so on
//! up to octave 6, of which only C (37) is playable.
//!
//! ## Durations
//! A length denominator `d` lasts `4 * (60000 / tempo) / d` milliseconds,
//! truncated. Each applicable dot multiplies the truncated value by 1.5. A note
//! is followed by a rest of its own length, and every rest is split into delays
//! of at most 250 ms.
//!
//! ## Example
//! ```rust
//! use mmlc::{parse, perform, Event};
//!
//! let program = parse("c8")?;
//! let events = perform(&program)?;
//! assert_eq!(events, vec![Event::Note(13), Event::Delay(250)]);
//! # Ok::<(), mmlc::MmlError>(())
//! ```

use crate::ast::{Command, Modifier, Program};
use crate::encoding::{Event, MAX_DELAY_MS};
use crate::error::{MmlError, Setting};

pub const DEFAULT_TEMPO: u32 = 120;
pub const DEFAULT_LENGTH: u32 = 4;
pub const DEFAULT_OCTAVE: i64 = 4;

pub const MIN_OCTAVE: i64 = 3;
pub const MAX_OCTAVE: i64 = 6;
pub const MAX_TEMPO: i64 = 900;
pub const MAX_DEFAULT_LENGTH: i64 = 64;

pub const MIN_PITCH: i64 = 1;
pub const MAX_PITCH: i64 = 37;

/// Duration of an explicit zero-length note or rest.
pub const STACCATO_MS: u32 = 20;

/// Pitch offset of each natural within an octave.
const PITCH_OFFSETS: [(char, i64); 7] = [
    ('C', 1),
    ('D', 3),
    ('E', 5),
    ('F', 6),
    ('G', 8),
    ('A', 10),
    ('B', 12),
];

fn pitch_offset(letter: char) -> Option<i64> {
    let upper = letter.to_ascii_uppercase();
    PITCH_OFFSETS
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|&(_, offset)| offset)
}

fn note_name(letter: char, modifier: Option<Modifier>) -> String {
    let mut name = letter.to_string();
    if let Some(m) = modifier {
        name.push(m.symbol());
    }
    name
}

fn dot(ms: u32) -> u32 {
    ms * 3 / 2
}

/// Mutable performance state for a single compilation.
#[derive(Debug, Clone, Default)]
pub struct Performer {
    tempo: Option<u32>,
    default_length: Option<u32>,
    default_length_dotted: bool,
    octave: Option<i64>,
    events: Vec<Event>,
}

impl Performer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one command against the state.
    pub fn execute(&mut self, command: &Command) -> Result<(), MmlError> {
        match *command {
            Command::Note {
                letter,
                modifier,
                length,
                dotted,
            } => self.emit_note(letter, modifier, length, dotted),
            Command::Rest { length, dotted } => self.emit_rest(length, dotted),
            Command::Tempo { value } => self.set_tempo(value),
            Command::DefaultLength { value, dotted } => self.set_default_length(value, dotted),
            Command::Octave { value } => self.set_octave(value),
            Command::OctaveUp => {
                let octave = self.current_octave();
                self.set_octave(octave + 1)
            }
            Command::OctaveDown => {
                let octave = self.current_octave();
                self.set_octave(octave - 1)
            }
            Command::NoOp => Ok(()),
        }
    }

    /// Emit a note followed by a rest of the same length.
    ///
    /// `length` is the denominator of the note length; `None` uses the default.
    pub fn emit_note(
        &mut self,
        letter: char,
        modifier: Option<Modifier>,
        length: Option<i64>,
        dotted: bool,
    ) -> Result<(), MmlError> {
        let offset = pitch_offset(letter).ok_or_else(|| MmlError::InvalidNote {
            note: note_name(letter, modifier),
        })?;

        let octave = self.current_octave();
        let shift = modifier.map_or(0, Modifier::semitones);
        let pitch = offset + (octave - MIN_OCTAVE) * 12 + shift;
        if !(MIN_PITCH..=MAX_PITCH).contains(&pitch) {
            return Err(MmlError::NoteOutOfRange {
                note: note_name(letter, modifier),
                octave,
            });
        }

        let ms = self.duration_ms(length, dotted)?;
        self.events.push(Event::Note(pitch as u8));
        self.push_delays(ms);
        Ok(())
    }

    pub fn emit_rest(&mut self, length: Option<i64>, dotted: bool) -> Result<(), MmlError> {
        let ms = self.duration_ms(length, dotted)?;
        self.push_delays(ms);
        Ok(())
    }

    pub fn set_tempo(&mut self, tempo: i64) -> Result<(), MmlError> {
        let constraint = if tempo < 1 {
            "lower than 1"
        } else if tempo > MAX_TEMPO {
            "greater than 900"
        } else {
            self.tempo = Some(tempo as u32);
            return Ok(());
        };
        Err(MmlError::OutOfRange {
            setting: Setting::Tempo,
            value: tempo,
            constraint,
        })
    }

    pub fn set_default_length(&mut self, length: i64, dotted: bool) -> Result<(), MmlError> {
        let constraint = match length {
            l if l < 0 => "less than 0",
            0 => "0",
            l if l > MAX_DEFAULT_LENGTH => "greater than 64",
            l => {
                self.default_length = Some(l as u32);
                self.default_length_dotted = dotted;
                return Ok(());
            }
        };
        Err(MmlError::OutOfRange {
            setting: Setting::DefaultLength,
            value: length,
            constraint,
        })
    }

    pub fn set_octave(&mut self, octave: i64) -> Result<(), MmlError> {
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
            return Err(MmlError::OutOfRange {
                setting: Setting::Octave,
                value: octave,
                constraint: "anything other than 3, 4, 5, or 6",
            });
        }
        self.octave = Some(octave);
        Ok(())
    }

    /// Current octave; an unset octave becomes the default on first read.
    pub fn current_octave(&mut self) -> i64 {
        *self.octave.get_or_insert(DEFAULT_OCTAVE)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    fn duration_ms(&self, length: Option<i64>, dotted: bool) -> Result<u32, MmlError> {
        let denominator = match length {
            Some(0) => return Ok(STACCATO_MS),
            Some(d) if d < 0 => return Err(MmlError::InvalidLength(d)),
            Some(d) => d as f64,
            None => f64::from(self.default_length.unwrap_or(DEFAULT_LENGTH)),
        };

        let tempo = f64::from(self.tempo.unwrap_or(DEFAULT_TEMPO));
        let ms_per_beat = 60000.0 / tempo;
        let mut ms = (4.0 * ms_per_beat / denominator) as u32;

        // Dotted default and dotted command compound.
        if length.is_none() && self.default_length_dotted {
            ms = dot(ms);
        }
        if dotted {
            ms = dot(ms);
        }
        Ok(ms)
    }

    fn push_delays(&mut self, mut ms: u32) {
        let max = u32::from(MAX_DELAY_MS);
        while ms >= max {
            self.events.push(Event::Delay(MAX_DELAY_MS));
            ms -= max;
        }
        if ms > 0 {
            self.events.push(Event::Delay(ms as u8));
        }
    }
}

/// Execute a whole program, attributing any failure to the command's position.
pub fn perform(program: &Program) -> Result<Vec<Event>, MmlError> {
    let mut performer = Performer::new();
    for (command, position) in program.iter() {
        performer
            .execute(command)
            .map_err(|e| e.at(position))?;
    }
    Ok(performer.into_events())
}
