//! # Perform Block Encoding
//!
//! Packs performer events into fixed-size 32-byte blocks.
//!
//! ## Wire Format
//! ```text
//! [0]      payload length (0..=30)
//! [1..31]  payload: note and delay bytes, zero-padded
//! [31]     reserved, always 0
//! ```
//! A note is one byte (its pitch id). A delay is two bytes, `0xFF` then the
//! delay in milliseconds.
//!
//! ## Segmentation
//! Events are packed greedily in order. A block is closed as soon as the next
//! event would push the payload past 30 bytes, so an event is never split
//! across blocks. Each block is paired with the total delay it contains.

use std::fmt;

pub const BLOCK_SIZE: usize = 32;
pub const PAYLOAD_CAPACITY: usize = 30;

/// Longest delay a single event can carry.
pub const MAX_DELAY_MS: u8 = 250;

const DELAY_MARKER: u8 = 0xFF;

/// A single step of the performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Pitch id, 1..=37
    Note(u8),
    /// Milliseconds until the next event, 1..=250
    Delay(u8),
}

impl Event {
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            Event::Note(id) => vec![id],
            Event::Delay(ms) => vec![DELAY_MARKER, ms],
        }
    }

    /// Playback time this event contributes.
    pub fn duration_ms(&self) -> u32 {
        match *self {
            Event::Note(_) => 0,
            Event::Delay(ms) => u32::from(ms),
        }
    }
}

/// One 32-byte perform record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub length: u8,
    pub payload: [u8; PAYLOAD_CAPACITY],
    pub reserved: u8,
}

impl Block {
    fn from_payload(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() <= PAYLOAD_CAPACITY);
        let mut payload = [0u8; PAYLOAD_CAPACITY];
        payload[..bytes.len()].copy_from_slice(bytes);
        Self {
            length: bytes.len() as u8,
            payload,
            reserved: 0,
        }
    }

    /// The meaningful part of the payload.
    pub fn data(&self) -> &[u8] {
        let end = usize::from(self.length).min(PAYLOAD_CAPACITY);
        &self.payload[..end]
    }

    pub fn to_bytes(&self) -> [u8; BLOCK_SIZE] {
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes[0] = self.length;
        bytes[1..=PAYLOAD_CAPACITY].copy_from_slice(&self.payload);
        bytes[BLOCK_SIZE - 1] = self.reserved;
        bytes
    }

    /// Lowercase hex of all 32 bytes (64 characters).
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// A block together with the playback time it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub block: Block,
    pub duration_ms: u32,
}

/// Pack events into consecutive blocks, preserving order.
pub fn segment(events: &[Event]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut buffer: Vec<u8> = Vec::with_capacity(PAYLOAD_CAPACITY);
    let mut duration_ms = 0;

    for event in events {
        let bytes = event.encode();
        if buffer.len() + bytes.len() > PAYLOAD_CAPACITY {
            segments.push(Segment {
                block: Block::from_payload(&buffer),
                duration_ms,
            });
            buffer.clear();
            duration_ms = 0;
        }
        buffer.extend_from_slice(&bytes);
        duration_ms += event.duration_ms();
    }

    if !buffer.is_empty() {
        segments.push(Segment {
            block: Block::from_payload(&buffer),
            duration_ms,
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_encodes_to_one_byte() {
        assert_eq!(Event::Note(12).encode(), vec![12]);
        assert_eq!(Event::Note(12).duration_ms(), 0);
    }

    #[test]
    fn test_delay_encodes_to_two_bytes() {
        assert_eq!(Event::Delay(128).encode(), vec![0xFF, 128]);
        assert_eq!(Event::Delay(128).duration_ms(), 128);
    }

    #[test]
    fn test_serialize_block() {
        let mut payload = [0u8; PAYLOAD_CAPACITY];
        for (i, byte) in payload.iter_mut().take(20).enumerate() {
            *byte = i as u8 + 1;
        }
        let block = Block {
            length: 0xa1,
            payload,
            reserved: 0xb2,
        };
        let hex = block.serialize();
        assert_eq!(
            hex,
            "a10102030405060708090a0b0c0d0e0f101112131400000000000000000000b2"
        );
        assert_eq!(hex.len(), 64);
    }

    #[test]
    fn test_to_bytes_layout() {
        let block = Block::from_payload(&[7, 0xFF, 9]);
        let bytes = block.to_bytes();
        assert_eq!(&bytes[..4], &[3, 7, 0xFF, 9]);
        assert!(bytes[4..].iter().all(|&b| b == 0));
        assert_eq!(block.data(), &[7, 0xFF, 9]);
    }

    #[test]
    fn test_sequence_spans_two_blocks() {
        let mut events = Vec::new();
        for id in 1..=5 {
            events.push(Event::Note(id));
            events.push(Event::Delay(0x80));
        }
        events.extend([Event::Delay(0xFF); 4]);
        for id in 6..=10 {
            events.push(Event::Note(id));
            events.push(Event::Delay(0x80));
        }

        let segments = segment(&events);
        assert_eq!(segments.len(), 2);

        assert_eq!(segments[0].block.length, 30);
        assert_eq!(
            segments[0].block.data(),
            &[
                1, 0xFF, 0x80, 2, 0xFF, 0x80, 3, 0xFF, 0x80, 4, 0xFF, 0x80, 5, 0xFF, 0x80, 0xFF,
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 6, 0xFF, 0x80, 7, 0xFF, 0x80, 8,
            ]
        );
        assert_eq!(segments[0].duration_ms, 5 * 0x80 + 4 * 0xFF + 2 * 0x80);

        assert_eq!(segments[1].block.length, 8);
        assert_eq!(
            segments[1].block.data(),
            &[0xFF, 0x80, 9, 0xFF, 0x80, 10, 0xFF, 0x80]
        );
        assert_eq!(segments[1].duration_ms, 3 * 0x80);
    }

    #[test]
    fn test_exactly_full_block() {
        let events = [Event::Delay(10); 15];
        let segments = segment(&events);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].block.length, 30);
        assert_eq!(segments[0].duration_ms, 150);
    }

    #[test]
    fn test_one_byte_over_splits() {
        let mut events = vec![Event::Delay(10); 15];
        events.push(Event::Note(1));
        let segments = segment(&events);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].block.length, 30);
        assert_eq!(segments[1].block.length, 1);
        assert_eq!(segments[1].duration_ms, 0);
    }

    #[test]
    fn test_no_events_no_segments() {
        assert!(segment(&[]).is_empty());
    }
}
