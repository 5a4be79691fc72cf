//! Text reports of compiled segments.
//!
//! The CSV form is one `<hex>,<duration>` line per block under a fixed header.
//! The YAML form carries the same data as a list of records.

use crate::encoding::Segment;
use serde::Serialize;

pub const CSV_HEADER: &str = "data,duration(ms)";

/// One segment as it appears in a serialized report.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRecord {
    pub data: String,
    pub duration_ms: u32,
}

impl From<&Segment> for SegmentRecord {
    fn from(segment: &Segment) -> Self {
        Self {
            data: segment.block.serialize(),
            duration_ms: segment.duration_ms,
        }
    }
}

pub fn to_csv(segments: &[Segment]) -> String {
    let mut out = String::with_capacity((segments.len() + 1) * 72);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for segment in segments {
        out.push_str(&format!("{},{}\n", segment.block, segment.duration_ms));
    }
    out
}

pub fn to_yaml(segments: &[Segment]) -> Result<String, serde_yaml::Error> {
    let records: Vec<SegmentRecord> = segments.iter().map(SegmentRecord::from).collect();
    serde_yaml::to_string(&records)
}
