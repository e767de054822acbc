//! Wialon Combine packet codec.
//!
//! GPS/GNSS trackers report positions, sensor readings, cell towers and
//! image fragments to a collection server in Wialon Combine packets; the
//! server answers each packet with a short acknowledgment. This crate decodes
//! one packet buffer at a time (`decode`), flattens the nested message tree
//! into typed records, checks the CRC-16/ARC trailer and builds the matching
//! acknowledgment bytes.
//!
//! Decoding is byte-oriented and side-effect free; all I/O is isolated in
//! `source`. Wire constants live in `protocol::layout` and primitive field
//! conventions in `protocol::reader`, so payload decoders stay small.
//!
//! Invariants:
//! - A packet whose head is not `0x2424` is rejected before anything else.
//! - A CRC mismatch never fails decoding; it flips the acknowledgment code.
//! - Identical input yields identical output.
//!
//! # Examples
//! ```
//! use wialon_core::{PacketBody, decode, parse_hex_dump};
//!
//! let buffer = parse_hex_dump("24 24 00 00 00 00 0a 01 30 00 03 0e 42 59 8b 46 ec 76 7f")?;
//! let packet = decode(&buffer)?;
//! assert!(matches!(packet.payload, PacketBody::Login(_)));
//! assert_eq!(packet.response.raw_bytes, [0x40, 0x40, 0x00, 0x00, 0x00]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod protocol;
mod records;
mod report;
mod response;
mod source;

pub use protocol::payload::{
    CustomParameter, IdEncoding, IdValue, LbsCell, Login, Message, ParameterValue, Picture,
    PositionData, SensorType, Subrecord,
};
pub use protocol::{CrcResult, DecodeError, Packet, PacketBody, crc16, decode};
pub use records::{Record, flatten};
pub use report::{ReportError, decode_file};
pub use response::{ServerResponse, build_response, describe_response};
pub use source::{InputFormat, SourceError, parse_hex_dump, read_packet_file};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Timestamp used when the packet carries no message time.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoded packet wrapped with tool and input metadata.
///
/// # Examples
/// ```
/// use wialon_core::{decode, make_report};
///
/// let packet = decode(&[0x24, 0x24, 0x02, 0x00, 0x01, 0x00, 0x00])?;
/// let report = make_report("keepalive.hex", 21, packet);
/// assert_eq!(report.report_version, wialon_core::REPORT_VERSION);
/// assert_eq!(report.summary.records_total, 1);
/// # Ok::<(), wialon_core::DecodeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 time of the latest message, or [`DEFAULT_GENERATED_AT`].
    pub generated_at: String,
    pub input: InputInfo,
    pub summary: PacketSummary,
    pub packet: Packet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input metadata embedded in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// File size on disk.
    pub bytes: u64,
    /// Decoded packet buffer size (differs from `bytes` for hex dumps).
    pub packet_bytes: u64,
}

/// Packet-level counters.
///
/// # Examples
/// ```
/// use wialon_core::PacketSummary;
///
/// let summary = PacketSummary {
///     records_total: 3,
///     messages_total: 1,
///     crc_valid: true,
///     time_start: None,
///     time_end: None,
/// };
/// assert_eq!(summary.records_total, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketSummary {
    pub records_total: u64,
    pub messages_total: u64,
    pub crc_valid: bool,
    /// RFC3339 time of the earliest message (Data packets only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 time of the latest message (Data packets only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Build a report around an already decoded packet.
pub fn make_report(input_path: &str, input_bytes: u64, packet: Packet) -> DecodeReport {
    let summary = report::summarize(&packet);
    let generated_at = summary
        .time_end
        .clone()
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    DecodeReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "wialon".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at,
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
            packet_bytes: input_bytes,
        },
        summary,
        packet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_time_bounds_when_none() {
        let packet = decode(&[0x24, 0x24, 0x02, 0x00, 0x01, 0x00, 0x00]).unwrap();
        let report = make_report("keepalive.bin", 7, packet);
        assert_eq!(report.generated_at, DEFAULT_GENERATED_AT);

        let value = serde_json::to_value(&report).expect("report json");
        let summary = value.get("summary").expect("summary");
        assert!(summary.get("time_start").is_none());
        assert!(summary.get("time_end").is_none());
        let packet = value.get("packet").expect("packet");
        assert!(packet.get("crc").is_none());
        assert_eq!(packet["type"], 2);
        assert_eq!(packet["payload"]["type"], "keep_alive");
        assert_eq!(packet["records"][0]["type"], "keep_alive");
        assert_eq!(packet["response"]["description"], "registered");
    }

    #[test]
    fn report_round_trips_through_json() {
        let packet = decode(&[
            0x24, 0x24, 0x00, 0x00, 0x00, 0x00, 0x0a, 0x01, 0x30, 0x00, 0x03, 0x0e, 0x42, 0x59,
            0x8b, 0x46, 0xec, 0x76, 0x7f,
        ])
        .unwrap();
        let report = make_report("login.hex", 57, packet);
        let json = serde_json::to_string(&report).unwrap();
        let back: DecodeReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
