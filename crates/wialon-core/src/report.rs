use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::protocol::{DecodeError, Packet, PacketBody, decode};
use crate::source::{InputFormat, SourceError, read_packet_file};
use crate::{DecodeReport, PacketSummary, make_report};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Load, decode and summarize one capture file.
///
/// # Errors
/// Fails when the file cannot be loaded or the packet cannot be decoded. A
/// checksum mismatch is not an error.
pub fn decode_file(path: &Path, format: InputFormat) -> Result<DecodeReport, ReportError> {
    let buffer = read_packet_file(path, format)?;
    let packet = decode(&buffer)?;
    let mut report = make_report(&path.display().to_string(), path.metadata()?.len(), packet);
    report.input.packet_bytes = buffer.len() as u64;
    Ok(report)
}

pub(crate) fn summarize(packet: &Packet) -> PacketSummary {
    let (messages_total, first, last) = match &packet.payload {
        PacketBody::Data { messages } => (
            messages.len() as u64,
            messages.iter().map(|m| m.time).min(),
            messages.iter().map(|m| m.time).max(),
        ),
        _ => (0, None, None),
    };
    PacketSummary {
        records_total: packet.records.len() as u64,
        messages_total,
        crc_valid: packet.crc_valid(),
        time_start: first.and_then(ts_to_rfc3339),
        time_end: last.and_then(ts_to_rfc3339),
    }
}

fn ts_to_rfc3339(ts: u32) -> Option<String> {
    OffsetDateTime::from_unix_timestamp(i64::from(ts))
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
