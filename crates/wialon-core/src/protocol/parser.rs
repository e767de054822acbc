use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::common::hex_bytes;
use super::crc::crc16;
use super::error::DecodeError;
use super::layout;
use super::payload::{Login, Message, parse_login, parse_messages};
use super::reader::PacketReader;
use crate::records::{Record, flatten};
use crate::response::{ServerResponse, build_response};

/// A fully decoded packet. Created fresh by every [`decode`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    pub head: u16,
    #[serde(rename = "type")]
    pub packet_type: u32,
    pub sequence: u16,
    /// Declared payload length; bounds the Data message loop only.
    pub length: u32,
    pub payload: PacketBody,
    /// `None` when the buffer ended before a checksum could be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crc: Option<CrcResult>,
    pub records: Vec<Record>,
    pub response: ServerResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PacketBody {
    Login(Login),
    Data {
        messages: Vec<Message>,
    },
    KeepAlive,
    Unknown {
        #[serde(with = "hex_bytes")]
        raw_bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrcResult {
    pub received: u16,
    pub calculated: u16,
    pub valid: bool,
}

impl Packet {
    /// True when the checksum matched or could not be checked.
    pub fn crc_valid(&self) -> bool {
        self.crc.is_none_or(|crc| crc.valid)
    }
}

/// Decode one packet from a raw buffer.
///
/// A checksum mismatch still yields `Ok`: see [`Packet::crc_valid`] and the
/// acknowledgment code in [`Packet::response`].
///
/// # Examples
/// ```
/// use wialon_core::{PacketBody, decode};
///
/// let keep_alive = [0x24, 0x24, 0x02, 0x00, 0x05, 0x00, 0x00, 0x27, 0x0b];
/// let packet = decode(&keep_alive)?;
/// assert_eq!(packet.sequence, 5);
/// assert_eq!(packet.payload, PacketBody::KeepAlive);
/// assert!(packet.crc_valid());
/// # Ok::<(), wialon_core::DecodeError>(())
/// ```
///
/// # Errors
/// Returns [`DecodeError::BadHeader`] when the head marker is wrong and
/// [`DecodeError::UnexpectedEof`] when any field runs past the buffer.
pub fn decode(buffer: &[u8]) -> Result<Packet, DecodeError> {
    if buffer.len() < layout::MIN_PACKET_LEN {
        return Err(DecodeError::UnexpectedEof {
            needed: layout::MIN_PACKET_LEN,
            actual: buffer.len(),
        });
    }

    let mut reader = PacketReader::new(buffer);
    let head = reader.read_u16_be()?;
    if head != layout::PACKET_HEAD {
        return Err(DecodeError::BadHeader { found: head });
    }
    let packet_type = u32::from(reader.read_varint7()?);
    let sequence = reader.read_u16_be()?;
    let length = reader.read_varint15()?;
    debug!("packet type {packet_type} seq {sequence} length {length}");

    let payload = match packet_type {
        layout::PACKET_TYPE_LOGIN => PacketBody::Login(parse_login(&mut reader)?),
        layout::PACKET_TYPE_DATA => PacketBody::Data {
            messages: parse_messages(&mut reader, length)?,
        },
        layout::PACKET_TYPE_KEEP_ALIVE => PacketBody::KeepAlive,
        _ => PacketBody::Unknown {
            raw_bytes: reader.read_bytes(length as usize)?.to_vec(),
        },
    };

    let crc = read_crc(&mut reader)?;
    let crc_valid = crc.is_none_or(|crc| crc.valid);
    let code = if crc_valid {
        layout::RESPONSE_REGISTERED
    } else {
        layout::RESPONSE_CRC_ERROR
    };
    let records = flatten(&payload);
    debug!(
        "decoded {} records, acknowledging seq {sequence} with code {code}",
        records.len()
    );

    Ok(Packet {
        head,
        packet_type,
        sequence,
        length,
        payload,
        crc,
        records,
        response: build_response(code, sequence),
    })
}

/// Reads the trailing checksum when at least two bytes remain.
///
/// Shorter buffers skip the check and count as valid, for wire compatibility
/// with devices that send bare headers. No other field is this lenient.
fn read_crc(reader: &mut PacketReader<'_>) -> Result<Option<CrcResult>, DecodeError> {
    if reader.remaining() < layout::CRC_LEN {
        debug!("no checksum present, skipping CRC check");
        return Ok(None);
    }
    let received = reader.read_u16_be()?;
    let buffer = reader.buffer();
    let calculated = crc16(&buffer[..buffer.len() - layout::CRC_LEN]);
    let valid = received == calculated;
    if !valid {
        warn!("CRC mismatch: received 0x{received:04x}, calculated 0x{calculated:04x}");
    }
    Ok(Some(CrcResult {
        received,
        calculated,
        valid,
    }))
}
