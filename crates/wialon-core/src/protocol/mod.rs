//! Wialon Combine packet decoding.
//!
//! The codec follows a layered structure:
//! - `layout`: wire constants (source of truth for magic values and codes)
//! - `reader`: bounds-checked cursor and extensible-field conventions
//! - `payload`: per-packet and per-subrecord decoders (no direct indexing)
//! - `parser`: header validation, type dispatch and CRC check
//! - `error`: explicit, actionable errors
//!
//! Decoders are pure and contain no I/O; `source` handles file access.

pub(crate) mod common;
pub mod crc;
pub mod error;
pub mod layout;
pub mod parser;
pub mod payload;
pub mod reader;

pub use crc::crc16;
pub use error::DecodeError;
pub use parser::{CrcResult, Packet, PacketBody, decode};
