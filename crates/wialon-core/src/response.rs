//! Server acknowledgment construction.
//!
//! The acknowledgment is `0x40 0x40 <code:1> <sequence:2 BE>`. Only the bytes
//! are built here; sending them is the transport's job.

use serde::{Deserialize, Serialize};

use crate::protocol::common::hex_bytes;
use crate::protocol::layout;

/// Acknowledgment for one received packet.
///
/// # Examples
/// ```
/// use wialon_core::build_response;
///
/// let ack = build_response(0, 0x0102);
/// assert_eq!(ack.raw_bytes, [0x40, 0x40, 0x00, 0x01, 0x02]);
/// assert_eq!(ack.description, "registered");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerResponse {
    pub head: u16,
    pub code: u8,
    pub sequence: u16,
    /// Complete wire acknowledgment, head marker included.
    #[serde(with = "hex_bytes")]
    pub raw_bytes: [u8; layout::ACK_LEN],
    pub description: String,
}

pub fn build_response(code: u8, sequence: u16) -> ServerResponse {
    let [head_hi, head_lo] = layout::ACK_HEAD.to_be_bytes();
    let [seq_hi, seq_lo] = sequence.to_be_bytes();
    ServerResponse {
        head: layout::ACK_HEAD,
        code,
        sequence,
        raw_bytes: [head_hi, head_lo, code, seq_hi, seq_lo],
        description: describe_response(code).to_string(),
    }
}

pub fn describe_response(code: u8) -> &'static str {
    match code {
        layout::RESPONSE_REGISTERED => "registered",
        layout::RESPONSE_AUTH_ERROR => "auth error",
        layout::RESPONSE_BAD_PASSWORD => "bad password",
        layout::RESPONSE_NOT_REGISTERED => "not registered",
        layout::RESPONSE_CRC_ERROR => "CRC error",
        layout::RESPONSE_DEVICE_COMMAND => "device command",
        _ => "unknown response code",
    }
}
