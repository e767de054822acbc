use serde::{Deserialize, Serialize};

use crate::protocol::common::hex_bytes;
use crate::protocol::error::DecodeError;
use crate::protocol::reader::PacketReader;

/// One fragment of an image sent in parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    /// Fragment index within the image.
    pub index: u32,
    pub byte_length: u32,
    pub fragment_count: u32,
    pub name: String,
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
}

pub fn parse_picture(reader: &mut PacketReader<'_>) -> Result<Picture, DecodeError> {
    let index = u32::from(reader.read_varint7()?);
    let byte_length = reader.read_varint15()?;
    let fragment_count = u32::from(reader.read_varint7()?);
    let name = reader.read_cstring();
    // A declared length past the end of the buffer surfaces as UnexpectedEof.
    let data = reader.read_bytes(byte_length as usize)?.to_vec();
    Ok(Picture {
        index,
        byte_length,
        fragment_count,
        name,
        data,
    })
}
