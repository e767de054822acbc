use serde::{Deserialize, Serialize};

use crate::protocol::error::DecodeError;
use crate::protocol::layout;
use crate::protocol::reader::PacketReader;

/// Login packet payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Login {
    pub protocol_version: u32,
    /// High nibble: id encoding. Low nibble: password encoding.
    pub flags: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<IdValue>,
}

/// Device id or password, in whichever width the device chose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IdValue {
    U16(u16),
    U32(u32),
    U64(u64),
    Str(String),
}

/// Encoding selected by one nibble of the login flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdEncoding {
    Absent,
    U16,
    U32,
    U64,
    String,
    /// Codes 5..=15: nothing is read.
    Reserved(u8),
}

impl IdEncoding {
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble & layout::LOGIN_NIBBLE_MASK {
            layout::ID_ENCODING_ABSENT => Self::Absent,
            layout::ID_ENCODING_U16 => Self::U16,
            layout::ID_ENCODING_U32 => Self::U32,
            layout::ID_ENCODING_U64 => Self::U64,
            layout::ID_ENCODING_STRING => Self::String,
            other => Self::Reserved(other),
        }
    }

    pub fn read(self, reader: &mut PacketReader<'_>) -> Result<Option<IdValue>, DecodeError> {
        let value = match self {
            Self::Absent | Self::Reserved(_) => return Ok(None),
            Self::U16 => IdValue::U16(reader.read_u16_be()?),
            Self::U32 => IdValue::U32(reader.read_u32_be()?),
            Self::U64 => IdValue::U64(reader.read_u64_be()?),
            Self::String => IdValue::Str(reader.read_cstring()),
        };
        Ok(Some(value))
    }
}

impl Login {
    pub fn id_encoding(&self) -> IdEncoding {
        IdEncoding::from_nibble(self.flags >> layout::LOGIN_ID_SHIFT)
    }

    pub fn password_encoding(&self) -> IdEncoding {
        IdEncoding::from_nibble(self.flags)
    }
}

pub fn parse_login(reader: &mut PacketReader<'_>) -> Result<Login, DecodeError> {
    let protocol_version = u32::from(reader.read_varint7()?);
    let flags = reader.read_u8()?;
    let mut login = Login {
        protocol_version,
        flags,
        id: None,
        password: None,
    };
    login.id = login.id_encoding().read(reader)?;
    login.password = login.password_encoding().read(reader)?;
    Ok(login)
}
