//! Wire constants for Wialon Combine packets (big-endian throughout).

/// Packet head marker sent by devices.
pub const PACKET_HEAD: u16 = 0x2424;
/// Acknowledgment head marker sent by the server.
pub const ACK_HEAD: u16 = 0x4040;

/// Smallest buffer that can hold head, type, sequence and length.
pub const MIN_PACKET_LEN: usize = 7;
pub const CRC_LEN: usize = 2;
pub const ACK_LEN: usize = 5;

pub const PACKET_TYPE_LOGIN: u32 = 0;
pub const PACKET_TYPE_DATA: u32 = 1;
pub const PACKET_TYPE_KEEP_ALIVE: u32 = 2;

pub const SUBRECORD_CUSTOM_PARAMETERS: u16 = 0;
pub const SUBRECORD_POSITION_DATA: u16 = 1;
pub const SUBRECORD_PICTURE: u16 = 3;
pub const SUBRECORD_LBS_PARAMETERS: u16 = 4;

/// Extensible-field continuation flags.
pub const VARINT7_CONTINUATION: u8 = 0x80;
pub const VARINT15_CONTINUATION: u16 = 0x8000;

/// Login flags: high nibble selects the id encoding, low nibble the password.
pub const LOGIN_ID_SHIFT: u8 = 4;
pub const LOGIN_NIBBLE_MASK: u8 = 0x0F;

pub const ID_ENCODING_ABSENT: u8 = 0;
pub const ID_ENCODING_U16: u8 = 1;
pub const ID_ENCODING_U32: u8 = 2;
pub const ID_ENCODING_U64: u8 = 3;
pub const ID_ENCODING_STRING: u8 = 4;

/// Custom parameter `sensor_type`: low 5 bits value type, high 3 bits scale.
pub const SENSOR_TYPE_CODE_MASK: u8 = 0x1F;
pub const SENSOR_SCALE_SHIFT: u8 = 5;
pub const SENSOR_SCALE_MASK: u8 = 0x07;
/// Scale only applies to the integer type codes below this bound.
pub const SENSOR_SCALED_CODE_LIMIT: u8 = 8;

pub const COORDINATE_DIVISOR: f64 = 1_000_000.0;
pub const HDOP_DIVISOR: f64 = 100.0;

/// Wire width of a single LBS cell entry (six u16 fields).
pub const LBS_CELL_LEN: usize = 12;
/// Wire width of a position subrecord.
pub const POSITION_DATA_LEN: usize = 17;

pub const RESPONSE_REGISTERED: u8 = 0;
pub const RESPONSE_AUTH_ERROR: u8 = 1;
pub const RESPONSE_BAD_PASSWORD: u8 = 2;
pub const RESPONSE_NOT_REGISTERED: u8 = 3;
pub const RESPONSE_CRC_ERROR: u8 = 4;
pub const RESPONSE_DEVICE_COMMAND: u8 = 255;
