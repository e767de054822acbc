use serde::{Deserialize, Serialize};

use crate::protocol::error::DecodeError;
use crate::protocol::layout;
use crate::protocol::reader::PacketReader;

/// GNSS fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionData {
    /// Degrees.
    pub latitude: f64,
    /// Degrees.
    pub longitude: f64,
    /// km/h.
    pub speed: u16,
    /// Degrees from north.
    pub course: u16,
    /// Metres.
    pub height: u16,
    pub satellites: u8,
    pub hdop: f64,
}

pub fn parse_position(reader: &mut PacketReader<'_>) -> Result<PositionData, DecodeError> {
    reader.require_remaining(layout::POSITION_DATA_LEN)?;
    let latitude = f64::from(reader.read_i32_be()?) / layout::COORDINATE_DIVISOR;
    let longitude = f64::from(reader.read_i32_be()?) / layout::COORDINATE_DIVISOR;
    let speed = reader.read_u16_be()?;
    let course = reader.read_u16_be()?;
    let height = reader.read_u16_be()?;
    let satellites = reader.read_u8()?;
    let hdop = f64::from(reader.read_u16_be()?) / layout::HDOP_DIVISOR;
    Ok(PositionData {
        latitude,
        longitude,
        speed,
        course,
        height,
        satellites,
        hdop,
    })
}
