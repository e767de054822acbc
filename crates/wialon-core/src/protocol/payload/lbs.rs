use serde::{Deserialize, Serialize};

use crate::protocol::error::DecodeError;
use crate::protocol::layout;
use crate::protocol::reader::PacketReader;

/// Serving or neighbour cell seen by the modem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LbsCell {
    pub mcc: u16,
    pub mnc: u16,
    pub lac: u16,
    pub cell_id: u16,
    pub rx_level: u16,
    pub ta: u16,
}

pub fn parse_lbs_parameters(reader: &mut PacketReader<'_>) -> Result<Vec<LbsCell>, DecodeError> {
    let count = usize::from(reader.read_u8()?);
    reader.require_remaining(count * layout::LBS_CELL_LEN)?;
    let mut cells = Vec::with_capacity(count);
    for _ in 0..count {
        cells.push(LbsCell {
            mcc: reader.read_u16_be()?,
            mnc: reader.read_u16_be()?,
            lac: reader.read_u16_be()?,
            cell_id: reader.read_u16_be()?,
            rx_level: reader.read_u16_be()?,
            ta: reader.read_u16_be()?,
        });
    }
    Ok(cells)
}
