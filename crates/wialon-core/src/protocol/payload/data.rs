use log::{trace, warn};
use serde::{Deserialize, Serialize};

use super::custom::{CustomParameter, parse_custom_parameters};
use super::lbs::{LbsCell, parse_lbs_parameters};
use super::picture::{Picture, parse_picture};
use super::position::{PositionData, parse_position};
use crate::protocol::error::DecodeError;
use crate::protocol::layout;
use crate::protocol::reader::PacketReader;

/// A timestamped group of subrecords inside a Data packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unix seconds (UTC).
    pub time: u32,
    pub subrecords: Vec<Subrecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Subrecord {
    CustomParameters { parameters: Vec<CustomParameter> },
    PositionData(PositionData),
    Picture(Picture),
    LbsParameters { cells: Vec<LbsCell> },
    /// Tag with no known layout; no bytes were consumed for it.
    Unsupported { type_code: u16 },
}

/// Reads messages until the cursor has moved `length` bytes past its
/// starting position. A message that straddles the boundary is read whole.
pub fn parse_messages(
    reader: &mut PacketReader<'_>,
    length: u32,
) -> Result<Vec<Message>, DecodeError> {
    let end = reader.position().saturating_add(length as usize);
    let mut messages = Vec::new();
    while reader.position() < end {
        messages.push(parse_message(reader)?);
    }
    Ok(messages)
}

pub fn parse_message(reader: &mut PacketReader<'_>) -> Result<Message, DecodeError> {
    let time = reader.read_u32_be()?;
    let count = reader.read_u8()?;
    trace!("message at {time} with {count} subrecords");
    let mut subrecords = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        subrecords.push(parse_subrecord(reader)?);
    }
    Ok(Message { time, subrecords })
}

pub fn parse_subrecord(reader: &mut PacketReader<'_>) -> Result<Subrecord, DecodeError> {
    let tag = reader.read_varint7()?;
    let subrecord = match tag {
        layout::SUBRECORD_CUSTOM_PARAMETERS => Subrecord::CustomParameters {
            parameters: parse_custom_parameters(reader)?,
        },
        layout::SUBRECORD_POSITION_DATA => Subrecord::PositionData(parse_position(reader)?),
        layout::SUBRECORD_PICTURE => Subrecord::Picture(parse_picture(reader)?),
        layout::SUBRECORD_LBS_PARAMETERS => Subrecord::LbsParameters {
            cells: parse_lbs_parameters(reader)?,
        },
        // Width unknown: following subrecords in this message may be misaligned.
        other => {
            warn!(
                "unsupported subrecord type {other} at offset {}",
                reader.position()
            );
            Subrecord::Unsupported { type_code: other }
        }
    };
    Ok(subrecord)
}

#[cfg(test)]
mod tests {
    use super::{Subrecord, parse_messages, parse_subrecord};
    use crate::protocol::error::DecodeError;
    use crate::protocol::reader::PacketReader;

    fn position_subrecord() -> Vec<u8> {
        let mut data = vec![0x01];
        data.extend_from_slice(&[0x02, 0x8e, 0x3f, 0x10, 0x02, 0xd6, 0xa8, 0x90]);
        data.extend_from_slice(&[0x00, 0x3c, 0x00, 0x5a, 0x00, 0x96, 0x09, 0x00, 0x78]);
        data
    }

    #[test]
    fn two_messages_within_length() {
        let mut data = Vec::new();
        data.extend_from_slice(&100u32.to_be_bytes());
        data.push(1);
        data.extend_from_slice(&position_subrecord());
        data.extend_from_slice(&200u32.to_be_bytes());
        data.push(0);
        let length = data.len() as u32;
        data.extend_from_slice(&[0xab, 0xcd]);

        let mut reader = PacketReader::new(&data);
        let messages = parse_messages(&mut reader, length).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].time, 100);
        assert!(matches!(messages[0].subrecords[0], Subrecord::PositionData(_)));
        assert_eq!(messages[1].time, 200);
        assert!(messages[1].subrecords.is_empty());
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn message_overrunning_length_is_read_whole() {
        let mut data = Vec::new();
        data.extend_from_slice(&7u32.to_be_bytes());
        data.push(1);
        data.extend_from_slice(&position_subrecord());
        let mut reader = PacketReader::new(&data);
        let messages = parse_messages(&mut reader, 3).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn zero_length_reads_nothing() {
        let data = [0u8; 10];
        let mut reader = PacketReader::new(&data);
        assert!(parse_messages(&mut reader, 0).unwrap().is_empty());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn unsupported_tag_consumes_only_the_tag() {
        let data = [0x02, 0xaa, 0xbb];
        let mut reader = PacketReader::new(&data);
        let subrecord = parse_subrecord(&mut reader).unwrap();
        assert_eq!(subrecord, Subrecord::Unsupported { type_code: 2 });
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn lbs_and_picture_dispatch() {
        let mut data = vec![0x04, 0x01];
        for value in [250u16, 1, 2, 3, 4, 5] {
            data.extend_from_slice(&value.to_be_bytes());
        }
        data.extend_from_slice(&[0x03, 0x00, 0x00, 0x01, 0x01, b'p', 0x00, 0x55]);
        let mut reader = PacketReader::new(&data);
        match parse_subrecord(&mut reader).unwrap() {
            Subrecord::LbsParameters { cells } => assert_eq!(cells[0].ta, 5),
            other => panic!("expected LBS, got {other:?}"),
        }
        match parse_subrecord(&mut reader).unwrap() {
            Subrecord::Picture(picture) => assert_eq!(picture.data, vec![0x55]),
            other => panic!("expected picture, got {other:?}"),
        }
    }

    #[test]
    fn truncated_message_aborts() {
        let data = [0x00, 0x00, 0x00, 0x01, 0x02, 0x01];
        let mut reader = PacketReader::new(&data);
        let err = parse_messages(&mut reader, 6).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof { .. }));
    }
}
