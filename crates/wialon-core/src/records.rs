//! Flat projection of a decoded packet.
//!
//! Consumers that store one row per fact use [`Record`] instead of walking
//! the nested message tree. Flattening is pure and infallible.

use serde::{Deserialize, Serialize};

use crate::protocol::PacketBody;
use crate::protocol::payload::{
    CustomParameter, LbsCell, Login, Message, Picture, PositionData, Subrecord,
};

/// One observable fact. Data-derived variants carry the owning message time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    Login(Login),
    PositionData {
        time: u32,
        #[serde(flatten)]
        position: PositionData,
    },
    CustomParameter {
        time: u32,
        #[serde(flatten)]
        parameter: CustomParameter,
    },
    Picture {
        time: u32,
        #[serde(flatten)]
        picture: Picture,
    },
    LbsEntry {
        time: u32,
        #[serde(flatten)]
        cell: LbsCell,
    },
    KeepAlive,
}

impl Record {
    pub fn time(&self) -> Option<u32> {
        match self {
            Self::PositionData { time, .. }
            | Self::CustomParameter { time, .. }
            | Self::Picture { time, .. }
            | Self::LbsEntry { time, .. } => Some(*time),
            Self::Login(_) | Self::KeepAlive => None,
        }
    }
}

/// Project a payload into records, in wire order.
///
/// Login and Keep-Alive yield exactly one record, unknown packets none.
/// Unsupported subrecords are dropped.
pub fn flatten(body: &PacketBody) -> Vec<Record> {
    match body {
        PacketBody::Login(login) => vec![Record::Login(login.clone())],
        PacketBody::KeepAlive => vec![Record::KeepAlive],
        PacketBody::Data { messages } => messages.iter().flat_map(message_records).collect(),
        PacketBody::Unknown { .. } => Vec::new(),
    }
}

fn message_records(message: &Message) -> Vec<Record> {
    let time = message.time;
    let mut records = Vec::new();
    for subrecord in &message.subrecords {
        match subrecord {
            Subrecord::PositionData(position) => records.push(Record::PositionData {
                time,
                position: position.clone(),
            }),
            Subrecord::CustomParameters { parameters } => {
                records.extend(parameters.iter().map(|parameter| Record::CustomParameter {
                    time,
                    parameter: parameter.clone(),
                }));
            }
            Subrecord::Picture(picture) => records.push(Record::Picture {
                time,
                picture: picture.clone(),
            }),
            Subrecord::LbsParameters { cells } => {
                records.extend(cells.iter().map(|cell| Record::LbsEntry { time, cell: *cell }));
            }
            Subrecord::Unsupported { .. } => {}
        }
    }
    records
}
