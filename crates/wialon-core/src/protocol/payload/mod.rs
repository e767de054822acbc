//! Payload decoders: one module per packet type or subrecord type.
//!
//! Each decoder consumes from a shared [`PacketReader`](super::reader::PacketReader)
//! and leaves the cursor just past what it decoded.

pub mod custom;
pub mod data;
pub mod lbs;
pub mod login;
pub mod picture;
pub mod position;

pub use custom::{CustomParameter, ParameterValue, SensorType};
pub use data::{Message, Subrecord, parse_messages};
pub use lbs::LbsCell;
pub use login::{IdEncoding, IdValue, Login, parse_login};
pub use picture::Picture;
pub use position::PositionData;
