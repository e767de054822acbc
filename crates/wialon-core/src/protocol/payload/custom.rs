use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::protocol::error::DecodeError;
use crate::protocol::layout;
use crate::protocol::reader::PacketReader;

/// One sensor reading from a custom parameters subrecord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomParameter {
    pub sensor_number: u32,
    /// Raw type byte: low 5 bits value type, high 3 bits decimal scale.
    pub sensor_type: u8,
    pub value: ParameterValue,
}

/// Decoded sensor value. Scaled integers become [`ParameterValue::Float`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParameterValue {
    Unsigned(u64),
    Signed(i64),
    /// NaN is written as JSON `null` and read back as NaN.
    Float(#[serde(deserialize_with = "float_or_nan")] f64),
    Text(String),
    /// Unknown type code; nothing was read from the wire.
    Empty,
}

/// Value encoding selected by the low 5 bits of `sensor_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorType {
    UnsignedByte,
    UnsignedShort,
    UnsignedInt,
    UnsignedLong,
    SignedByte,
    SignedInt,
    SignedShort,
    /// Not sign-extended: the raw 64-bit word is kept as unsigned.
    SignedLong,
    Float,
    Double,
    Text,
    Unknown(u8),
}

impl SensorType {
    pub fn from_code(code: u8) -> Self {
        match code & layout::SENSOR_TYPE_CODE_MASK {
            0 => Self::UnsignedByte,
            1 => Self::UnsignedShort,
            2 => Self::UnsignedInt,
            3 => Self::UnsignedLong,
            4 => Self::SignedByte,
            5 => Self::SignedInt,
            6 => Self::SignedShort,
            7 => Self::SignedLong,
            8 => Self::Float,
            9 => Self::Double,
            10 => Self::Text,
            other => Self::Unknown(other),
        }
    }

    fn read(self, reader: &mut PacketReader<'_>) -> Result<ParameterValue, DecodeError> {
        let value = match self {
            Self::UnsignedByte => ParameterValue::Unsigned(u64::from(reader.read_u8()?)),
            Self::UnsignedShort => ParameterValue::Unsigned(u64::from(reader.read_u16_be()?)),
            Self::UnsignedInt => ParameterValue::Unsigned(u64::from(reader.read_u32_be()?)),
            Self::UnsignedLong | Self::SignedLong => ParameterValue::Unsigned(reader.read_u64_be()?),
            Self::SignedByte => ParameterValue::Signed(i64::from(reader.read_u8()? as i8)),
            Self::SignedInt => ParameterValue::Signed(i64::from(reader.read_u32_be()? as i32)),
            Self::SignedShort => ParameterValue::Signed(i64::from(reader.read_u16_be()? as i16)),
            Self::Float => ParameterValue::Float(f64::from(reader.read_f32_be()?)),
            Self::Double => ParameterValue::Float(reader.read_f64_be()?),
            Self::Text => ParameterValue::Text(reader.read_cstring()),
            Self::Unknown(code) => {
                warn!("unknown custom parameter type code {code}, value skipped");
                ParameterValue::Empty
            }
        };
        Ok(value)
    }
}

impl CustomParameter {
    pub fn type_code(&self) -> u8 {
        self.sensor_type & layout::SENSOR_TYPE_CODE_MASK
    }

    pub fn kind(&self) -> SensorType {
        SensorType::from_code(self.sensor_type)
    }

    /// Decimal exponent: integer values are divided by `10^scale`.
    pub fn scale(&self) -> u8 {
        (self.sensor_type >> layout::SENSOR_SCALE_SHIFT) & layout::SENSOR_SCALE_MASK
    }
}

impl ParameterValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Unsigned(v) => Some(*v as f64),
            Self::Signed(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) | Self::Empty => None,
        }
    }

    fn scaled(self, scale: u8) -> Self {
        if scale == 0 {
            return self;
        }
        let divisor = 10f64.powi(i32::from(scale));
        match self {
            Self::Unsigned(v) => Self::Float(v as f64 / divisor),
            Self::Signed(v) => Self::Float(v as f64 / divisor),
            other => other,
        }
    }
}

fn float_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

pub fn parse_custom_parameters(
    reader: &mut PacketReader<'_>,
) -> Result<Vec<CustomParameter>, DecodeError> {
    let count = reader.read_varint7()?;
    let mut parameters = Vec::with_capacity(usize::from(count).min(reader.remaining()));
    for _ in 0..count {
        parameters.push(parse_custom_parameter(reader)?);
    }
    Ok(parameters)
}

fn parse_custom_parameter(reader: &mut PacketReader<'_>) -> Result<CustomParameter, DecodeError> {
    let sensor_number = u32::from(reader.read_varint7()?);
    let sensor_type = reader.read_u8()?;
    let mut parameter = CustomParameter {
        sensor_number,
        sensor_type,
        value: ParameterValue::Empty,
    };
    let value = parameter.kind().read(reader)?;
    parameter.value = if parameter.type_code() < layout::SENSOR_SCALED_CODE_LIMIT {
        value.scaled(parameter.scale())
    } else {
        value
    };
    Ok(parameter)
}
