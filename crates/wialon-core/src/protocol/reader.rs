use super::error::DecodeError;
use super::layout;

/// Sequential, bounds-checked reader over an immutable packet buffer.
///
/// Every read advances the cursor on success and fails with
/// [`DecodeError::UnexpectedEof`] when the buffer is too short, leaving the
/// cursor untouched.
pub struct PacketReader<'a> {
    payload: &'a [u8],
    position: usize,
}

impl<'a> PacketReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            payload,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.payload.len().saturating_sub(self.position)
    }

    /// The whole underlying buffer, independent of the cursor.
    pub fn buffer(&self) -> &'a [u8] {
        self.payload
    }

    pub fn require_remaining(&self, needed: usize) -> Result<(), DecodeError> {
        if self.remaining() < needed {
            return Err(self.eof(needed));
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.read_array::<2>()?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_array::<4>()?;
        Ok(u32::from_be_bytes(bytes))
    }

    pub fn read_i32_be(&mut self) -> Result<i32, DecodeError> {
        let bytes = self.read_array::<4>()?;
        Ok(i32::from_be_bytes(bytes))
    }

    /// Two big-endian u32 words, high word first.
    pub fn read_u64_be(&mut self) -> Result<u64, DecodeError> {
        self.require_remaining(8)?;
        let high = self.read_u32_be()?;
        let low = self.read_u32_be()?;
        Ok((u64::from(high) << 32) | u64::from(low))
    }

    pub fn read_f32_be(&mut self) -> Result<f32, DecodeError> {
        let bytes = self.read_array::<4>()?;
        Ok(f32::from_be_bytes(bytes))
    }

    pub fn read_f64_be(&mut self) -> Result<f64, DecodeError> {
        let bytes = self.read_array::<8>()?;
        Ok(f64::from_be_bytes(bytes))
    }

    /// Reads up to a `0x00` terminator (consumed, not returned).
    ///
    /// Running off the end of the buffer is not an error: devices are known
    /// to send unterminated trailing strings, so the accumulated bytes are
    /// returned as-is. Do not copy this laxness to other fields.
    pub fn read_cstring(&mut self) -> String {
        let payload = self.payload;
        let rest = &payload[self.position..];
        let (text, consumed) = match rest.iter().position(|&b| b == 0) {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        self.position += consumed;
        String::from_utf8_lossy(text).into_owned()
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .position
            .checked_add(len)
            .ok_or_else(|| self.eof(len))?;
        let payload = self.payload;
        let bytes = payload
            .get(self.position..end)
            .ok_or_else(|| self.eof(len))?;
        self.position = end;
        Ok(bytes)
    }

    /// 1-byte extensible field; bit 7 set means one more byte follows and the
    /// value is 15 bits wide.
    pub fn read_varint7(&mut self) -> Result<u16, DecodeError> {
        let first = self.read_u8()?;
        if first & layout::VARINT7_CONTINUATION == 0 {
            return Ok(u16::from(first));
        }
        let second = self.read_u8()?;
        Ok((u16::from(first & !layout::VARINT7_CONTINUATION) << 8) | u16::from(second))
    }

    /// 2-byte extensible field; bit 15 set means one more word follows and
    /// the value is 31 bits wide.
    pub fn read_varint15(&mut self) -> Result<u32, DecodeError> {
        let first = self.read_u16_be()?;
        if first & layout::VARINT15_CONTINUATION == 0 {
            return Ok(u32::from(first));
        }
        let second = self.read_u16_be()?;
        Ok((u32::from(first & !layout::VARINT15_CONTINUATION) << 16) | u32::from(second))
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn eof(&self, len: usize) -> DecodeError {
        DecodeError::UnexpectedEof {
            needed: self.position.saturating_add(len),
            actual: self.payload.len(),
        }
    }
}
