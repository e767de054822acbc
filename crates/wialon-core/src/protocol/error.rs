use thiserror::Error;

/// Errors returned by packet decoding.
///
/// A CRC mismatch is not an error: it is reported through
/// [`CrcResult::valid`](crate::CrcResult) and the acknowledgment code.
///
/// # Examples
/// ```
/// use wialon_core::DecodeError;
///
/// let err = DecodeError::BadHeader { found: 0x2525 };
/// assert!(err.to_string().contains("invalid packet head"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid packet head: expected 0x2424, found 0x{found:04x}")]
    BadHeader { found: u16 },
    #[error("unexpected end of packet: need {needed} bytes, got {actual}")]
    UnexpectedEof { needed: usize, actual: usize },
}
