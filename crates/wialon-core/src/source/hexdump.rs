use super::SourceError;

/// Convert a hex dump into bytes.
///
/// Every character that is not a hex digit is discarded first, so spaced,
/// colon-separated and multi-line dumps all work. The remaining digit count
/// must be even.
///
/// # Examples
/// ```
/// use wialon_core::parse_hex_dump;
///
/// let bytes = parse_hex_dump("24 24\n02:00")?;
/// assert_eq!(bytes, vec![0x24, 0x24, 0x02, 0x00]);
/// # Ok::<(), wialon_core::SourceError>(())
/// ```
///
/// # Errors
/// Returns [`SourceError::InvalidHex`] for an odd number of digits.
pub fn parse_hex_dump(text: &str) -> Result<Vec<u8>, SourceError> {
    let digits: String = text.chars().filter(char::is_ascii_hexdigit).collect();
    // Only hex digits are left, so odd length is the one way decode can fail.
    hex::decode(&digits).map_err(|_| SourceError::InvalidHex {
        digits: digits.len(),
    })
}
