//! Packet buffer loading.
//!
//! All file I/O of the crate lives here. Captures are stored either as hex
//! dumps (what device logs and test fixtures usually contain) or as raw
//! binary.

mod hexdump;

pub use hexdump::parse_hex_dump;

use std::fs;
use std::path::Path;

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex input: odd number of hex digits ({digits})")]
    InvalidHex { digits: usize },
}

/// How a capture file is encoded on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    /// Binary for `.bin`/`.raw`, hex dump for anything else.
    #[default]
    Auto,
    Hex,
    Binary,
}

impl InputFormat {
    pub fn resolve(self, path: &Path) -> Self {
        if self != Self::Auto {
            return self;
        }
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "bin" | "raw" => Self::Binary,
            _ => Self::Hex,
        }
    }
}

/// Load one packet buffer from `path`.
///
/// # Errors
/// Returns [`SourceError::Io`] when the file cannot be read and
/// [`SourceError::InvalidHex`] for malformed hex dumps.
pub fn read_packet_file(path: &Path, format: InputFormat) -> Result<Vec<u8>, SourceError> {
    let format = format.resolve(path);
    debug!("reading {} as {:?}", path.display(), format);
    match format {
        InputFormat::Binary => Ok(fs::read(path)?),
        InputFormat::Hex | InputFormat::Auto => parse_hex_dump(&fs::read_to_string(path)?),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::InputFormat;

    #[test]
    fn auto_format_uses_extension() {
        assert_eq!(
            InputFormat::Auto.resolve(Path::new("capture.BIN")),
            InputFormat::Binary
        );
        assert_eq!(
            InputFormat::Auto.resolve(Path::new("capture.raw")),
            InputFormat::Binary
        );
        assert_eq!(
            InputFormat::Auto.resolve(Path::new("example.dat")),
            InputFormat::Hex
        );
        assert_eq!(InputFormat::Auto.resolve(Path::new("noext")), InputFormat::Hex);
    }

    #[test]
    fn explicit_format_wins() {
        assert_eq!(
            InputFormat::Hex.resolve(Path::new("capture.bin")),
            InputFormat::Hex
        );
    }
}
