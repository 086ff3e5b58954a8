//! Character decoding of text sources

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Bytes inspected when looking for UTF-16 without a byte order mark
const PROBE_LEN: usize = 4096;

/// Decode source bytes to text.
///
/// An explicit WHATWG label wins; otherwise the encoding is detected.
/// A leading byte order mark is removed either way.
pub fn decode(bytes: &[u8], label: Option<&str>) -> Result<String> {
    let encoding = match label {
        Some(label) => Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::Encoding(format!("unknown encoding label: {}", label)))?,
        None => detect_encoding(bytes),
    };

    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        warn!(encoding = encoding.name(), "input contained malformed sequences");
    }
    Ok(text.into_owned())
}

/// Guess the encoding of raw bytes
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        debug!(encoding = encoding.name(), "encoding from byte order mark");
        return encoding;
    }
    if let Some(encoding) = utf16_by_nul_parity(bytes) {
        debug!(encoding = encoding.name(), "encoding from NUL byte layout");
        return encoding;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    debug!("input is not UTF-8, falling back to windows-1252");
    WINDOWS_1252
}

/// Mostly-ASCII UTF-16 text has a NUL in every other byte
fn utf16_by_nul_parity(bytes: &[u8]) -> Option<&'static Encoding> {
    let probe = &bytes[..bytes.len().min(PROBE_LEN)];
    if probe.len() < 4 {
        return None;
    }
    let pairs = probe.len() / 2;
    let (mut even, mut odd) = (0usize, 0usize);
    for pair in probe.chunks_exact(2) {
        if pair[0] == 0 {
            even += 1;
        }
        if pair[1] == 0 {
            odd += 1;
        }
    }
    if odd * 2 > pairs && even * 10 < pairs {
        Some(UTF_16LE)
    } else if even * 2 > pairs && odd * 10 < pairs {
        Some(UTF_16BE)
    } else {
        None
    }
}
