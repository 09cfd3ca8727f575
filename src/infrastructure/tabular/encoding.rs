// ============================================================
// SOURCE ENCODINGS
// ============================================================
// Candidate character encodings for uploaded delimited text

use encoding_rs::{DecoderResult, Encoding, UTF_8, WINDOWS_1252};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encodings tried, in order, when reading delimited text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Latin1,
    Windows1252,
}

impl SourceEncoding {
    pub const CANDIDATES: [SourceEncoding; 3] = [
        SourceEncoding::Utf8,
        SourceEncoding::Latin1,
        SourceEncoding::Windows1252,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "UTF-8",
            SourceEncoding::Latin1 => "ISO-8859-1",
            SourceEncoding::Windows1252 => "windows-1252",
        }
    }

    /// Decode a leading slice of the buffer. A multi-byte sequence cut by the
    /// end of the slice is not an error. `None` when the bytes are not valid
    /// in this encoding.
    pub fn decode_sample(&self, bytes: &[u8], limit: usize) -> Option<String> {
        let bytes = self.strip_bom(bytes);
        let end = bytes.len().min(limit);
        let last = end == bytes.len();
        match self {
            SourceEncoding::Utf8 => decode_with(UTF_8, &bytes[..end], last),
            SourceEncoding::Latin1 => decode_latin1(&bytes[..end]),
            SourceEncoding::Windows1252 => decode_with(WINDOWS_1252, &bytes[..end], last),
        }
    }

    /// Decode the whole buffer, `None` when it is not valid in this encoding
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        let bytes = self.strip_bom(bytes);
        match self {
            SourceEncoding::Utf8 => decode_with(UTF_8, bytes, true),
            SourceEncoding::Latin1 => decode_latin1(bytes),
            SourceEncoding::Windows1252 => decode_with(WINDOWS_1252, bytes, true),
        }
    }

    fn strip_bom<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        match self {
            SourceEncoding::Utf8 => bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes),
            _ => bytes,
        }
    }
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8], last: bool) -> Option<String> {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let capacity = decoder.max_utf8_buffer_length_without_replacement(bytes.len())?;
    let mut out = String::with_capacity(capacity);
    let (result, _read) = decoder.decode_to_string_without_replacement(bytes, &mut out, last);
    match result {
        DecoderResult::InputEmpty => Some(out),
        DecoderResult::OutputFull | DecoderResult::Malformed(_, _) => None,
    }
}

/// ISO-8859-1, byte value = code point. C1 controls (0x80..=0x9F) reject the
/// buffer so windows-1252 gets it instead.
fn decode_latin1(bytes: &[u8]) -> Option<String> {
    if bytes.iter().any(|b| (0x80..=0x9F).contains(b)) {
        return None;
    }
    Some(bytes.iter().map(|&b| b as char).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_sample_tolerates_cut_sequence() {
        let text = "code;libellé\n";
        let bytes = text.as_bytes();
        // cut inside the two-byte 'é'
        let cut = text.find('é').unwrap() + 1;
        let sample = SourceEncoding::Utf8.decode_sample(bytes, cut).unwrap();
        assert_eq!(sample, "code;libell");
        assert!(SourceEncoding::Utf8.decode(&bytes[..cut]).is_none());
    }

    #[test]
    fn test_utf8_rejects_latin1_bytes() {
        let (bytes, _, _) = WINDOWS_1252.encode("Société");
        assert!(SourceEncoding::Utf8.decode(&bytes).is_none());
        assert_eq!(SourceEncoding::Latin1.decode(&bytes).unwrap(), "Société");
    }

    #[test]
    fn test_latin1_defers_to_windows_1252() {
        let (bytes, _, _) = WINDOWS_1252.encode("prix €");
        assert!(SourceEncoding::Latin1.decode(&bytes).is_none());
        assert_eq!(SourceEncoding::Windows1252.decode(&bytes).unwrap(), "prix €");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBFcode\n123456\n";
        assert_eq!(
            SourceEncoding::Utf8.decode(bytes).unwrap(),
            "code\n123456\n"
        );
    }
}
