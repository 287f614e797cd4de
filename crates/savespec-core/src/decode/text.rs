//! Text decoding for string descriptors

use encoding_rs::{Encoding, UTF_8};

use crate::error::{Error, Result};

/// A resolved string encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict 7-bit ASCII
    Ascii,
    /// Any encoding known to `encoding_rs` (UTF-8, Shift_JIS, ...)
    Standard(&'static Encoding),
}

impl TextEncoding {
    /// Resolve an encoding label such as `ascii`, `utf-8` or `shift_jis`
    ///
    /// `encoding_rs` maps `ascii` to windows-1252, so it is handled here first.
    pub fn for_label(label: &str) -> Result<Self> {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case("ascii") || trimmed.eq_ignore_ascii_case("us-ascii") {
            return Ok(Self::Ascii);
        }
        if trimmed.eq_ignore_ascii_case("utf8") {
            return Ok(Self::Standard(UTF_8));
        }
        Encoding::for_label(trimmed.as_bytes())
            .map(Self::Standard)
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Standard(encoding) => encoding.name(),
        }
    }

    /// Decode bytes, failing on anything malformed for this encoding
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(pos) => Err(Error::EncodingError(format!(
                    "non-ASCII byte {:#04x} at index {}",
                    bytes[pos], pos
                ))),
                None => Ok(bytes.iter().map(|&b| b as char).collect()),
            },
            Self::Standard(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned())
                .ok_or_else(|| {
                    Error::EncodingError(format!("malformed {} text", encoding.name()))
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(TextEncoding::for_label("ascii").unwrap(), TextEncoding::Ascii);
        assert_eq!(TextEncoding::for_label("ASCII").unwrap(), TextEncoding::Ascii);
        assert_eq!(
            TextEncoding::for_label("utf-8").unwrap(),
            TextEncoding::Standard(UTF_8)
        );
        assert_eq!(TextEncoding::for_label("utf8").unwrap().name(), "UTF-8");
        assert_eq!(TextEncoding::for_label("shift_jis").unwrap().name(), "Shift_JIS");
        assert!(matches!(
            TextEncoding::for_label("ebcdic-ish"),
            Err(Error::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_ascii_strict() {
        let ascii = TextEncoding::Ascii;
        assert_eq!(ascii.decode(b"Link").unwrap(), "Link");
        let err = ascii.decode(&[b'A', 0xC3, 0xA9]).unwrap_err();
        assert_eq!(err.to_string(), "Encoding error: non-ASCII byte 0xc3 at index 1");
    }

    #[test]
    fn test_utf8_strict() {
        let utf8 = TextEncoding::for_label("utf-8").unwrap();
        assert_eq!(utf8.decode("héllo".as_bytes()).unwrap(), "héllo");
        assert!(utf8.decode(&[0xFF, 0xFE]).is_err());
    }

    #[test]
    fn test_shift_jis() {
        let sjis = TextEncoding::for_label("shift_jis").unwrap();
        // "テスト"
        let bytes = [0x83, 0x65, 0x83, 0x58, 0x83, 0x67];
        assert_eq!(sjis.decode(&bytes).unwrap(), "テスト");
    }
}
