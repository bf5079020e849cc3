//! Text encodings used when writing PDF strings.
//!
//! Two different encodings are involved in a tagged document:
//!
//! - **Text strings** (Info dictionary values, `/Lang`, `/ActualText`) use
//!   PDFDocEncoding when every character fits, and UTF-16BE with a BOM
//!   otherwise (ISO 32000-1:2008, Section 7.9.2.2).
//! - **Shown text** in content streams is encoded with the font's encoding.
//!   Simple fonts use WinAnsiEncoding (Annex D.2).

use serde::{Deserialize, Serialize};

/// Decode a single PDFDocEncoding byte.
pub fn pdfdoc_decode(code: u8) -> Option<char> {
    match code {
        0x18 => Some('\u{02D8}'), // breve
        0x19 => Some('\u{02C7}'), // caron
        0x1A => Some('\u{02C6}'), // circumflex
        0x1B => Some('\u{02D9}'), // dotaccent
        0x1C => Some('\u{02DD}'), // hungarumlaut
        0x1D => Some('\u{02DB}'), // ogonek
        0x1E => Some('\u{02DA}'), // ring
        0x1F => Some('\u{02DC}'), // tilde
        0x7F => None,
        0x00..=0x7E => Some(code as char),
        0x80 => Some('\u{2022}'), // bullet
        0x81 => Some('\u{2020}'), // dagger
        0x82 => Some('\u{2021}'), // daggerdbl
        0x83 => Some('\u{2026}'), // ellipsis
        0x84 => Some('\u{2014}'), // emdash
        0x85 => Some('\u{2013}'), // endash
        0x86 => Some('\u{0192}'), // florin
        0x87 => Some('\u{2044}'), // fraction
        0x88 => Some('\u{2039}'), // guilsinglleft
        0x89 => Some('\u{203A}'), // guilsinglright
        0x8A => Some('\u{2212}'), // minus
        0x8B => Some('\u{2030}'), // perthousand
        0x8C => Some('\u{201E}'), // quotedblbase
        0x8D => Some('\u{201C}'), // quotedblleft
        0x8E => Some('\u{201D}'), // quotedblright
        0x8F => Some('\u{2018}'), // quoteleft
        0x90 => Some('\u{2019}'), // quoteright
        0x91 => Some('\u{201A}'), // quotesinglbase
        0x92 => Some('\u{2122}'), // trademark
        0x93 => Some('\u{FB01}'), // fi
        0x94 => Some('\u{FB02}'), // fl
        0x95 => Some('\u{0141}'), // Lslash
        0x96 => Some('\u{0152}'), // OE
        0x97 => Some('\u{0160}'), // Scaron
        0x98 => Some('\u{0178}'), // Ydieresis
        0x99 => Some('\u{017D}'), // Zcaron
        0x9A => Some('\u{0131}'), // dotlessi
        0x9B => Some('\u{0142}'), // lslash
        0x9C => Some('\u{0153}'), // oe
        0x9D => Some('\u{0161}'), // scaron
        0x9E => Some('\u{017E}'), // zcaron
        0x9F => None,
        0xA0 => Some('\u{20AC}'), // Euro
        0xAD => None,
        0xA1..=0xFF => Some(code as char),
    }
}

/// Encode a character in PDFDocEncoding.
pub fn pdfdoc_encode(ch: char) -> Option<u8> {
    let cp = ch as u32;
    // Printable ASCII and Latin-1 map to themselves except the few holes.
    if (0x20..=0x7E).contains(&cp) || ch == '\n' || ch == '\r' || ch == '\t' {
        return Some(cp as u8);
    }
    if (0xA1..=0xFF).contains(&cp) && cp != 0xAD {
        return Some(cp as u8);
    }
    (0x18u8..=0x1F)
        .chain(0x80u8..=0xA0)
        .find(|&code| pdfdoc_decode(code) == Some(ch))
}

/// Decode a PDF text string.
///
/// Strings starting with `FE FF` are UTF-16BE, strings starting with
/// `EF BB BF` are UTF-8 (PDF 2.0), everything else is PDFDocEncoding.
/// Undefined PDFDocEncoding bytes are dropped.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8_lossy(&bytes[3..]).into_owned()
    } else {
        bytes.iter().filter_map(|&b| pdfdoc_decode(b)).collect()
    }
}

/// Encode a PDF text string.
///
/// Uses PDFDocEncoding when every character is representable, UTF-16BE with
/// a byte order mark otherwise.
pub fn encode_text_string(text: &str) -> Vec<u8> {
    let single: Option<Vec<u8>> = text.chars().map(pdfdoc_encode).collect();
    match single {
        Some(bytes) => bytes,
        None => {
            let mut out = Vec::with_capacity(2 + text.len() * 2);
            out.extend_from_slice(&[0xFE, 0xFF]);
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
            out
        },
    }
}

/// Decode a single WinAnsiEncoding byte.
pub fn win_ansi_decode(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E => Some(code as char),
        0x80 => Some('\u{20AC}'),
        0x82 => Some('\u{201A}'),
        0x83 => Some('\u{0192}'),
        0x84 => Some('\u{201E}'),
        0x85 => Some('\u{2026}'),
        0x86 => Some('\u{2020}'),
        0x87 => Some('\u{2021}'),
        0x88 => Some('\u{02C6}'),
        0x89 => Some('\u{2030}'),
        0x8A => Some('\u{0160}'),
        0x8B => Some('\u{2039}'),
        0x8C => Some('\u{0152}'),
        0x8E => Some('\u{017D}'),
        0x91 => Some('\u{2018}'),
        0x92 => Some('\u{2019}'),
        0x93 => Some('\u{201C}'),
        0x94 => Some('\u{201D}'),
        0x95 => Some('\u{2022}'),
        0x96 => Some('\u{2013}'),
        0x97 => Some('\u{2014}'),
        0x98 => Some('\u{02DC}'),
        0x99 => Some('\u{2122}'),
        0x9A => Some('\u{0161}'),
        0x9B => Some('\u{203A}'),
        0x9C => Some('\u{0153}'),
        0x9E => Some('\u{017E}'),
        0x9F => Some('\u{0178}'),
        0xA0..=0xFF => Some(code as char),
        _ => None,
    }
}

/// Encode a character in WinAnsiEncoding.
pub fn win_ansi_encode(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    (0x80u8..=0x9F).find(|&code| win_ansi_decode(code) == Some(ch))
}

/// Encoding of a simple font, used to turn shown text into byte codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontEncoding {
    /// WinAnsiEncoding (Windows code page 1252)
    #[default]
    WinAnsi,
}

impl FontEncoding {
    /// PDF name of the encoding for the font dictionary.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            FontEncoding::WinAnsi => "WinAnsiEncoding",
        }
    }

    /// Decode a single character code.
    pub fn decode(&self, code: u8) -> Option<char> {
        match self {
            FontEncoding::WinAnsi => win_ansi_decode(code),
        }
    }

    /// Encode text to character codes.
    ///
    /// Characters the encoding cannot represent are replaced with `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|ch| match self {
                FontEncoding::WinAnsi => win_ansi_encode(ch).unwrap_or_else(|| {
                    log::warn!("Character U+{:04X} is not in WinAnsiEncoding", ch as u32);
                    b'?'
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf16be() {
        let bytes = [0xFE, 0xFF, 0x00, 0x54, 0x00, 0xFC];
        assert_eq!(decode_text_string(&bytes), "Tü");
    }

    #[test]
    fn test_decode_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("Größe".as_bytes());
        assert_eq!(decode_text_string(&bytes), "Größe");
    }

    #[test]
    fn test_decode_pdfdoc_specials() {
        assert_eq!(decode_text_string(&[0x80, 0x20, 0xA0, 0x84]), "\u{2022} \u{20AC}\u{2014}");
    }

    #[test]
    fn test_encode_latin1_stays_pdfdoc() {
        assert_eq!(encode_text_string("für"), vec![b'f', 0xFC, b'r']);
    }

    #[test]
    fn test_encode_falls_back_to_utf16() {
        let bytes = encode_text_string("日本");
        assert_eq!(bytes, vec![0xFE, 0xFF, 0x65, 0xE5, 0x67, 0x2C]);
        assert_eq!(decode_text_string(&bytes), "日本");
    }

    #[test]
    fn test_encode_supplementary_plane() {
        let text = "note \u{1D11E}";
        assert_eq!(decode_text_string(&encode_text_string(text)), text);
    }

    #[test]
    fn test_win_ansi_encode() {
        let encoded = FontEncoding::WinAnsi.encode("Bundestagspräsident – €");
        assert!(encoded.contains(&0xE4));
        assert!(encoded.contains(&0x96));
        assert_eq!(*encoded.last().unwrap(), 0x80);
    }

    #[test]
    fn test_win_ansi_unmappable_is_question_mark() {
        assert_eq!(FontEncoding::WinAnsi.encode("a\u{4E2D}"), b"a?".to_vec());
    }

    #[test]
    fn test_win_ansi_tables_agree() {
        for code in 0u8..=255 {
            if let Some(ch) = win_ansi_decode(code) {
                assert_eq!(win_ansi_encode(ch), Some(code));
            }
        }
    }
}
