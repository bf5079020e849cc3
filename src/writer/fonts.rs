//! Fonts for generated pages.
//!
//! Two kinds of simple fonts are supported, both with a single-byte
//! encoding (ISO 32000-1:2008, Section 9.6):
//! - the standard 14 Type 1 fonts, referenced by name only
//! - TrueType programs embedded as `FontFile2`, with widths and descriptor
//!   metrics read through `ttf-parser`

use crate::document::FontSource;
use crate::encoding::FontEncoding;
use crate::error::{Error, Result};
use ttf_parser::Face;

/// Base font names of the standard 14 fonts.
pub const STANDARD_14: [&str; 14] = [
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Symbol",
    "ZapfDingbats",
];

/// First character code with a width entry.
pub(crate) const FIRST_CHAR: u8 = 32;
/// Last character code with a width entry.
pub(crate) const LAST_CHAR: u8 = 255;

/// FontDescriptor flag: uses the standard Latin character set.
const FLAG_NONSYMBOLIC: i64 = 1 << 5;
/// FontDescriptor flag: italic.
const FLAG_ITALIC: i64 = 1 << 6;

/// Metrics of an embedded TrueType program, in glyph space (1/1000 em).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrueTypeProgram {
    pub base_font: String,
    pub data: Vec<u8>,
    /// Widths of codes `FIRST_CHAR..=LAST_CHAR`
    pub widths: Vec<i64>,
    pub flags: i64,
    pub bbox: [i64; 4],
    pub ascent: i64,
    pub descent: i64,
    pub cap_height: i64,
    pub stem_v: i64,
}

impl TrueTypeProgram {
    /// Parse a font program and measure the glyphs its encoding reaches.
    pub fn parse(data: Vec<u8>, encoding: FontEncoding) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::Font("font file is empty".to_string()));
        }
        let face = Face::parse(&data, 0)
            .map_err(|e| Error::Font(format!("cannot parse TrueType font: {}", e)))?;

        let units_per_em = i64::from(face.units_per_em().max(1));
        let scale = |v: i16| i64::from(v) * 1000 / units_per_em;

        let widths = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| {
                encoding
                    .decode(code)
                    .and_then(|ch| face.glyph_index(ch))
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map(|advance| i64::from(advance) * 1000 / units_per_em)
                    .unwrap_or(0)
            })
            .collect();

        let base_font = face
            .names()
            .into_iter()
            .find(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .and_then(|name| name.to_string())
            .map(|name| name.chars().filter(|c| !c.is_whitespace()).collect::<String>())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "EmbeddedFont".to_string());

        let mut flags = FLAG_NONSYMBOLIC;
        if face.is_italic() {
            flags |= FLAG_ITALIC;
        }

        let bbox = face.global_bounding_box();
        let ascent = scale(face.ascender());
        let program = Self {
            base_font,
            widths,
            flags,
            bbox: [scale(bbox.x_min), scale(bbox.y_min), scale(bbox.x_max), scale(bbox.y_max)],
            ascent,
            descent: scale(face.descender()),
            cap_height: face.capital_height().map(scale).unwrap_or(ascent),
            stem_v: if face.is_bold() { 120 } else { 80 },
            data,
        };
        log::debug!(
            "Parsed TrueType font {} ({} bytes, {} units/em)",
            program.base_font,
            program.data.len(),
            units_per_em
        );
        Ok(program)
    }
}

/// Font program behind a resource.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FontProgram {
    Standard14(String),
    TrueType(Box<TrueTypeProgram>),
}

/// A font registered with the writer under a page resource name.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RegisteredFont {
    pub resource_name: String,
    pub encoding: FontEncoding,
    pub program: FontProgram,
}

impl RegisteredFont {
    /// Load the program for `source`.
    pub fn load(
        resource_name: String,
        source: &FontSource,
        encoding: FontEncoding,
    ) -> Result<Self> {
        let program = match source {
            FontSource::Standard14(name) => {
                if !STANDARD_14.contains(&name.as_str()) {
                    return Err(Error::Font(format!("/{} is not a standard 14 font", name)));
                }
                FontProgram::Standard14(name.clone())
            },
            FontSource::TrueType(data) => {
                FontProgram::TrueType(Box::new(TrueTypeProgram::parse(data.clone(), encoding)?))
            },
        };
        Ok(Self {
            resource_name,
            encoding,
            program,
        })
    }

    /// Whether this font was loaded from `source`.
    pub fn is_from(&self, source: &FontSource) -> bool {
        match (&self.program, source) {
            (FontProgram::Standard14(a), FontSource::Standard14(b)) => a == b,
            (FontProgram::TrueType(program), FontSource::TrueType(data)) => &program.data == data,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(source: &FontSource) -> Result<RegisteredFont> {
        RegisteredFont::load("F1".into(), source, FontEncoding::WinAnsi)
    }

    #[test]
    fn test_standard_font() {
        let font = load(&FontSource::standard("Helvetica")).unwrap();
        assert_eq!(font.program, FontProgram::Standard14("Helvetica".into()));
        assert!(font.is_from(&FontSource::standard("Helvetica")));
        assert!(!font.is_from(&FontSource::standard("Courier")));
    }

    #[test]
    fn test_unknown_standard_font() {
        assert!(matches!(load(&FontSource::standard("Arial")), Err(Error::Font(_))));
    }

    #[test]
    fn test_invalid_true_type() {
        let garbage = FontSource::TrueType(b"definitely not a font".to_vec());
        assert!(matches!(load(&garbage), Err(Error::Font(_))));
        assert!(matches!(load(&FontSource::TrueType(Vec::new())), Err(Error::Font(_))));
    }
}
