//! Page content streams (ISO 32000-1:2008, Sections 9.4 and 14.6).
//!
//! [`ContentStreamBuilder`] records text and marked-content operators and
//! serializes them one per line. Strings are encoded with the encoding of
//! the font selected by the last `Tf`.

use super::sink::{ContentSink, FontHandle};
use crate::error::{Error, Result};
use crate::writer::write_name;
use std::io::Write;

/// A recorded content stream operator.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// `BT`
    BeginText,
    /// `ET`
    EndText,
    /// `/name size Tf`
    SetFont(String, f32),
    /// `tx ty Td`
    MoveText(f32, f32),
    /// `leading TL`
    SetTextLeading(f32),
    /// `(...) Tj` with bytes already in the font encoding
    ShowText(Vec<u8>),
    /// `(...) '`: next line, then show
    NextLineShowText(Vec<u8>),
    /// `/Tag <</MCID n>> BDC`
    BeginMarkedContent {
        /// Structure type of the owning element
        tag: String,
        /// Marked-content identifier, unique per page
        mcid: u32,
    },
    /// `EMC`
    EndMarkedContent,
}

impl ContentStreamOp {
    fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        match self {
            ContentStreamOp::BeginText => w.write_all(b"BT"),
            ContentStreamOp::EndText => w.write_all(b"ET"),
            ContentStreamOp::SetFont(name, size) => {
                write_name(w, name)?;
                write!(w, " {} Tf", size)
            },
            ContentStreamOp::MoveText(tx, ty) => write!(w, "{} {} Td", tx, ty),
            ContentStreamOp::SetTextLeading(leading) => write!(w, "{} TL", leading),
            ContentStreamOp::ShowText(bytes) => {
                write_literal(w, bytes)?;
                w.write_all(b" Tj")
            },
            ContentStreamOp::NextLineShowText(bytes) => {
                write_literal(w, bytes)?;
                w.write_all(b" '")
            },
            ContentStreamOp::BeginMarkedContent { tag, mcid } => {
                write_name(w, tag)?;
                write!(w, " <</MCID {}>> BDC", mcid)
            },
            ContentStreamOp::EndMarkedContent => w.write_all(b"EMC"),
        }
    }
}

/// Records the operators of one page.
#[derive(Debug, Default)]
pub struct ContentStreamBuilder {
    operations: Vec<ContentStreamOp>,
    font: Option<(FontHandle, f32)>,
    in_text: bool,
}

impl ContentStreamBuilder {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded operators, in order.
    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Open a text object unless one is open.
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text {
            self.operations.push(ContentStreamOp::BeginText);
            self.in_text = true;
        }
        self
    }

    /// Close the open text object, if any.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text {
            self.operations.push(ContentStreamOp::EndText);
            self.in_text = false;
        }
        self
    }

    /// Select a font. Selecting the current font and size again is a no-op.
    pub fn set_font(&mut self, font: &FontHandle, size: f32) -> &mut Self {
        if self.font.as_ref() != Some(&(font.clone(), size)) {
            self.operations
                .push(ContentStreamOp::SetFont(font.resource_name().to_string(), size));
            self.font = Some((font.clone(), size));
        }
        self
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let (font, _) = self
            .font
            .as_ref()
            .ok_or_else(|| Error::Font("text shown before a font was selected".to_string()))?;
        Ok(font.encoding().encode(text))
    }

    /// Serialize, one operator per line.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        for op in &self.operations {
            op.write_to(&mut buf)?;
            buf.push(b'\n');
        }
        Ok(buf)
    }
}

impl ContentSink for ContentStreamBuilder {
    fn begin_text_run(&mut self) -> Result<()> {
        self.begin_text();
        Ok(())
    }

    fn end_text_run(&mut self) -> Result<()> {
        self.end_text();
        Ok(())
    }

    fn set_font(&mut self, font: &FontHandle, size: f32) -> Result<()> {
        ContentStreamBuilder::set_font(self, font, size);
        Ok(())
    }

    fn move_to(&mut self, x: f32, y: f32) -> Result<()> {
        self.operations.push(ContentStreamOp::MoveText(x, y));
        Ok(())
    }

    fn set_line_spacing(&mut self, leading: f32) -> Result<()> {
        self.operations.push(ContentStreamOp::SetTextLeading(leading));
        Ok(())
    }

    fn show_text(&mut self, text: &str) -> Result<()> {
        let bytes = self.encode(text)?;
        self.begin_text().operations.push(ContentStreamOp::ShowText(bytes));
        Ok(())
    }

    fn next_line_show_text(&mut self, text: &str) -> Result<()> {
        let bytes = self.encode(text)?;
        self.begin_text()
            .operations
            .push(ContentStreamOp::NextLineShowText(bytes));
        Ok(())
    }

    fn begin_marked_content(&mut self, tag: &str, mcid: u32) -> Result<()> {
        self.operations.push(ContentStreamOp::BeginMarkedContent {
            tag: tag.to_string(),
            mcid,
        });
        Ok(())
    }

    fn end_marked_content(&mut self) -> Result<()> {
        self.operations.push(ContentStreamOp::EndMarkedContent);
        Ok(())
    }
}

/// Literal string with delimiters and control characters escaped.
fn write_literal<W: Write>(w: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(b'(');
    for &byte in bytes {
        match byte {
            b'(' | b')' | b'\\' => out.extend_from_slice(&[b'\\', byte]),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            _ => out.push(byte),
        }
    }
    out.push(b')');
    w.write_all(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::FontEncoding;

    fn helvetica() -> FontHandle {
        FontHandle::new("F1", FontEncoding::WinAnsi)
    }

    fn built(builder: &ContentStreamBuilder) -> String {
        String::from_utf8_lossy(&builder.build().unwrap()).into_owned()
    }

    #[test]
    fn test_simple_text() {
        let mut builder = ContentStreamBuilder::new();
        builder.begin_text_run().unwrap();
        ContentSink::set_font(&mut builder, &helvetica(), 12.0).unwrap();
        builder.move_to(72.0, 720.0).unwrap();
        builder.show_text("Hello, World!").unwrap();
        builder.end_text_run().unwrap();

        assert_eq!(built(&builder), "BT\n/F1 12 Tf\n72 720 Td\n(Hello, World!) Tj\nET\n");
    }

    #[test]
    fn test_text_is_win_ansi_encoded() {
        let mut builder = ContentStreamBuilder::new();
        ContentSink::set_font(&mut builder, &helvetica(), 12.0).unwrap();
        builder.show_text("für").unwrap();

        let bytes = builder.build().unwrap();
        let needle = [b'(', b'f', 0xFC, b'r', b')'];
        assert!(bytes.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn test_show_text_without_font_fails() {
        let mut builder = ContentStreamBuilder::new();
        assert!(matches!(builder.show_text("x"), Err(Error::Font(_))));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_leading_and_next_line() {
        let mut builder = ContentStreamBuilder::new();
        ContentSink::set_font(&mut builder, &helvetica(), 12.0).unwrap();
        builder.set_line_spacing(14.0).unwrap();
        builder.show_text("Bundestags-").unwrap();
        builder.next_line_show_text("präsident.").unwrap();
        builder.end_text_run().unwrap();

        let content = built(&builder);
        assert!(content.contains("14 TL"));
        assert!(content.contains("(Bundestags-) Tj"));
        assert!(content.contains("pr\u{FFFD}sident.) '"));
    }

    #[test]
    fn test_marked_content_operators() {
        let mut builder = ContentStreamBuilder::new();
        builder.begin_marked_content("P", 0).unwrap();
        builder.end_marked_content().unwrap();

        assert_eq!(built(&builder), "/P <</MCID 0>> BDC\nEMC\n");
    }

    #[test]
    fn test_marked_content_tag_is_escaped() {
        let mut builder = ContentStreamBuilder::new();
        builder.begin_marked_content("Body Text#1", 3).unwrap();
        builder.end_marked_content().unwrap();

        assert_eq!(built(&builder), "/Body#20Text#231 <</MCID 3>> BDC\nEMC\n");
    }

    #[test]
    fn test_font_selection_deduplicated() {
        let mut builder = ContentStreamBuilder::new();
        builder.set_font(&helvetica(), 12.0);
        builder.set_font(&helvetica(), 12.0);
        builder.set_font(&helvetica(), 10.0);
        let fonts = builder
            .operations()
            .iter()
            .filter(|op| matches!(op, ContentStreamOp::SetFont(..)))
            .count();
        assert_eq!(fonts, 2);
    }

    #[test]
    fn test_string_escaping() {
        let mut builder = ContentStreamBuilder::new();
        ContentSink::set_font(&mut builder, &helvetica(), 12.0).unwrap();
        builder.show_text("a(b)c\\").unwrap();
        assert!(built(&builder).contains("(a\\(b\\)c\\\\) Tj"));
    }
}
