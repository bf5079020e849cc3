//! The document layer: the PDF container a tagged document is written into.
//!
//! A [`DocumentLayer`] owns everything below the tagging core: object
//! numbering, page trees, font programs and the file structure. The core
//! only sequences calls to it.

use crate::content::{ContentSink, FontHandle};
use crate::encoding::FontEncoding;
use crate::error::{Error, Result};
use crate::info::InfoDictionary;
use crate::structure::SerializedTree;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// PDF version written to the file header.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PdfVersion {
    /// PDF 1.4
    #[serde(rename = "1.4")]
    V1_4,
    /// PDF 1.5
    #[serde(rename = "1.5")]
    V1_5,
    /// PDF 1.6
    #[serde(rename = "1.6")]
    V1_6,
    /// PDF 1.7 (ISO 32000-1)
    #[default]
    #[serde(rename = "1.7")]
    V1_7,
    /// PDF 2.0 (ISO 32000-2)
    #[serde(rename = "2.0")]
    V2_0,
}

impl PdfVersion {
    /// Version number, e.g. `"1.7"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfVersion::V1_4 => "1.4",
            PdfVersion::V1_5 => "1.5",
            PdfVersion::V1_6 => "1.6",
            PdfVersion::V1_7 => "1.7",
            PdfVersion::V2_0 => "2.0",
        }
    }

    /// File header line, e.g. `"%PDF-1.7"`.
    pub fn header(&self) -> String {
        format!("%PDF-{}", self.as_str())
    }
}

impl fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

impl PageSize {
    /// ISO A4 (210mm x 297mm).
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };

    /// US Letter (8.5" x 11").
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    /// Custom page size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Where a font program comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// One of the standard 14 fonts, by base font name (not embedded)
    Standard14(String),
    /// TrueType font program to embed
    TrueType(Vec<u8>),
}

impl FontSource {
    /// Standard 14 font by name, e.g. `"Helvetica"`.
    pub fn standard(name: impl Into<String>) -> Self {
        FontSource::Standard14(name.into())
    }

    /// Read a TrueType font file.
    pub fn true_type_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Error::Font(format!("cannot read {}: {}", path.display(), e)))?;
        Ok(FontSource::TrueType(data))
    }
}

/// Primitives a tagged document needs from the PDF container.
///
/// Page lifecycle: `begin_page` makes a content sink available through
/// `content` until the matching `end_page`. The document-level declarations
/// (`set_document_version`, `declare_tagged`, `set_primary_language`,
/// `attach_structure_tree`, `attach_metadata_block`) are each called exactly
/// once, after the last page and before `finish`.
pub trait DocumentLayer {
    /// Content sink of the current page.
    type Content: ContentSink;

    /// What `finish` produces (bytes, a file handle, ...).
    type Output;

    /// Raw Info dictionary entries to derive the metadata from.
    fn raw_document_properties(&self) -> InfoDictionary;

    /// Make a font available to page content.
    fn embed_font(&mut self, source: &FontSource, encoding: FontEncoding) -> Result<FontHandle>;

    /// Start a new page and return its zero-based index.
    fn begin_page(&mut self, size: PageSize) -> Result<usize>;

    /// Content sink of the page being written, if any.
    fn content(&mut self) -> Option<&mut Self::Content>;

    /// Finish the current page. `struct_parents` is the page's key in the
    /// structure parent tree.
    fn end_page(&mut self, struct_parents: usize) -> Result<()>;

    /// Attach the XMP packet as the document metadata stream.
    fn attach_metadata_block(&mut self, bytes: Vec<u8>) -> Result<()>;

    /// Mark the document as tagged (`/MarkInfo << /Marked true >>`).
    fn declare_tagged(&mut self) -> Result<()>;

    /// Attach the logical structure.
    fn attach_structure_tree(&mut self, tree: &SerializedTree) -> Result<()>;

    /// Set the document's primary language (`/Lang`).
    fn set_primary_language(&mut self, lang: &str) -> Result<()>;

    /// Set the PDF version.
    fn set_document_version(&mut self, version: PdfVersion) -> Result<()>;

    /// Produce the final document.
    fn finish(self) -> Result<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering_and_header() {
        assert!(PdfVersion::V1_7 < PdfVersion::V2_0);
        assert_eq!(PdfVersion::default().header(), "%PDF-1.7");
        assert_eq!(PdfVersion::V2_0.to_string(), "2.0");
    }

    #[test]
    fn test_version_serde_names() {
        let version: PdfVersion = serde_json::from_str("\"1.4\"").unwrap();
        assert_eq!(version, PdfVersion::V1_4);
        assert_eq!(serde_json::to_string(&PdfVersion::V1_7).unwrap(), "\"1.7\"");
    }

    #[test]
    fn test_page_sizes() {
        assert_eq!(PageSize::default(), PageSize::A4);
        assert_eq!(PageSize::LETTER.width, 612.0);
        assert_eq!(PageSize::new(100.0, 200.0).height, 200.0);
    }

    #[test]
    fn test_missing_font_file() {
        let result = FontSource::true_type_file("/nonexistent/font.ttf");
        assert!(matches!(result, Err(Error::Font(_))));
    }
}
