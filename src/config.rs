//! Configuration for tagged document generation.

use crate::compliance::{PdfALevel, UaPart};
use crate::document::PdfVersion;
use crate::error::{Error, Result};
use crate::xmp::{XmpEncoding, XmpOptions, XmpPacketOptions};
use indexmap::IndexMap;
use serde::Deserialize;

/// Document-level tagging options.
///
/// Can be built in code with the `with_*` methods or loaded from JSON:
///
/// ```
/// use tagged_pdf::TaggingOptions;
///
/// let options = TaggingOptions::from_json(
///     r#"{ "language": "en-US", "pdfa": "1a", "title_alternates": { "de-DE": "Titel" } }"#,
/// )
/// .unwrap();
/// assert_eq!(options.language.as_deref(), Some("en-US"));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaggingOptions {
    /// PDF version declared in the header
    pub version: PdfVersion,

    /// Primary natural language of the document (BCP 47 tag)
    pub language: Option<String>,

    /// PDF/UA part declared in the metadata
    pub ua_part: UaPart,

    /// PDF/A conformance to declare, if any
    pub pdfa: Option<PdfALevel>,

    /// Translated titles by language tag, added to the title of the
    /// document properties
    pub title_alternates: IndexMap<String, String>,

    /// XMP packet encoding and padding
    pub xmp: XmpPacketOptions,
}

impl Default for TaggingOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl TaggingOptions {
    /// Create options with defaults: PDF 1.7, PDF/UA-1, no PDF/A, no language.
    pub fn new() -> Self {
        Self {
            version: PdfVersion::V1_7,
            language: None,
            ua_part: UaPart::Ua1,
            pdfa: None,
            title_alternates: IndexMap::new(),
            xmp: XmpPacketOptions::default(),
        }
    }

    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Set the PDF version.
    pub fn with_version(mut self, version: PdfVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the primary language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the PDF/UA part.
    pub fn with_ua_part(mut self, part: UaPart) -> Self {
        self.ua_part = part;
        self
    }

    /// Declare PDF/A conformance.
    pub fn with_pdfa(mut self, level: PdfALevel) -> Self {
        self.pdfa = Some(level);
        self
    }

    /// Add a translated title.
    pub fn with_title_alternate(
        mut self,
        lang: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        self.title_alternates.insert(lang.into(), title.into());
        self
    }

    /// Set the XMP packet encoding.
    pub fn with_xmp_encoding(mut self, encoding: XmpEncoding) -> Self {
        self.xmp.encoding = encoding;
        self
    }

    /// Options for the metadata synthesizer.
    pub fn xmp_options(&self) -> XmpOptions {
        XmpOptions {
            ua_part: self.ua_part,
            pdfa: self.pdfa,
            packet: self.xmp,
        }
    }

    /// Check the options for contradictions.
    pub fn validate(&self) -> Result<()> {
        match self.language.as_deref().map(str::trim) {
            None => {
                return Err(Error::Config(
                    "a tagged document needs a primary language".to_string(),
                ))
            },
            Some("") => return Err(Error::Config("primary language is empty".to_string())),
            Some(_) => {},
        }
        if self.ua_part == UaPart::Ua2 && self.version < PdfVersion::V2_0 {
            return Err(Error::Config(format!(
                "{} requires PDF 2.0, version is {}",
                self.ua_part, self.version
            )));
        }
        if let Some(level) = self.pdfa {
            if self.version > PdfVersion::V1_7 {
                return Err(Error::Config(format!(
                    "{} cannot be declared for PDF {}",
                    level, self.version
                )));
            }
        }
        if self.title_alternates.keys().any(|lang| lang.trim().is_empty()) {
            return Err(Error::Config("title alternate without a language".to_string()));
        }
        Ok(())
    }
}
