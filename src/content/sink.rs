//! Content emission primitives.

use crate::encoding::FontEncoding;
use crate::error::Result;

/// A font registered with the document layer.
///
/// Opaque to the tagging core: only the resource name (for `Tf`) and the
/// encoding (to turn text into character codes) are visible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontHandle {
    resource_name: String,
    encoding: FontEncoding,
}

impl FontHandle {
    /// Create a handle for a font resource.
    pub fn new(resource_name: impl Into<String>, encoding: FontEncoding) -> Self {
        Self {
            resource_name: resource_name.into(),
            encoding,
        }
    }

    /// Name of the font in the page's `/Font` resources.
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Encoding used for shown text.
    pub fn encoding(&self) -> FontEncoding {
        self.encoding
    }
}

/// Receiver of page content operators.
///
/// Every method is fallible so that I/O errors of a streaming
/// implementation reach the caller unchanged.
pub trait ContentSink {
    /// Begin a text object (`BT`).
    fn begin_text_run(&mut self) -> Result<()>;

    /// End the text object (`ET`).
    fn end_text_run(&mut self) -> Result<()>;

    /// Select font and size (`Tf`).
    fn set_font(&mut self, font: &FontHandle, size: f32) -> Result<()>;

    /// Move to the start of the next line, offset from the current line start (`Td`).
    fn move_to(&mut self, x: f32, y: f32) -> Result<()>;

    /// Set the text leading (`TL`).
    fn set_line_spacing(&mut self, leading: f32) -> Result<()>;

    /// Show text (`Tj`).
    fn show_text(&mut self, text: &str) -> Result<()>;

    /// Move to the next line and show text (`'`).
    fn next_line_show_text(&mut self, text: &str) -> Result<()>;

    /// Begin a marked-content sequence with an MCID (`BDC`).
    fn begin_marked_content(&mut self, tag: &str, mcid: u32) -> Result<()>;

    /// End the innermost marked-content sequence (`EMC`).
    fn end_marked_content(&mut self) -> Result<()>;
}
