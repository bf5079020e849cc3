//! # Tagged PDF
//!
//! Generation of accessible (PDF/UA) tagged PDF documents in Rust.
//!
//! ## Core Features
//!
//! - **Structure Tree**: arena-based logical structure (ISO 32000-1:2008 §14.7)
//!   with per-element language, actual text and alternate descriptions
//! - **Marked Content**: stack-validated `BDC`/`EMC` sequences linking page
//!   content to structure elements (§14.6)
//! - **XMP Metadata**: deterministic synthesis of `dc`, `pdf`, `xmp`,
//!   `pdfuaid` and `pdfaid` schemas from the document Info dictionary
//! - **PDF Writer**: a complete single-file writer with catalog
//!   declarations, ParentTree, RoleMap and TrueType embedding
//!
//! ## Architecture
//! - **Pluggable Design**: the tagging core only talks to the
//!   [`DocumentLayer`](document::DocumentLayer) trait; [`writer::PdfWriter`]
//!   is one implementation
//! - **Explicit Positioning**: every [`TextRun`](content::TextRun) carries
//!   its own font, origin and leading
//!
//! ## Quick Start
//!
//! ```
//! use tagged_pdf::content::TextRun;
//! use tagged_pdf::document::{FontSource, PageSize, TaggedDocument};
//! use tagged_pdf::structure::StructType;
//! use tagged_pdf::writer::{PdfWriter, PdfWriterConfig};
//! use tagged_pdf::TaggingOptions;
//!
//! # fn main() -> tagged_pdf::Result<()> {
//! let writer = PdfWriter::with_config(PdfWriterConfig::default().with_title("Report"));
//! let options = TaggingOptions::new().with_language("en-US");
//! let mut doc = TaggedDocument::new(writer, options)?;
//! let font = doc.embed_font(&FontSource::standard("Helvetica"))?;
//!
//! let root = doc.create_root()?;
//! let body = doc.add_element(root, StructType::Document)?;
//! let heading = doc.add_element(body, StructType::H1)?;
//!
//! doc.begin_page(PageSize::A4)?;
//! doc.tagged_text(heading, &TextRun::new(font, 18.0).at(72.0, 760.0).line("Report"))?;
//! doc.end_page()?;
//!
//! let result = doc.finish()?;
//! assert!(result.metadata.schema("pdfuaid").is_some());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// PDF primitives
pub mod date;
pub mod encoding;
pub mod object;

// Document properties and metadata
pub mod info;
pub mod xmp;

/// PDF/A and PDF/UA conformance identifiers
pub mod compliance;

/// PDF logical structure (Tagged PDFs)
pub mod structure;

// Page content and marked-content linking
pub mod content;

// Tagged document orchestration
pub mod document;

// PDF writing
pub mod writer;

// Configuration
pub mod config;

// Re-exports
pub use config::TaggingOptions;
pub use document::{DocumentLayer, TaggedDocument, TaggedOutput};
pub use error::{Error, Result};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        // VERSION is populated from CARGO_PKG_VERSION at compile time
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "tagged_pdf");
    }
}
