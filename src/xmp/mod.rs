//! XMP metadata synthesis.
//!
//! XMP (Extensible Metadata Platform) is the XML metadata format PDF/UA
//! requires in the document catalog's `/Metadata` stream. See
//! ISO 32000-1:2008, Section 14.3.2.
//!
//! ## Schemas
//!
//! - Dublin Core (`dc`): title, creator, description, subject
//! - Adobe PDF (`pdf`): keywords, producer
//! - XMP basic (`xmp`): creator tool, creation and modification dates
//! - PDF/UA identification (`pdfuaid`): the accessibility claim
//! - PDF/A identification (`pdfaid`): archival conformance, when requested
//!
//! ## Example
//!
//! ```
//! use tagged_pdf::info::DocumentProperties;
//! use tagged_pdf::xmp::{XmpOptions, XmpSynthesizer};
//!
//! let props = DocumentProperties::new()
//!     .with_title("Report")
//!     .with_author("A. Smith");
//! let block = XmpSynthesizer::new(XmpOptions::default()).synthesize(&props);
//! assert!(block.schema("pdfuaid").is_some());
//! ```

mod reader;
mod schema;
mod synthesizer;
mod writer;

pub use reader::XmpReader;
pub use schema::{
    LangAlt, MetadataSchema, XmpValue, NS_DC, NS_PDF, NS_PDFAID, NS_PDFUAID, NS_RDF, NS_X,
    NS_XMP, X_DEFAULT,
};
pub use synthesizer::{MetadataBlock, XmpOptions, XmpSynthesizer};
pub use writer::{XmpEncoding, XmpPacketOptions, XmpWriter, PACKET_ID};
