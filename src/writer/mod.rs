//! PDF writing: the concrete document layer.
//!
//! ## Architecture
//!
//! ```text
//! TaggedDocument
//!     ↓ (DocumentLayer)
//! [PdfWriter] (pages, fonts, catalog declarations)
//!     ↓
//! [structure_objects] (SerializedTree → StructTreeRoot, StructElem, ParentTree)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```

mod fonts;
mod object_serializer;
mod pdf_writer;
mod structure_objects;

pub use fonts::STANDARD_14;
pub use object_serializer::ObjectSerializer;
pub(crate) use object_serializer::write_name;
pub use pdf_writer::{PdfWriter, PdfWriterConfig};
