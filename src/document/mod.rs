//! Tagged document generation on top of a document layer.

mod layer;
mod tagged;

pub use layer::{DocumentLayer, FontSource, PageSize, PdfVersion};
pub use tagged::{TaggedDocument, TaggedOutput};
