//! PDF/A and PDF/UA conformance identifiers.
//!
//! Only the identifiers a producer declares in its XMP packet live here;
//! validation is out of scope.

mod types;

pub use types::{PdfALevel, UaPart};
