//! Error types for tagged PDF generation.
//!
//! Structural errors (tree and marked-content misuse) are fatal for the
//! document being built: the caller is expected to discard it. Metadata field
//! errors are local and only ever reported, never returned from `finish`.

use crate::info::MetadataFieldError;
use crate::structure::ElementId;

/// Result type alias for tagged PDF operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while generating a tagged document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A document property could not be converted (non-fatal, field dropped)
    #[error(transparent)]
    MetadataField(#[from] MetadataFieldError),

    /// `create_root` was called on a tree that already has a root
    #[error("Structure tree already has a root element")]
    DuplicateRoot,

    /// Parent element does not belong to this structure tree
    #[error("Unknown parent element: {0}")]
    UnknownParent(ElementId),

    /// Element does not belong to this structure tree
    #[error("Unknown structure element: {0}")]
    UnknownElement(ElementId),

    /// The tree was finalized without ever creating a root
    #[error("Structure tree has no root element")]
    MissingRoot,

    /// The tree has been finalized and can no longer change
    #[error("Structure tree has already been finalized")]
    TreeFinalized,

    /// Content and attributes belong to structure elements, not the root
    #[error("The structure tree root cannot carry marked content or attributes")]
    RootContent,

    /// A marked-content operation was issued outside of a content stream
    #[error("No content stream is currently being written")]
    NoActiveStream,

    /// A content stream was started while another one is still open
    #[error("Content stream for page {0} is still being written")]
    StreamAlreadyActive(usize),

    /// `close` was called with a handle that is not the innermost open sequence
    #[error("Marked-content sequence {mcid} is not the innermost open sequence (top: {top:?})")]
    NotTopOfStack {
        /// MCID of the handle passed to `close`
        mcid: u32,
        /// MCID currently on top of the stack, if any
        top: Option<u32>,
    },

    /// A content stream ended while marked-content sequences were still open
    #[error("Content stream for page {page} ended with {open} open marked-content sequence(s)")]
    UnbalancedSequence {
        /// Page whose content stream was being finalized
        page: usize,
        /// Number of sequences left open
        open: usize,
    },

    /// Font error
    #[error("Font error: {0}")]
    Font(String),

    /// The PDF writer was driven out of order or given inconsistent data
    #[error("PDF writer error: {0}")]
    Writer(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// XMP packet could not be read
    #[error("XMP error: {0}")]
    Xmp(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error invalidates the document being generated.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Error::MetadataField(_) | Error::Io(_))
    }
}
