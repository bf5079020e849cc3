//! Page content: operator streams, text runs and marked-content linking.

pub mod linker;
mod sink;
pub mod stream;
mod text_run;

pub use linker::{MarkedContentLinker, SequenceHandle, StreamSummary};
pub use sink::{ContentSink, FontHandle};
pub use stream::{ContentStreamBuilder, ContentStreamOp};
pub use text_run::TextRun;
