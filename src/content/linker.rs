//! Marked-content linking.
//!
//! Tracks the marked-content sequences open in the content stream being
//! written (ISO 32000-1:2008, Section 14.6). Sequences nest strictly: only
//! the innermost one may be closed, and a stream cannot end while any is
//! open. MCIDs are allocated per stream, starting at 0.

use crate::error::{Error, Result};
use crate::structure::ElementId;

/// An open marked-content sequence.
///
/// Handles are plain values; closing consumes the stack entry, not the handle,
/// so a second `close` with the same handle is detected as out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceHandle {
    page: usize,
    mcid: u32,
    element: ElementId,
}

impl SequenceHandle {
    /// Page whose content stream holds the sequence.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Marked-content id.
    pub fn mcid(&self) -> u32 {
        self.mcid
    }

    /// Structure element the sequence belongs to.
    pub fn element(&self) -> ElementId {
        self.element
    }
}

/// Result of a completed content stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    /// Page index
    pub page: usize,
    /// Owning element of each MCID, indexed by MCID
    pub elements: Vec<ElementId>,
}

impl StreamSummary {
    /// Number of MCIDs used in the stream.
    pub fn mcid_count(&self) -> usize {
        self.elements.len()
    }

    /// Element that owns an MCID.
    pub fn element_for(&self, mcid: u32) -> Option<ElementId> {
        self.elements.get(mcid as usize).copied()
    }
}

#[derive(Debug)]
struct ActiveStream {
    page: usize,
    stack: Vec<SequenceHandle>,
    elements: Vec<ElementId>,
}

/// Stack machine validating marked-content nesting.
#[derive(Debug, Default)]
pub struct MarkedContentLinker {
    active: Option<ActiveStream>,
}

impl MarkedContentLinker {
    /// Create a linker with no active stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking the content stream of a page.
    pub fn begin_stream(&mut self, page: usize) -> Result<()> {
        if let Some(active) = &self.active {
            return Err(Error::StreamAlreadyActive(active.page));
        }
        log::debug!("Begin content stream for page {}", page);
        self.active = Some(ActiveStream {
            page,
            stack: Vec::new(),
            elements: Vec::new(),
        });
        Ok(())
    }

    /// Open a sequence bound to `element`, allocating the next MCID.
    pub fn open(&mut self, element: ElementId) -> Result<SequenceHandle> {
        let active = self.active.as_mut().ok_or(Error::NoActiveStream)?;
        let handle = SequenceHandle {
            page: active.page,
            mcid: active.elements.len() as u32,
            element,
        };
        active.elements.push(element);
        active.stack.push(handle);
        log::trace!(
            "Open MCID {} on page {} (depth {})",
            handle.mcid,
            handle.page,
            active.stack.len()
        );
        Ok(handle)
    }

    /// Close a sequence. Only the innermost open sequence may be closed;
    /// on error nothing changes.
    pub fn close(&mut self, handle: SequenceHandle) -> Result<()> {
        let active = self.active.as_mut().ok_or(Error::NoActiveStream)?;
        match active.stack.last() {
            Some(top) if *top == handle => {
                active.stack.pop();
                log::trace!("Close MCID {} on page {}", handle.mcid, handle.page);
                Ok(())
            },
            top => Err(Error::NotTopOfStack {
                mcid: handle.mcid,
                top: top.map(|h| h.mcid),
            }),
        }
    }

    /// Finish the active stream. Fails, leaving the stream active, if any
    /// sequence is still open.
    pub fn end_stream(&mut self) -> Result<StreamSummary> {
        let active = self.active.as_ref().ok_or(Error::NoActiveStream)?;
        if !active.stack.is_empty() {
            return Err(Error::UnbalancedSequence {
                page: active.page,
                open: active.stack.len(),
            });
        }
        let active = self.active.take().ok_or(Error::NoActiveStream)?;
        log::debug!(
            "End content stream for page {} ({} MCID(s))",
            active.page,
            active.elements.len()
        );
        Ok(StreamSummary {
            page: active.page,
            elements: active.elements,
        })
    }

    /// Whether a stream is being written.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Page of the active stream.
    pub fn active_page(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.page)
    }

    /// Open sequences, outermost first.
    pub fn open_sequences(&self) -> &[SequenceHandle] {
        self.active.as_ref().map(|a| a.stack.as_slice()).unwrap_or(&[])
    }

    /// Number of open sequences.
    pub fn depth(&self) -> usize {
        self.open_sequences().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{StructType, StructureTree};

    fn elements(n: usize) -> Vec<ElementId> {
        let mut tree = StructureTree::new();
        let root = tree.create_root().unwrap();
        (0..n).map(|_| tree.add_element(root, StructType::P).unwrap()).collect()
    }

    #[test]
    fn test_open_without_stream() {
        let ids = elements(1);
        let mut linker = MarkedContentLinker::new();
        assert!(matches!(linker.open(ids[0]), Err(Error::NoActiveStream)));
        assert!(matches!(linker.end_stream(), Err(Error::NoActiveStream)));
    }

    #[test]
    fn test_mcids_increase_per_stream() {
        let ids = elements(2);
        let mut linker = MarkedContentLinker::new();
        linker.begin_stream(0).unwrap();
        let a = linker.open(ids[0]).unwrap();
        linker.close(a).unwrap();
        let b = linker.open(ids[1]).unwrap();
        linker.close(b).unwrap();
        assert_eq!((a.mcid(), b.mcid()), (0, 1));

        let summary = linker.end_stream().unwrap();
        assert_eq!(summary.mcid_count(), 2);
        assert_eq!(summary.element_for(1), Some(ids[1]));

        linker.begin_stream(1).unwrap();
        let c = linker.open(ids[0]).unwrap();
        assert_eq!((c.page(), c.mcid()), (1, 0));
    }

    #[test]
    fn test_double_close_fails() {
        let ids = elements(1);
        let mut linker = MarkedContentLinker::new();
        linker.begin_stream(0).unwrap();
        let h = linker.open(ids[0]).unwrap();
        linker.close(h).unwrap();
        match linker.close(h) {
            Err(Error::NotTopOfStack { mcid, top }) => {
                assert_eq!(mcid, 0);
                assert_eq!(top, None);
            },
            other => panic!("expected NotTopOfStack, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_close_order() {
        let ids = elements(2);
        let mut linker = MarkedContentLinker::new();
        linker.begin_stream(0).unwrap();
        let outer = linker.open(ids[0]).unwrap();
        let inner = linker.open(ids[1]).unwrap();

        assert!(matches!(
            linker.close(outer),
            Err(Error::NotTopOfStack { mcid: 0, top: Some(1) })
        ));
        assert_eq!(linker.open_sequences(), &[outer, inner]);

        linker.close(inner).unwrap();
        linker.close(outer).unwrap();
        assert_eq!(linker.depth(), 0);
    }

    #[test]
    fn test_end_stream_with_open_sequence() {
        let ids = elements(1);
        let mut linker = MarkedContentLinker::new();
        linker.begin_stream(3).unwrap();
        let h = linker.open(ids[0]).unwrap();

        assert!(matches!(
            linker.end_stream(),
            Err(Error::UnbalancedSequence { page: 3, open: 1 })
        ));
        assert!(linker.is_active());
        linker.close(h).unwrap();
        assert!(linker.end_stream().is_ok());
        assert!(!linker.is_active());
    }

    #[test]
    fn test_second_stream_while_active() {
        let mut linker = MarkedContentLinker::new();
        linker.begin_stream(0).unwrap();
        assert!(matches!(linker.begin_stream(1), Err(Error::StreamAlreadyActive(0))));
        assert_eq!(linker.active_page(), Some(0));
    }

    #[test]
    fn test_handle_from_previous_stream_rejected() {
        let ids = elements(1);
        let mut linker = MarkedContentLinker::new();
        linker.begin_stream(0).unwrap();
        let old = linker.open(ids[0]).unwrap();
        linker.close(old).unwrap();
        linker.end_stream().unwrap();

        linker.begin_stream(1).unwrap();
        let current = linker.open(ids[0]).unwrap();
        assert_eq!(old.mcid(), current.mcid());
        assert!(linker.close(old).is_err());
        linker.close(current).unwrap();
    }
}
