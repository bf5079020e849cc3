//! Tagged document orchestration.
//!
//! [`TaggedDocument`] keeps the page content and the logical structure in
//! step: every marked-content sequence written to a page is bound to a
//! structure element at the moment it is opened, and nesting is checked by
//! the [`MarkedContentLinker`]. Metadata and document-level declarations are
//! produced once, by [`TaggedDocument::finish`].

use super::layer::{DocumentLayer, FontSource, PageSize};
use crate::config::TaggingOptions;
use crate::content::{
    ContentSink, FontHandle, MarkedContentLinker, SequenceHandle, StreamSummary, TextRun,
};
use crate::encoding::FontEncoding;
use crate::error::{Error, Result};
use crate::info::{adapt, MetadataFieldError};
use crate::structure::{
    AttributeKey, ContentRef, ElementId, SerializedTree, StructType, StructureTree,
};
use crate::xmp::{MetadataBlock, XmpSynthesizer};

/// Everything a finished tagged document produced.
#[derive(Debug)]
pub struct TaggedOutput<O> {
    /// Output of the document layer
    pub output: O,
    /// The structure tree as attached to the document
    pub structure: SerializedTree,
    /// The metadata packet as attached to the document
    pub metadata: MetadataBlock,
    /// Document properties that were dropped from the metadata
    pub warnings: Vec<MetadataFieldError>,
}

/// A document under construction, generic over its container layer.
///
/// Structural errors (tree misuse, unbalanced marked content) leave the
/// document in an unusable state; the caller should drop it.
///
/// # Example
///
/// ```
/// use tagged_pdf::content::TextRun;
/// use tagged_pdf::document::{FontSource, PageSize, TaggedDocument};
/// use tagged_pdf::structure::StructType;
/// use tagged_pdf::writer::{PdfWriter, PdfWriterConfig};
/// use tagged_pdf::TaggingOptions;
///
/// let writer = PdfWriter::with_config(PdfWriterConfig::default().with_title("Hello"));
/// let mut doc = TaggedDocument::new(writer, TaggingOptions::new().with_language("en-US"))?;
/// let font = doc.embed_font(&FontSource::standard("Helvetica"))?;
///
/// let root = doc.create_root()?;
/// let body = doc.add_element(root, StructType::Document)?;
/// let p = doc.add_element(body, StructType::P)?;
///
/// doc.begin_page(PageSize::A4)?;
/// doc.tagged_text(p, &TextRun::new(font, 12.0).at(72.0, 760.0).line("Hello"))?;
/// doc.end_page()?;
///
/// let result = doc.finish()?;
/// assert!(result.output.starts_with(b"%PDF-1.7"));
/// # Ok::<(), tagged_pdf::error::Error>(())
/// ```
#[derive(Debug)]
pub struct TaggedDocument<L: DocumentLayer> {
    layer: L,
    options: TaggingOptions,
    tree: StructureTree,
    linker: MarkedContentLinker,
}

impl<L: DocumentLayer> TaggedDocument<L> {
    /// Start a tagged document on top of `layer`.
    pub fn new(layer: L, options: TaggingOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            layer,
            options,
            tree: StructureTree::new(),
            linker: MarkedContentLinker::new(),
        })
    }

    /// Options the document was created with.
    pub fn options(&self) -> &TaggingOptions {
        &self.options
    }

    /// The structure tree built so far.
    pub fn tree(&self) -> &StructureTree {
        &self.tree
    }

    /// The underlying document layer.
    pub fn layer(&self) -> &L {
        &self.layer
    }

    /// Create the StructTreeRoot.
    pub fn create_root(&mut self) -> Result<ElementId> {
        self.tree.create_root()
    }

    /// Add a structure element.
    pub fn add_element(&mut self, parent: ElementId, tag: StructType) -> Result<ElementId> {
        self.tree.add_element(parent, tag)
    }

    /// Set an attribute of a structure element.
    pub fn set_attribute(
        &mut self,
        element: ElementId,
        key: AttributeKey,
        value: impl Into<String>,
    ) -> Result<()> {
        self.tree.set_attribute(element, key, value)
    }

    /// Set the natural language of an element (`/Lang`).
    pub fn set_language(&mut self, element: ElementId, lang: &str) -> Result<()> {
        self.tree
            .set_attribute(element, AttributeKey::Lang, lang.replace('_', "-"))
    }

    /// Set the text assistive technology reads instead of the content
    /// (`/ActualText`), e.g. for hyphenated words.
    pub fn set_actual_text(&mut self, element: ElementId, text: impl Into<String>) -> Result<()> {
        self.tree.set_attribute(element, AttributeKey::ActualText, text)
    }

    /// Map a custom structure type to a standard one.
    pub fn map_role(&mut self, custom: impl Into<String>, standard: StructType) -> Result<()> {
        self.tree.map_role(custom, standard)
    }

    /// Make a font available for text runs. Simple fonts use WinAnsiEncoding.
    pub fn embed_font(&mut self, source: &FontSource) -> Result<FontHandle> {
        self.layer.embed_font(source, FontEncoding::WinAnsi)
    }

    /// Start a page; its content stream becomes the target of marked content.
    pub fn begin_page(&mut self, size: PageSize) -> Result<usize> {
        if let Some(page) = self.linker.active_page() {
            return Err(Error::StreamAlreadyActive(page));
        }
        let page = self.layer.begin_page(size)?;
        self.linker.begin_stream(page)?;
        Ok(page)
    }

    /// Finish the current page. Fails if a marked-content sequence is open.
    pub fn end_page(&mut self) -> Result<StreamSummary> {
        let summary = self.linker.end_stream()?;
        self.layer.end_page(summary.page)?;
        Ok(summary)
    }

    /// Open a marked-content sequence for `element` on the current page.
    ///
    /// Writes `/Tag <</MCID n>> BDC` and records the MCID as the next kid
    /// of the element.
    pub fn open(&mut self, element: ElementId) -> Result<SequenceHandle> {
        let tag = match self.tree.element(element) {
            None => return Err(Error::UnknownElement(element)),
            Some(node) => match node.tag() {
                None => return Err(Error::RootContent),
                Some(tag) => tag.as_str().to_string(),
            },
        };
        if !self.linker.is_active() {
            return Err(Error::NoActiveStream);
        }
        let sink = self.layer.content().ok_or(Error::NoActiveStream)?;

        let handle = self.linker.open(element)?;
        self.tree.bind_content(element, handle.page(), handle.mcid())?;
        sink.begin_marked_content(&tag, handle.mcid())?;
        Ok(handle)
    }

    /// Close the innermost marked-content sequence (`EMC`).
    pub fn close(&mut self, handle: SequenceHandle) -> Result<()> {
        self.linker.close(handle)?;
        self.sink()?.end_marked_content()
    }

    /// Write a text run to the current page.
    pub fn emit(&mut self, run: &TextRun) -> Result<()> {
        run.emit(self.sink()?)
    }

    /// Write a text run as one marked-content sequence of `element`.
    pub fn tagged_text(&mut self, element: ElementId, run: &TextRun) -> Result<ContentRef> {
        let handle = self.open(element)?;
        self.emit(run)?;
        self.close(handle)?;
        Ok(ContentRef {
            page: handle.page(),
            mcid: handle.mcid(),
        })
    }

    fn sink(&mut self) -> Result<&mut L::Content> {
        if !self.linker.is_active() {
            return Err(Error::NoActiveStream);
        }
        self.layer.content().ok_or(Error::NoActiveStream)
    }

    /// Finalize structure and metadata and hand them to the layer.
    ///
    /// An open page is ended first. Dropped metadata fields are returned as
    /// warnings, not errors.
    pub fn finish(mut self) -> Result<TaggedOutput<L::Output>> {
        if self.linker.is_active() {
            self.end_page()?;
        }
        let structure = self.tree.finalize()?;

        let adapted = adapt(&self.layer.raw_document_properties());
        let mut properties = adapted.properties;
        for (lang, title) in &self.options.title_alternates {
            match &mut properties.title {
                Some(alt) => alt.insert(lang, title.as_str()),
                None => {
                    log::warn!("Title alternate for '{}' ignored: document has no title", lang)
                },
            }
        }
        if properties.title.is_none() {
            log::warn!("Document has no title; PDF/UA requires dc:title");
        }

        let metadata = XmpSynthesizer::new(self.options.xmp_options()).synthesize(&properties);

        self.layer.set_document_version(self.options.version)?;
        self.layer.declare_tagged()?;
        if let Some(lang) = &self.options.language {
            self.layer.set_primary_language(lang)?;
        }
        self.layer.attach_structure_tree(&structure)?;
        self.layer.attach_metadata_block(metadata.bytes().to_vec())?;

        log::debug!(
            "Finishing tagged document: {} structure node(s), {} metadata field(s) dropped",
            structure.nodes.len(),
            adapted.errors.len()
        );
        let output = self.layer.finish()?;

        Ok(TaggedOutput {
            output,
            structure,
            metadata,
            warnings: adapted.errors,
        })
    }
}
