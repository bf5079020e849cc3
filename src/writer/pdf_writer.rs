//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer. Implements [`DocumentLayer`], so
//! it is the container a [`TaggedDocument`](crate::document::TaggedDocument)
//! writes into.

use super::fonts::{FontProgram, RegisteredFont, TrueTypeProgram, FIRST_CHAR, LAST_CHAR};
use super::object_serializer::ObjectSerializer as O;
use super::structure_objects::structure_objects;
use crate::content::{ContentStreamBuilder, FontHandle};
use crate::date::PdfDate;
use crate::document::{DocumentLayer, FontSource, PageSize, PdfVersion};
use crate::encoding::FontEncoding;
use crate::error::{Error, Result};
use crate::info::{InfoDictionary, InfoKey};
use crate::object::{Object, ObjectRef};
use crate::structure::SerializedTree;
use std::collections::HashMap;
use std::io::Write;

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document keywords
    pub keywords: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Producer application
    pub producer: Option<String>,
    /// Creation date
    pub creation_date: Option<PdfDate>,
    /// Modification date
    pub modification_date: Option<PdfDate>,
    /// Whether to compress page content streams
    pub compress: bool,
    /// Ask viewers to show the title instead of the file name
    pub display_doc_title: bool,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: None,
            producer: Some(format!("tagged_pdf {}", env!("CARGO_PKG_VERSION"))),
            creation_date: None,
            modification_date: None,
            compress: false,
            display_doc_title: true,
        }
    }
}

impl PdfWriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set document keywords.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Set the creator application.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Set the producer, or clear it with `None`.
    pub fn with_producer(mut self, producer: Option<String>) -> Self {
        self.producer = producer;
        self
    }

    /// Set the creation date.
    pub fn with_creation_date(mut self, date: PdfDate) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Set the modification date.
    pub fn with_modification_date(mut self, date: PdfDate) -> Self {
        self.modification_date = Some(date);
        self
    }

    /// Enable or disable stream compression.
    ///
    /// When enabled, page content streams are compressed with FlateDecode.
    /// The metadata stream always stays uncompressed so that it can be
    /// found by tools scanning for XMP packets.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set the `DisplayDocTitle` viewer preference.
    pub fn with_display_doc_title(mut self, display: bool) -> Self {
        self.display_doc_title = display;
        self
    }

    /// Info dictionary entries, in the order of [`InfoKey::ALL`].
    pub fn info_dictionary(&self) -> InfoDictionary {
        let mut info = InfoDictionary::new();
        let text_fields = [
            (InfoKey::Title, &self.title),
            (InfoKey::Author, &self.author),
            (InfoKey::Subject, &self.subject),
            (InfoKey::Keywords, &self.keywords),
            (InfoKey::Creator, &self.creator),
            (InfoKey::Producer, &self.producer),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                info.insert(key.as_str().to_string(), Object::text(value));
            }
        }
        let date_fields = [
            (InfoKey::CreationDate, &self.creation_date),
            (InfoKey::ModDate, &self.modification_date),
        ];
        for (key, value) in date_fields {
            if let Some(date) = value {
                info.insert(
                    key.as_str().to_string(),
                    Object::String(date.to_pdf_string().into_bytes()),
                );
            }
        }
        info
    }
}

/// Compress data using Flate/Deflate compression.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// A finished page.
struct PageData {
    size: PageSize,
    content: Vec<u8>,
    struct_parents: usize,
}

/// The page currently being written.
struct OpenPage {
    size: PageSize,
    content: ContentStreamBuilder,
}

/// Indirect objects under construction, numbered from 1.
#[derive(Default)]
struct ObjectTable {
    objects: Vec<Option<Object>>,
}

impl ObjectTable {
    fn alloc(&mut self) -> ObjectRef {
        self.objects.push(None);
        ObjectRef::new(self.objects.len() as u32, 0)
    }

    fn set(&mut self, r: ObjectRef, obj: Object) {
        if let Some(slot) = self.objects.get_mut(r.id as usize - 1) {
            *slot = Some(obj);
        }
    }

    fn add(&mut self, obj: Object) -> ObjectRef {
        let r = self.alloc();
        self.set(r, obj);
        r
    }

    fn next_id(&self) -> u32 {
        self.objects.len() as u32 + 1
    }
}

/// PDF document writer.
///
/// Pages are written one at a time through [`DocumentLayer`]; everything
/// else is kept until [`DocumentLayer::finish`] assembles the file.
pub struct PdfWriter {
    config: PdfWriterConfig,
    version: PdfVersion,
    pages: Vec<PageData>,
    current: Option<OpenPage>,
    fonts: Vec<RegisteredFont>,
    language: Option<String>,
    tagged: bool,
    structure: Option<SerializedTree>,
    metadata: Option<Vec<u8>>,
}

impl std::fmt::Debug for PdfWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfWriter")
            .field("version", &self.version)
            .field("pages", &self.pages.len())
            .field("fonts", &self.fonts.len())
            .field("tagged", &self.tagged)
            .finish_non_exhaustive()
    }
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            version: PdfVersion::default(),
            pages: Vec::new(),
            current: None,
            fonts: Vec::new(),
            language: None,
            tagged: false,
            structure: None,
            metadata: None,
        }
    }

    /// The writer's configuration.
    pub fn config(&self) -> &PdfWriterConfig {
        &self.config
    }

    /// Number of finished pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn font_objects(&self, table: &mut ObjectTable, font: &RegisteredFont) -> Result<ObjectRef> {
        let encoding = O::name(font.encoding.pdf_name());
        let dict = match &font.program {
            FontProgram::Standard14(base_font) => O::dict(vec![
                ("Type", O::name("Font")),
                ("Subtype", O::name("Type1")),
                ("BaseFont", O::name(base_font)),
                ("Encoding", encoding),
            ]),
            FontProgram::TrueType(program) => {
                let descriptor = self.font_descriptor(table, program)?;
                O::dict(vec![
                    ("Type", O::name("Font")),
                    ("Subtype", O::name("TrueType")),
                    ("BaseFont", O::name(&program.base_font)),
                    ("FirstChar", O::integer(i64::from(FIRST_CHAR))),
                    ("LastChar", O::integer(i64::from(LAST_CHAR))),
                    (
                        "Widths",
                        Object::Array(program.widths.iter().map(|w| O::integer(*w)).collect()),
                    ),
                    ("FontDescriptor", O::reference(descriptor)),
                    ("Encoding", encoding),
                ])
            },
        };
        Ok(table.add(dict))
    }

    fn font_descriptor(
        &self,
        table: &mut ObjectTable,
        program: &TrueTypeProgram,
    ) -> Result<ObjectRef> {
        let mut file_entries = vec![("Length1", O::integer(program.data.len() as i64))];
        let data = if self.config.compress {
            file_entries.push(("Filter", O::name("FlateDecode")));
            compress_data(&program.data)?
        } else {
            program.data.clone()
        };
        let font_file = table.add(O::stream(file_entries, data));

        Ok(table.add(O::dict(vec![
            ("Type", O::name("FontDescriptor")),
            ("FontName", O::name(&program.base_font)),
            ("Flags", O::integer(program.flags)),
            ("FontBBox", Object::Array(program.bbox.iter().map(|v| O::integer(*v)).collect())),
            ("ItalicAngle", O::integer(0)),
            ("Ascent", O::integer(program.ascent)),
            ("Descent", O::integer(program.descent)),
            ("CapHeight", O::integer(program.cap_height)),
            ("StemV", O::integer(program.stem_v)),
            ("FontFile2", O::reference(font_file)),
        ])))
    }

    /// Build the complete PDF document.
    fn assemble(mut self) -> Result<Vec<u8>> {
        let mut table = ObjectTable::default();
        let catalog_id = table.alloc();
        let pages_id = table.alloc();

        let mut font_resources = HashMap::new();
        for font in &self.fonts {
            let font_ref = self.font_objects(&mut table, font)?;
            font_resources.insert(font.resource_name.clone(), Object::Reference(font_ref));
        }

        let page_ids: Vec<ObjectRef> = self.pages.iter().map(|_| table.alloc()).collect();
        for (page, &page_id) in self.pages.iter().zip(&page_ids) {
            let (content, compressed) = if self.config.compress {
                (compress_data(&page.content)?, true)
            } else {
                (page.content.clone(), false)
            };
            let mut content_entries = Vec::new();
            if compressed {
                content_entries.push(("Filter", O::name("FlateDecode")));
            }
            let content_id = table.add(O::stream(content_entries, content));

            let mut page_dict = vec![
                ("Type", O::name("Page")),
                ("Parent", O::reference(pages_id)),
                (
                    "MediaBox",
                    O::rect(0.0, 0.0, f64::from(page.size.width), f64::from(page.size.height)),
                ),
                ("Contents", O::reference(content_id)),
                (
                    "Resources",
                    O::dict(vec![("Font", Object::Dictionary(font_resources.clone()))]),
                ),
            ];
            if self.structure.is_some() {
                page_dict.push(("StructParents", O::integer(page.struct_parents as i64)));
                page_dict.push(("Tabs", O::name("S")));
            }
            table.set(page_id, O::dict(page_dict));
        }

        table.set(
            pages_id,
            O::dict(vec![
                ("Type", O::name("Pages")),
                ("Kids", Object::Array(page_ids.iter().map(|r| O::reference(*r)).collect())),
                ("Count", O::integer(self.pages.len() as i64)),
            ]),
        );

        let mut catalog = vec![("Type", O::name("Catalog")), ("Pages", O::reference(pages_id))];
        if let Some(tree) = &self.structure {
            let structure = structure_objects(tree, &page_ids, table.next_id())?;
            for (r, obj) in structure.objects {
                let allocated = table.add(obj);
                debug_assert_eq!(allocated, r);
            }
            catalog.push(("StructTreeRoot", O::reference(structure.root)));
        }
        if self.tagged {
            catalog.push(("MarkInfo", O::dict(vec![("Marked", O::boolean(true))])));
        }
        if let Some(lang) = &self.language {
            catalog.push(("Lang", O::text(lang)));
        }
        if let Some(xmp) = self.metadata.take() {
            let metadata_id = table.add(O::stream(
                vec![("Type", O::name("Metadata")), ("Subtype", O::name("XML"))],
                xmp,
            ));
            catalog.push(("Metadata", O::reference(metadata_id)));
        }
        if self.config.display_doc_title {
            catalog.push((
                "ViewerPreferences",
                O::dict(vec![("DisplayDocTitle", O::boolean(true))]),
            ));
        }
        table.set(catalog_id, O::dict(catalog));

        let info_id = table.add(Object::Dictionary(
            self.config.info_dictionary().into_iter().collect(),
        ));

        self.write_file(table, catalog_id, info_id)
    }

    fn write_file(&self, table: ObjectTable, root: ObjectRef, info: ObjectRef) -> Result<Vec<u8>> {
        let serializer = O::new();
        let mut output = Vec::new();
        let mut offsets = Vec::with_capacity(table.objects.len());

        writeln!(output, "{}", self.version.header())?;
        // Binary marker
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        for (index, obj) in table.objects.iter().enumerate() {
            let id = index as u32 + 1;
            let obj = obj
                .as_ref()
                .ok_or_else(|| Error::Writer(format!("object {} was never written", id)))?;
            offsets.push(output.len());
            serializer.write_indirect(&mut output, id, 0, obj)?;
        }

        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", offsets.len() + 1)?;
        writeln!(output, "0000000000 65535 f ")?;
        for offset in &offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let file_id = Object::String(uuid::Uuid::new_v4().as_bytes().to_vec());
        let trailer = O::dict(vec![
            ("Size", O::integer(offsets.len() as i64 + 1)),
            ("Root", O::reference(root)),
            ("Info", O::reference(info)),
            ("ID", Object::Array(vec![file_id.clone(), file_id])),
        ]);

        writeln!(output, "trailer")?;
        serializer.write_object(&mut output, &trailer)?;
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        log::debug!(
            "Wrote PDF {}: {} object(s), {} page(s), {} bytes",
            self.version,
            offsets.len(),
            self.pages.len(),
            output.len()
        );
        Ok(output)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLayer for PdfWriter {
    type Content = ContentStreamBuilder;
    type Output = Vec<u8>;

    fn raw_document_properties(&self) -> InfoDictionary {
        self.config.info_dictionary()
    }

    fn embed_font(&mut self, source: &FontSource, encoding: FontEncoding) -> Result<FontHandle> {
        if let Some(font) = self
            .fonts
            .iter()
            .find(|f| f.encoding == encoding && f.is_from(source))
        {
            return Ok(FontHandle::new(font.resource_name.clone(), encoding));
        }
        let resource_name = format!("F{}", self.fonts.len() + 1);
        let font = RegisteredFont::load(resource_name.clone(), source, encoding)?;
        log::debug!("Registered font /{}", resource_name);
        self.fonts.push(font);
        Ok(FontHandle::new(resource_name, encoding))
    }

    fn begin_page(&mut self, size: PageSize) -> Result<usize> {
        if self.current.is_some() {
            return Err(Error::StreamAlreadyActive(self.pages.len()));
        }
        self.current = Some(OpenPage {
            size,
            content: ContentStreamBuilder::new(),
        });
        Ok(self.pages.len())
    }

    fn content(&mut self) -> Option<&mut ContentStreamBuilder> {
        self.current.as_mut().map(|page| &mut page.content)
    }

    fn end_page(&mut self, struct_parents: usize) -> Result<()> {
        let mut page = self.current.take().ok_or(Error::NoActiveStream)?;
        page.content.end_text();
        self.pages.push(PageData {
            size: page.size,
            content: page.content.build()?,
            struct_parents,
        });
        Ok(())
    }

    fn attach_metadata_block(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.metadata = Some(bytes);
        Ok(())
    }

    fn declare_tagged(&mut self) -> Result<()> {
        self.tagged = true;
        Ok(())
    }

    fn attach_structure_tree(&mut self, tree: &SerializedTree) -> Result<()> {
        self.structure = Some(tree.clone());
        Ok(())
    }

    fn set_primary_language(&mut self, lang: &str) -> Result<()> {
        self.language = Some(lang.to_string());
        Ok(())
    }

    fn set_document_version(&mut self, version: PdfVersion) -> Result<()> {
        self.version = version;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        if self.current.is_some() {
            return Err(Error::Writer(format!("page {} was never ended", self.pages.len())));
        }
        self.assemble()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSink;
    use crate::structure::{StructType, StructureTree};

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_create_empty_pdf() {
        let mut writer = PdfWriter::new();
        writer.begin_page(PageSize::LETTER).unwrap();
        writer.end_page(0).unwrap();
        let content = text(&writer.finish().unwrap());

        assert!(content.starts_with("%PDF-1.7"));
        assert!(content.contains("/Type /Catalog"));
        assert!(content.contains("/Type /Pages"));
        assert!(content.contains("/MediaBox [0 0 612 792]"));
        assert!(content.contains("/DisplayDocTitle true"));
        assert!(!content.contains("/StructParents"));
        assert!(content.ends_with("%%EOF"));
    }

    #[test]
    fn test_pdf_with_text() {
        let mut writer = PdfWriter::new();
        let font = writer
            .embed_font(&FontSource::standard("Helvetica"), FontEncoding::WinAnsi)
            .unwrap();
        assert_eq!(font.resource_name(), "F1");

        writer.begin_page(PageSize::A4).unwrap();
        let sink = writer.content().unwrap();
        sink.begin_text_run().unwrap();
        ContentSink::set_font(sink, &font, 12.0).unwrap();
        sink.move_to(72.0, 720.0).unwrap();
        sink.show_text("Hello, World!").unwrap();
        writer.end_page(0).unwrap();

        let content = text(&writer.finish().unwrap());
        assert!(content.contains("/BaseFont /Helvetica"));
        assert!(content.contains("/Encoding /WinAnsiEncoding"));
        assert!(content.contains("/Font <</F1 3 0 R>>"));
        assert!(content.contains("BT\n/F1 12 Tf\n72 720 Td\n(Hello, World!) Tj\nET\n"));
    }

    #[test]
    fn test_font_registered_once() {
        let mut writer = PdfWriter::new();
        let a = writer
            .embed_font(&FontSource::standard("Courier"), FontEncoding::WinAnsi)
            .unwrap();
        let b = writer
            .embed_font(&FontSource::standard("Courier"), FontEncoding::WinAnsi)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_info_dictionary() {
        let config = PdfWriterConfig::default()
            .with_title("Test Document")
            .with_author("Zoë")
            .with_producer(None)
            .with_creation_date(PdfDate::parse("D:20240115103000Z").unwrap());
        let info = config.info_dictionary();
        let keys: Vec<&str> = info.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Title", "Author", "CreationDate"]);

        let content = text(&PdfWriter::with_config(config).finish().unwrap());
        assert!(content.contains("/Title (Test Document)"));
        assert!(content.contains("/Author <5A6FEB>"));
        assert!(content.contains("/CreationDate (D:20240115103000Z)"));
    }

    #[test]
    fn test_catalog_declarations() {
        let mut writer = PdfWriter::new();
        writer.begin_page(PageSize::A4).unwrap();
        writer.end_page(0).unwrap();

        let mut tree = StructureTree::new();
        let root = tree.create_root().unwrap();
        let p = tree.add_element(root, StructType::P).unwrap();
        tree.bind_content(p, 0, 0).unwrap();

        writer.set_document_version(PdfVersion::V1_7).unwrap();
        writer.declare_tagged().unwrap();
        writer.set_primary_language("en-US").unwrap();
        writer.attach_structure_tree(&tree.finalize().unwrap()).unwrap();
        writer.attach_metadata_block(b"<x:xmpmeta/>".to_vec()).unwrap();

        let content = text(&writer.finish().unwrap());
        assert!(content.contains("/MarkInfo <</Marked true>>"));
        assert!(content.contains("/Lang (en-US)"));
        assert!(content.contains("/StructParents 0"));
        assert!(content.contains("/Tabs /S"));
        assert!(content.contains("/Type /StructTreeRoot"));
        assert!(content.contains("/Subtype /XML/Type /Metadata"));
        assert!(content.contains("<x:xmpmeta/>"));
    }

    #[test]
    fn test_compressed_content() {
        let config = PdfWriterConfig::default().with_compress(true);
        let mut writer = PdfWriter::with_config(config);
        writer.begin_page(PageSize::A4).unwrap();
        writer.content().unwrap().begin_marked_content("P", 0).unwrap();
        writer.content().unwrap().end_marked_content().unwrap();
        writer.end_page(0).unwrap();

        let bytes = writer.finish().unwrap();
        let content = text(&bytes);
        assert!(content.contains("/Filter /FlateDecode"));
        assert!(!content.contains("BDC"));
    }

    #[test]
    fn test_page_lifecycle_errors() {
        let mut writer = PdfWriter::new();
        assert!(matches!(writer.end_page(0), Err(Error::NoActiveStream)));
        writer.begin_page(PageSize::A4).unwrap();
        assert!(matches!(writer.begin_page(PageSize::A4), Err(Error::StreamAlreadyActive(0))));
        assert!(matches!(writer.finish(), Err(Error::Writer(_))));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut writer = PdfWriter::new();
        writer.begin_page(PageSize::A4).unwrap();
        writer.end_page(0).unwrap();
        let bytes = writer.finish().unwrap();

        let xref = bytes.windows(5).rposition(|w| w == b"xref\n").unwrap();
        let tail = std::str::from_utf8(&bytes[xref..]).unwrap();
        let entries: Vec<&str> = tail.lines().skip(3).take_while(|l| l.len() == 19).collect();
        assert_eq!(entries.len(), 5);
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let header = format!("{} 0 obj", i + 1);
            assert!(bytes[offset..].starts_with(header.as_bytes()));
        }
    }
}
