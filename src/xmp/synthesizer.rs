//! Maps [`DocumentProperties`] onto XMP schemas.
//!
//! Schema blocks are emitted in a fixed order (`dc`, `pdf`, `xmp`,
//! `pdfuaid`, `pdfaid`) and empty ones are dropped, so identical input
//! always produces identical bytes.

use super::schema::{
    LangAlt, MetadataSchema, XmpValue, NS_DC, NS_PDF, NS_PDFAID, NS_PDFUAID, NS_XMP,
};
use super::writer::{XmpEncoding, XmpPacketOptions, XmpWriter};
use crate::compliance::{PdfALevel, UaPart};
use crate::date::w3c;
use crate::info::DocumentProperties;
use serde::{Deserialize, Serialize};

/// Options controlling metadata synthesis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmpOptions {
    /// PDF/UA part declared by `pdfuaid:part`
    pub ua_part: UaPart,
    /// PDF/A level declared by the `pdfaid` schema, if any
    pub pdfa: Option<PdfALevel>,
    /// Packet encoding and padding
    pub packet: XmpPacketOptions,
}

impl XmpOptions {
    /// Set the PDF/UA part.
    pub fn with_ua_part(mut self, part: UaPart) -> Self {
        self.ua_part = part;
        self
    }

    /// Declare PDF/A conformance.
    pub fn with_pdfa(mut self, level: PdfALevel) -> Self {
        self.pdfa = Some(level);
        self
    }

    /// Set the packet encoding.
    pub fn with_encoding(mut self, encoding: XmpEncoding) -> Self {
        self.packet.encoding = encoding;
        self
    }

    /// Set the number of padding lines.
    pub fn with_padding_lines(mut self, lines: usize) -> Self {
        self.packet.padding_lines = lines;
        self
    }
}

/// A serialized metadata packet together with the schemas it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlock {
    schemas: Vec<MetadataSchema>,
    encoding: XmpEncoding,
    bytes: Vec<u8>,
}

impl MetadataBlock {
    /// Encoded packet bytes, ready for a `/Metadata` stream.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the block, keeping only the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Encoding of [`bytes`](Self::bytes).
    pub fn encoding(&self) -> XmpEncoding {
        self.encoding
    }

    /// Non-empty schemas in output order.
    pub fn schemas(&self) -> &[MetadataSchema] {
        &self.schemas
    }

    /// Look up a schema by prefix.
    pub fn schema(&self, prefix: &str) -> Option<&MetadataSchema> {
        self.schemas.iter().find(|s| s.prefix == prefix)
    }
}

/// Builds the XMP packet for a document.
#[derive(Debug, Clone, Default)]
pub struct XmpSynthesizer {
    options: XmpOptions,
}

impl XmpSynthesizer {
    /// Create a synthesizer.
    pub fn new(options: XmpOptions) -> Self {
        Self { options }
    }

    /// Schemas for the given properties, empty ones removed.
    pub fn schemas(&self, props: &DocumentProperties) -> Vec<MetadataSchema> {
        let mut schemas = vec![
            dublin_core(props),
            adobe_pdf(props),
            xmp_basic(props),
            MetadataSchema::new(NS_PDFUAID, "pdfuaid")
                .with("part", XmpValue::Text(self.options.ua_part.xmp_part().to_string())),
        ];

        if let Some(level) = self.options.pdfa {
            schemas.push(
                MetadataSchema::new(NS_PDFAID, "pdfaid")
                    .with("part", XmpValue::Text(level.xmp_part().to_string()))
                    .with("conformance", XmpValue::Text(level.xmp_conformance().to_string())),
            );
        }

        schemas.retain(|s| !s.is_empty());
        schemas
    }

    /// Synthesize and serialize the metadata block.
    pub fn synthesize(&self, props: &DocumentProperties) -> MetadataBlock {
        let schemas = self.schemas(props);
        let bytes = XmpWriter::new(self.options.packet).to_bytes(&schemas);
        log::debug!(
            "Synthesized XMP packet: {} schema(s), {} bytes ({:?})",
            schemas.len(),
            bytes.len(),
            self.options.packet.encoding
        );
        MetadataBlock {
            schemas,
            encoding: self.options.packet.encoding,
            bytes,
        }
    }
}

fn dublin_core(props: &DocumentProperties) -> MetadataSchema {
    let mut dc = MetadataSchema::new(NS_DC, "dc");
    if let Some(title) = &props.title {
        dc.set("title", XmpValue::LangAlt(title.clone()));
    }
    if !props.authors.is_empty() {
        dc.set("creator", XmpValue::Seq(props.authors.clone()));
    }
    if let Some(subject) = &props.subject {
        dc.set("description", XmpValue::LangAlt(LangAlt::new(subject.clone())));
        dc.set("subject", XmpValue::Bag(vec![subject.clone()]));
    }
    dc
}

fn adobe_pdf(props: &DocumentProperties) -> MetadataSchema {
    let mut pdf = MetadataSchema::new(NS_PDF, "pdf");
    if let Some(keywords) = &props.keywords {
        pdf.set("Keywords", XmpValue::Text(keywords.clone()));
    }
    if let Some(producer) = &props.producer {
        pdf.set("Producer", XmpValue::Text(producer.clone()));
    }
    pdf
}

fn xmp_basic(props: &DocumentProperties) -> MetadataSchema {
    let mut xmp = MetadataSchema::new(NS_XMP, "xmp");
    if let Some(tool) = &props.creator {
        xmp.set("CreatorTool", XmpValue::Text(tool.clone()));
    }
    if let Some(date) = &props.creation_date {
        xmp.set("CreateDate", XmpValue::Text(w3c(date)));
    }
    if let Some(date) = &props.modification_date {
        xmp.set("ModifyDate", XmpValue::Text(w3c(date)));
    }
    xmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::PdfDate;

    fn prefixes(block: &MetadataBlock) -> Vec<&str> {
        block.schemas().iter().map(|s| s.prefix.as_str()).collect()
    }

    #[test]
    fn test_title_and_author_only() {
        let props = DocumentProperties::new()
            .with_title("Report")
            .with_author("A. Smith");
        let block = XmpSynthesizer::default().synthesize(&props);

        assert_eq!(prefixes(&block), vec!["dc", "pdfuaid"]);
        let dc = block.schema("dc").unwrap();
        let title = dc.get("title").and_then(|v| v.as_lang_alt()).unwrap();
        assert_eq!(title.default_value(), "Report");
        assert_eq!(title.len(), 1);
        assert_eq!(
            dc.get("creator").and_then(|v| v.items()),
            Some(&["A. Smith".to_string()][..])
        );
    }

    #[test]
    fn test_full_properties_order() {
        let date = PdfDate::parse("D:20240115103000+01'00'").unwrap().datetime();
        let props = DocumentProperties::new()
            .with_title("T")
            .with_subject("S")
            .with_keywords("k1, k2")
            .with_creator("Writer")
            .with_producer("tagged_pdf")
            .with_creation_date(date)
            .with_modification_date(date);
        let options = XmpOptions::default().with_pdfa(PdfALevel::A2b);
        let block = XmpSynthesizer::new(options).synthesize(&props);

        assert_eq!(prefixes(&block), vec!["dc", "pdf", "xmp", "pdfuaid", "pdfaid"]);

        let dc = block.schema("dc").unwrap();
        let names: Vec<_> = dc.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["title", "description", "subject"]);

        let xmp = block.schema("xmp").unwrap();
        assert_eq!(
            xmp.get("CreateDate").and_then(|v| v.as_text()),
            Some("2024-01-15T10:30:00+01:00")
        );

        let pdfaid = block.schema("pdfaid").unwrap();
        assert_eq!(pdfaid.get("part").and_then(|v| v.as_text()), Some("2"));
        assert_eq!(pdfaid.get("conformance").and_then(|v| v.as_text()), Some("B"));
    }

    #[test]
    fn test_empty_properties_still_declare_ua() {
        let block = XmpSynthesizer::default().synthesize(&DocumentProperties::new());
        assert_eq!(prefixes(&block), vec!["pdfuaid"]);
        let xml = String::from_utf8(block.bytes().to_vec()).unwrap();
        assert!(xml.contains("<pdfuaid:part>1</pdfuaid:part>"));
    }

    #[test]
    fn test_ua2() {
        let options = XmpOptions::default().with_ua_part(UaPart::Ua2);
        let block = XmpSynthesizer::new(options).synthesize(&DocumentProperties::new());
        let part = block.schema("pdfuaid").and_then(|s| s.get("part"));
        assert_eq!(part.and_then(|v| v.as_text()), Some("2"));
    }

    #[test]
    fn test_deterministic() {
        let props = DocumentProperties::new()
            .with_title("Title")
            .with_title_alternate("de", "Titel")
            .with_author("Zoë");
        let synth = XmpSynthesizer::new(XmpOptions::default().with_encoding(XmpEncoding::Utf16Le));
        assert_eq!(synth.synthesize(&props), synth.synthesize(&props));
    }

    #[test]
    fn test_encoding_is_applied() {
        let props = DocumentProperties::new().with_author("李");
        let synth = XmpSynthesizer::new(XmpOptions::default().with_encoding(XmpEncoding::Utf16Be));
        let block = synth.synthesize(&props);

        assert_eq!(block.encoding(), XmpEncoding::Utf16Be);
        assert_eq!(&block.bytes()[..2], &[0x00, b'<']);
        let xml = XmpEncoding::Utf16Be.decode(block.bytes()).unwrap();
        assert!(xml.contains("<rdf:li>李</rdf:li>"));
    }
}
