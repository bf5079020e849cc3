//! XMP packet serialization.
//!
//! Generates XMP (Extensible Metadata Platform) packets from a list of
//! [`MetadataSchema`] blocks. See ISO 32000-1:2008, Section 14.3.2 and
//! ISO 16684-1 for the packet wrapper.

use super::schema::{MetadataSchema, XmpValue, NS_RDF, NS_X};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Packet id every XMP packet carries.
pub const PACKET_ID: &str = "W5M0MpCehiHzreSzNTczkc9d";

const PADDING_LINE: &str = "                                                  ";

/// Character encoding of a serialized packet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XmpEncoding {
    /// UTF-8
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    /// UTF-16, big endian
    #[serde(rename = "utf-16be")]
    Utf16Be,
    /// UTF-16, little endian
    #[serde(rename = "utf-16le")]
    Utf16Le,
}

impl XmpEncoding {
    /// Encode packet text.
    pub fn encode(&self, xml: &str) -> Vec<u8> {
        match self {
            XmpEncoding::Utf8 => xml.as_bytes().to_vec(),
            XmpEncoding::Utf16Be => xml.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            XmpEncoding::Utf16Le => xml.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        }
    }

    /// Decode packet bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            XmpEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| Error::Xmp(format!("invalid UTF-8 in packet: {}", e))),
            XmpEncoding::Utf16Be | XmpEncoding::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(Error::Xmp("odd byte count in UTF-16 packet".to_string()));
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|c| match self {
                        XmpEncoding::Utf16Le => u16::from_le_bytes([c[0], c[1]]),
                        _ => u16::from_be_bytes([c[0], c[1]]),
                    })
                    .collect();
                String::from_utf16(&units)
                    .map_err(|e| Error::Xmp(format!("invalid UTF-16 in packet: {}", e)))
            },
        }
    }

    /// Guess the encoding from the first bytes of a packet.
    ///
    /// A packet always starts with `<`, so the position of the zero byte
    /// tells UTF-16 byte orders apart.
    pub fn detect(bytes: &[u8]) -> Self {
        match bytes {
            [0x00, b'<', ..] | [0xFE, 0xFF, ..] => XmpEncoding::Utf16Be,
            [b'<', 0x00, ..] | [0xFF, 0xFE, ..] => XmpEncoding::Utf16Le,
            _ => XmpEncoding::Utf8,
        }
    }
}

/// Packet-level serialization options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmpPacketOptions {
    /// Output encoding
    pub encoding: XmpEncoding,
    /// Lines of whitespace padding before the trailer, for in-place edits
    pub padding_lines: usize,
}

impl Default for XmpPacketOptions {
    fn default() -> Self {
        Self {
            encoding: XmpEncoding::Utf8,
            // 2KB of padding is standard
            padding_lines: 40,
        }
    }
}

impl XmpPacketOptions {
    /// Set the output encoding.
    pub fn with_encoding(mut self, encoding: XmpEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the number of padding lines.
    pub fn with_padding_lines(mut self, lines: usize) -> Self {
        self.padding_lines = lines;
        self
    }
}

/// XMP packet writer.
pub struct XmpWriter {
    options: XmpPacketOptions,
}

impl XmpWriter {
    /// Create a new XMP writer.
    pub fn new(options: XmpPacketOptions) -> Self {
        Self { options }
    }

    /// Serialize schemas into packet text. Empty schemas are skipped.
    pub fn to_xml(&self, schemas: &[MetadataSchema]) -> String {
        let mut xml = String::new();

        xml.push_str(&format!("<?xpacket begin=\"\u{FEFF}\" id=\"{}\"?>\n", PACKET_ID));
        xml.push_str(&format!("<x:xmpmeta xmlns:x=\"{}\">\n", NS_X));
        xml.push_str(&format!("  <rdf:RDF xmlns:rdf=\"{}\">\n", NS_RDF));

        for schema in schemas.iter().filter(|s| !s.is_empty()) {
            write_schema(&mut xml, schema);
        }

        xml.push_str("  </rdf:RDF>\n");
        xml.push_str("</x:xmpmeta>\n");

        for _ in 0..self.options.padding_lines {
            xml.push_str(PADDING_LINE);
            xml.push('\n');
        }

        xml.push_str("<?xpacket end=\"w\"?>");
        xml
    }

    /// Serialize schemas into encoded packet bytes.
    pub fn to_bytes(&self, schemas: &[MetadataSchema]) -> Vec<u8> {
        self.options.encoding.encode(&self.to_xml(schemas))
    }
}

impl Default for XmpWriter {
    fn default() -> Self {
        Self::new(XmpPacketOptions::default())
    }
}

fn write_schema(xml: &mut String, schema: &MetadataSchema) {
    xml.push_str(&format!(
        "    <rdf:Description rdf:about=\"\" xmlns:{}=\"{}\">\n",
        schema.prefix,
        escape_xml(&schema.namespace)
    ));

    for (name, value) in &schema.properties {
        let tag = format!("{}:{}", schema.prefix, name);
        match value {
            XmpValue::Text(text) => {
                xml.push_str(&format!("      <{}>{}</{}>\n", tag, escape_xml(text), tag));
            },
            XmpValue::LangAlt(alt) => {
                xml.push_str(&format!("      <{}>\n        <rdf:Alt>\n", tag));
                for (lang, text) in alt.iter() {
                    xml.push_str(&format!(
                        "          <rdf:li xml:lang=\"{}\">{}</rdf:li>\n",
                        escape_xml(lang),
                        escape_xml(text)
                    ));
                }
                xml.push_str(&format!("        </rdf:Alt>\n      </{}>\n", tag));
            },
            XmpValue::Seq(items) => write_array(xml, &tag, "rdf:Seq", items),
            XmpValue::Bag(items) => write_array(xml, &tag, "rdf:Bag", items),
        }
    }

    xml.push_str("    </rdf:Description>\n");
}

fn write_array(xml: &mut String, tag: &str, container: &str, items: &[String]) {
    xml.push_str(&format!("      <{}>\n        <{}>\n", tag, container));
    for item in items {
        xml.push_str(&format!("          <rdf:li>{}</rdf:li>\n", escape_xml(item)));
    }
    xml.push_str(&format!("        </{}>\n      </{}>\n", container, tag));
}

/// Escape special XML characters. Characters XML 1.0 does not allow
/// (C0 controls other than tab, LF and CR) become U+FFFD.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => {
                log::warn!("Character U+{:04X} is not allowed in XMP, replaced", ch as u32);
                out.push('\u{FFFD}');
            },
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmp::schema::{LangAlt, NS_DC, NS_PDF};

    fn dc_schema() -> MetadataSchema {
        let mut title = LangAlt::new("Test Document");
        title.insert("de", "Testdokument");
        MetadataSchema::new(NS_DC, "dc")
            .with("title", XmpValue::LangAlt(title))
            .with("creator", XmpValue::Seq(vec!["Author 1".into(), "Author 2".into()]))
            .with("subject", XmpValue::Bag(vec!["PDF".into()]))
    }

    #[test]
    fn test_packet_wrapper() {
        let xml = XmpWriter::default().to_xml(&[dc_schema()]);

        assert!(xml.starts_with("<?xpacket begin=\"\u{FEFF}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>"));
        assert!(xml.contains("<x:xmpmeta xmlns:x=\"adobe:ns:meta/\">"));
        assert!(xml.contains("<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">"));
        assert!(xml.ends_with("<?xpacket end=\"w\"?>"));
    }

    #[test]
    fn test_containers() {
        let xml = XmpWriter::default().to_xml(&[dc_schema()]);

        assert!(xml.contains("<rdf:li xml:lang=\"x-default\">Test Document</rdf:li>"));
        assert!(xml.contains("<rdf:li xml:lang=\"de\">Testdokument</rdf:li>"));
        assert!(xml.find("x-default").unwrap() < xml.find("xml:lang=\"de\"").unwrap());
        assert!(xml.contains("<rdf:Seq>"));
        assert!(xml.contains("<rdf:Bag>"));
        assert!(xml.contains("<rdf:li>Author 2</rdf:li>"));
    }

    #[test]
    fn test_one_description_per_schema_and_empty_skipped() {
        let pdf = MetadataSchema::new(NS_PDF, "pdf")
            .with("Producer", XmpValue::Text("tagged_pdf".into()));
        let empty = MetadataSchema::new("http://ns.adobe.com/xap/1.0/", "xmp");
        let xml = XmpWriter::default().to_xml(&[dc_schema(), empty, pdf]);

        assert_eq!(xml.matches("<rdf:Description").count(), 2);
        assert!(!xml.contains("xmlns:xmp="));
        assert!(xml.find("xmlns:dc=").unwrap() < xml.find("xmlns:pdf=").unwrap());
    }

    #[test]
    fn test_xml_escape() {
        let schema = MetadataSchema::new(NS_PDF, "pdf")
            .with("Keywords", XmpValue::Text("Test & Document <special>".into()));
        let xml = XmpWriter::default().to_xml(&[schema]);
        assert!(xml.contains("Test &amp; Document &lt;special&gt;"));
    }

    #[test]
    fn test_control_characters_replaced() {
        let schema = MetadataSchema::new(NS_PDF, "pdf")
            .with("Keywords", XmpValue::Text("a\u{1}b\u{1F}c\td".into()));
        let xml = XmpWriter::default().to_xml(&[schema]);

        assert!(xml.contains("<pdf:Keywords>a\u{FFFD}b\u{FFFD}c\td</pdf:Keywords>"));
        assert!(!xml.contains('\u{1}'));
        assert!(!xml.contains('\u{1F}'));
    }

    #[test]
    fn test_padding_lines() {
        let options = XmpPacketOptions::default().with_padding_lines(3);
        let xml = XmpWriter::new(options).to_xml(&[]);
        assert_eq!(xml.matches(PADDING_LINE).count(), 3);

        let none = XmpWriter::new(options.with_padding_lines(0)).to_xml(&[]);
        assert!(none.contains("</x:xmpmeta>\n<?xpacket end=\"w\"?>"));
    }

    #[test]
    fn test_utf16_encodings() {
        let be = XmpEncoding::Utf16Be.encode("<a>");
        assert_eq!(be, vec![0x00, b'<', 0x00, b'a', 0x00, b'>']);
        let le = XmpEncoding::Utf16Le.encode("<a>");
        assert_eq!(le, vec![b'<', 0x00, b'a', 0x00, b'>', 0x00]);

        assert_eq!(XmpEncoding::detect(&be), XmpEncoding::Utf16Be);
        assert_eq!(XmpEncoding::detect(&le), XmpEncoding::Utf16Le);
        assert_eq!(XmpEncoding::detect(b"<?xpacket"), XmpEncoding::Utf8);
    }

    #[test]
    fn test_encode_decode_non_latin() {
        let text = "Łukasz 李 \u{1F600}";
        for encoding in [XmpEncoding::Utf8, XmpEncoding::Utf16Be, XmpEncoding::Utf16Le] {
            let bytes = encoding.encode(text);
            assert_eq!(encoding.decode(&bytes).unwrap(), text);
        }
    }

    #[test]
    fn test_decode_rejects_odd_utf16() {
        assert!(XmpEncoding::Utf16Be.decode(&[0x00]).is_err());
    }
}
