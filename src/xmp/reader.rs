//! XMP packet parsing.
//!
//! Reads a packet back into [`MetadataSchema`] blocks so produced metadata
//! can be inspected. Every `xmlns:` prefix declared on an `rdf:Description`
//! becomes one schema; properties are routed to the schema of their prefix.
//! Both element and attribute forms of simple properties are accepted.

use super::schema::{LangAlt, MetadataSchema, XmpValue, X_DEFAULT};
use super::writer::XmpEncoding;
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Alt,
    Seq,
    Bag,
}

#[derive(Debug)]
struct PendingProperty {
    qname: String,
    container: Option<Container>,
    text: String,
    items: Vec<(Option<String>, String)>,
    item: Option<(Option<String>, String)>,
}

impl PendingProperty {
    fn new(qname: String) -> Self {
        Self {
            qname,
            container: None,
            text: String::new(),
            items: Vec::new(),
            item: None,
        }
    }

    fn into_value(self) -> XmpValue {
        let items = self.items;
        match self.container {
            None => XmpValue::Text(self.text),
            Some(Container::Seq) => XmpValue::Seq(items.into_iter().map(|(_, v)| v).collect()),
            Some(Container::Bag) => XmpValue::Bag(items.into_iter().map(|(_, v)| v).collect()),
            Some(Container::Alt) => {
                let default = items
                    .iter()
                    .find(|(lang, _)| lang.as_deref() == Some(X_DEFAULT))
                    .or_else(|| items.first())
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default();
                let mut alt = LangAlt::new(default);
                for (lang, value) in items {
                    if let Some(lang) = lang.filter(|l| l != X_DEFAULT) {
                        alt.insert(&lang, value);
                    }
                }
                XmpValue::LangAlt(alt)
            },
        }
    }
}

/// Schemas of the `rdf:Description` currently being read.
#[derive(Debug, Default)]
struct Description {
    schemas: Vec<MetadataSchema>,
}

impl Description {
    fn schema_mut(&mut self, prefix: &str) -> Option<&mut MetadataSchema> {
        self.schemas.iter_mut().find(|s| s.prefix == prefix)
    }

    fn set(&mut self, qname: &str, value: XmpValue) {
        let Some((prefix, local)) = qname.split_once(':') else {
            log::debug!("Ignoring unqualified XMP property {}", qname);
            return;
        };
        match self.schema_mut(prefix) {
            Some(schema) => schema.set(local, value),
            None => log::warn!("XMP property {} uses an undeclared prefix", qname),
        }
    }
}

/// XMP packet reader.
pub struct XmpReader;

impl XmpReader {
    /// Parse packet bytes, detecting UTF-8 or UTF-16.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Vec<MetadataSchema>> {
        let xml = XmpEncoding::detect(bytes).decode(bytes)?;
        Self::parse(&xml)
    }

    /// Parse packet text into schemas, in document order.
    pub fn parse(xml: &str) -> Result<Vec<MetadataSchema>> {
        let mut reader = Reader::from_str(xml);

        let mut schemas = Vec::new();
        let mut description: Option<Description> = None;
        let mut property: Option<PendingProperty> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = qname(&e);
                    match name.as_str() {
                        "rdf:Description" => description = Some(open_description(&e)?),
                        "rdf:Alt" | "rdf:Seq" | "rdf:Bag" => {
                            if let Some(prop) = property.as_mut() {
                                prop.container = Some(match name.as_str() {
                                    "rdf:Alt" => Container::Alt,
                                    "rdf:Seq" => Container::Seq,
                                    _ => Container::Bag,
                                });
                            }
                        },
                        "rdf:li" => {
                            if let Some(prop) = property.as_mut() {
                                prop.item = Some((lang_of(&e)?, String::new()));
                            }
                        },
                        _ => {
                            if description.is_some() && property.is_none() {
                                property = Some(PendingProperty::new(name));
                            }
                        },
                    }
                },
                Ok(Event::Empty(e)) => {
                    let name = qname(&e);
                    match name.as_str() {
                        "rdf:Description" => schemas.extend(open_description(&e)?.schemas),
                        "rdf:li" => {
                            if let Some(prop) = property.as_mut() {
                                prop.items.push((lang_of(&e)?, String::new()));
                            }
                        },
                        _ => {
                            if let (Some(desc), None) = (description.as_mut(), property.as_ref()) {
                                desc.set(&name, XmpValue::Text(String::new()));
                            }
                        },
                    }
                },
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::Xmp(format!("bad text content: {}", err)))?;
                    // Values keep their whitespace. Indentation around a
                    // container lands in `text`, which containers ignore.
                    if let Some(prop) = property.as_mut() {
                        match prop.item.as_mut() {
                            Some((_, value)) => value.push_str(&text),
                            None => prop.text.push_str(&text),
                        }
                    }
                },
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match name.as_str() {
                        "rdf:li" => {
                            if let Some(prop) = property.as_mut() {
                                if let Some(item) = prop.item.take() {
                                    prop.items.push(item);
                                }
                            }
                        },
                        "rdf:Description" => {
                            if let Some(desc) = description.take() {
                                schemas.extend(desc.schemas);
                            }
                        },
                        _ => {
                            if property.as_ref().is_some_and(|p| p.qname == name) {
                                if let (Some(prop), Some(desc)) =
                                    (property.take(), description.as_mut())
                                {
                                    let qname = prop.qname.clone();
                                    desc.set(&qname, prop.into_value());
                                }
                            }
                        },
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xmp(format!(
                        "XML error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                },
                _ => {},
            }
        }

        Ok(schemas)
    }
}

fn qname(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn lang_of(e: &BytesStart<'_>) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::Xmp(format!("bad attribute: {}", err)))?;
        if attr.key.as_ref() == b"xml:lang" {
            let value = attr
                .unescape_value()
                .map_err(|err| Error::Xmp(format!("bad xml:lang value: {}", err)))?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

fn open_description(e: &BytesStart<'_>) -> Result<Description> {
    let mut desc = Description::default();
    let mut simple = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::Xmp(format!("bad attribute: {}", err)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::Xmp(format!("bad value for {}: {}", key, err)))?
            .to_string();

        if let Some(prefix) = key.strip_prefix("xmlns:") {
            if prefix != "rdf" && prefix != "x" {
                desc.schemas.push(MetadataSchema::new(value, prefix));
            }
        } else if key.contains(':') && !key.starts_with("rdf:") && !key.starts_with("xml:") {
            simple.push((key, value));
        }
    }

    for (key, value) in simple {
        desc.set(&key, XmpValue::Text(value));
    }
    Ok(desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmp::schema::{NS_DC, NS_PDFUAID};
    use crate::xmp::writer::XmpWriter;

    const COMBINED: &str = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about=""
        xmlns:dc="http://purl.org/dc/elements/1.1/"
        xmlns:xmp="http://ns.adobe.com/xap/1.0/"
        xmp:CreatorTool="Writer">
      <dc:title>
        <rdf:Alt>
          <rdf:li xml:lang="x-default">Test &amp; Document</rdf:li>
          <rdf:li xml:lang="de">Testdokument</rdf:li>
        </rdf:Alt>
      </dc:title>
      <dc:creator>
        <rdf:Seq>
          <rdf:li>John Doe</rdf:li>
          <rdf:li>Jane Smith</rdf:li>
        </rdf:Seq>
      </dc:creator>
      <xmp:CreateDate>2024-01-15T10:30:00Z</xmp:CreateDate>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

    #[test]
    fn test_parse_combined_description() {
        let schemas = XmpReader::parse(COMBINED).unwrap();
        assert_eq!(schemas.len(), 2);

        let dc = &schemas[0];
        assert_eq!(dc.prefix, "dc");
        assert_eq!(dc.namespace, NS_DC);
        let title = dc.get("title").and_then(|v| v.as_lang_alt()).unwrap();
        assert_eq!(title.default_value(), "Test & Document");
        assert_eq!(title.get("de"), Some("Testdokument"));
        assert_eq!(
            dc.get("creator"),
            Some(&XmpValue::Seq(vec!["John Doe".into(), "Jane Smith".into()]))
        );

        let xmp = &schemas[1];
        assert_eq!(xmp.get("CreatorTool").and_then(|v| v.as_text()), Some("Writer"));
        assert_eq!(
            xmp.get("CreateDate").and_then(|v| v.as_text()),
            Some("2024-01-15T10:30:00Z")
        );
    }

    #[test]
    fn test_parse_written_packet() {
        let mut title = LangAlt::new("Title");
        title.insert("de", "Titel");
        let written = vec![
            MetadataSchema::new(NS_DC, "dc")
                .with("title", XmpValue::LangAlt(title))
                .with("subject", XmpValue::Bag(vec!["a".into(), "b".into()])),
            MetadataSchema::new(NS_PDFUAID, "pdfuaid").with("part", XmpValue::Text("1".into())),
        ];
        let bytes = XmpWriter::default().to_bytes(&written);
        assert_eq!(XmpReader::parse_bytes(&bytes).unwrap(), written);
    }

    #[test]
    fn test_values_keep_surrounding_whitespace() {
        let written = vec![
            MetadataSchema::new(NS_DC, "dc")
                .with("title", XmpValue::LangAlt(LangAlt::new("  Report  ")))
                .with("creator", XmpValue::Seq(vec!["A.  Smith ".into()])),
            MetadataSchema::new(NS_PDFUAID, "pdfuaid").with("part", XmpValue::Text(" 1\n".into())),
        ];
        let bytes = XmpWriter::default().to_bytes(&written);
        let parsed = XmpReader::parse_bytes(&bytes).unwrap();

        let title = parsed[0].get("title").and_then(|v| v.as_lang_alt()).unwrap();
        assert_eq!(title.default_value(), "  Report  ");
        assert_eq!(parsed, written);
    }

    #[test]
    fn test_parse_empty_li() {
        let xml = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/"><rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
<rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
<dc:subject><rdf:Bag><rdf:li/><rdf:li>x</rdf:li></rdf:Bag></dc:subject>
</rdf:Description></rdf:RDF></x:xmpmeta>"#;
        let schemas = XmpReader::parse(xml).unwrap();
        assert_eq!(
            schemas[0].get("subject"),
            Some(&XmpValue::Bag(vec![String::new(), "x".into()]))
        );
    }

    #[test]
    fn test_parse_malformed() {
        let err = XmpReader::parse("<x:xmpmeta><rdf:RDF></x:xmpmeta>").unwrap_err();
        assert!(matches!(err, Error::Xmp(_)));
    }
}
