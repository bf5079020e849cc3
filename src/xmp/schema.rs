//! XMP schema model.
//!
//! A [`MetadataSchema`] is one namespace worth of properties. Values use the
//! three RDF containers XMP allows (`rdf:Alt`, `rdf:Seq`, `rdf:Bag`) or plain
//! text. Property order is insertion order so serialization is deterministic.

use indexmap::IndexMap;

/// Adobe XMP meta namespace (`x:`)
pub const NS_X: &str = "adobe:ns:meta/";
/// RDF syntax namespace (`rdf:`)
pub const NS_RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// Dublin Core (`dc:`)
pub const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
/// Adobe PDF schema (`pdf:`)
pub const NS_PDF: &str = "http://ns.adobe.com/pdf/1.3/";
/// XMP basic schema (`xmp:`)
pub const NS_XMP: &str = "http://ns.adobe.com/xap/1.0/";
/// PDF/UA identification schema (`pdfuaid:`)
pub const NS_PDFUAID: &str = "http://www.aiim.org/pdfua/ns/id/";
/// PDF/A identification schema (`pdfaid:`)
pub const NS_PDFAID: &str = "http://www.aiim.org/pdfa/ns/id/";

/// Language tag of the default entry in an `rdf:Alt`.
pub const X_DEFAULT: &str = "x-default";

/// Language alternative: a default value plus per-language variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangAlt {
    default: String,
    alternates: IndexMap<String, String>,
}

impl LangAlt {
    /// Create a language alternative with only a default value.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            alternates: IndexMap::new(),
        }
    }

    /// Replace the default value.
    pub fn set_default(&mut self, value: impl Into<String>) {
        self.default = value.into();
    }

    /// Add or replace the value for a language.
    ///
    /// Tags are normalized to BCP 47 form (`de_DE` becomes `de-DE`).
    /// Inserting `x-default` replaces the default value.
    pub fn insert(&mut self, lang: &str, value: impl Into<String>) {
        let lang = normalize_lang(lang);
        if lang.eq_ignore_ascii_case(X_DEFAULT) {
            self.default = value.into();
        } else {
            self.alternates.insert(lang, value.into());
        }
    }

    /// The default value.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// Value for a language, `x-default` included.
    pub fn get(&self, lang: &str) -> Option<&str> {
        let lang = normalize_lang(lang);
        if lang.eq_ignore_ascii_case(X_DEFAULT) {
            return Some(&self.default);
        }
        self.alternates.get(&lang).map(String::as_str)
    }

    /// Number of entries, the default included.
    pub fn len(&self) -> usize {
        1 + self.alternates.len()
    }

    /// Always false: the default entry is mandatory.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Entries as `(lang, value)`, `x-default` first, then alternates in
    /// insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        std::iter::once((X_DEFAULT, self.default.as_str())).chain(
            self.alternates
                .iter()
                .map(|(lang, value)| (lang.as_str(), value.as_str())),
        )
    }
}

fn normalize_lang(lang: &str) -> String {
    lang.trim().replace('_', "-")
}

/// An XMP property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmpValue {
    /// Simple text value
    Text(String),
    /// Language alternative (`rdf:Alt`)
    LangAlt(LangAlt),
    /// Ordered array (`rdf:Seq`)
    Seq(Vec<String>),
    /// Unordered array (`rdf:Bag`)
    Bag(Vec<String>),
}

impl XmpValue {
    /// The value as plain text, if it is a simple value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmpValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a language alternative.
    pub fn as_lang_alt(&self) -> Option<&LangAlt> {
        match self {
            XmpValue::LangAlt(alt) => Some(alt),
            _ => None,
        }
    }

    /// Array items of a `Seq` or `Bag`.
    pub fn items(&self) -> Option<&[String]> {
        match self {
            XmpValue::Seq(items) | XmpValue::Bag(items) => Some(items),
            _ => None,
        }
    }
}

/// Properties of one XMP namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSchema {
    /// Namespace URI
    pub namespace: String,
    /// Namespace prefix used in the packet
    pub prefix: String,
    /// Properties keyed by local name, in output order
    pub properties: IndexMap<String, XmpValue>,
}

impl MetadataSchema {
    /// Create an empty schema.
    pub fn new(namespace: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            prefix: prefix.into(),
            properties: IndexMap::new(),
        }
    }

    /// Set a property, keeping its original position if it already existed.
    pub fn set(&mut self, name: impl Into<String>, value: XmpValue) {
        self.properties.insert(name.into(), value);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: XmpValue) -> Self {
        self.set(name, value);
        self
    }

    /// Look up a property by local name.
    pub fn get(&self, name: &str) -> Option<&XmpValue> {
        self.properties.get(name)
    }

    /// Whether the schema has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_alt_default_first() {
        let mut alt = LangAlt::new("Title");
        alt.insert("de", "Titel");
        alt.insert("fr", "Titre");

        let entries: Vec<_> = alt.iter().collect();
        assert_eq!(entries, vec![("x-default", "Title"), ("de", "Titel"), ("fr", "Titre")]);
        assert_eq!(alt.len(), 3);
    }

    #[test]
    fn test_lang_alt_normalizes_tags() {
        let mut alt = LangAlt::new("Title");
        alt.insert("de_DE", "Titel");
        assert_eq!(alt.get("de-DE"), Some("Titel"));
        assert_eq!(alt.get("de_DE"), Some("Titel"));
        assert_eq!(alt.get("x-default"), Some("Title"));
        assert_eq!(alt.get("fr"), None);
    }

    #[test]
    fn test_lang_alt_x_default_insert_replaces_default() {
        let mut alt = LangAlt::new("Old");
        alt.insert("x-default", "New");
        assert_eq!(alt.default_value(), "New");
        assert_eq!(alt.len(), 1);
    }

    #[test]
    fn test_lang_alt_replace_keeps_position() {
        let mut alt = LangAlt::new("T");
        alt.insert("de", "A");
        alt.insert("fr", "B");
        alt.insert("de", "C");
        let langs: Vec<_> = alt.iter().map(|(l, _)| l).collect();
        assert_eq!(langs, vec!["x-default", "de", "fr"]);
        assert_eq!(alt.get("de"), Some("C"));
    }

    #[test]
    fn test_schema_is_empty() {
        let mut schema = MetadataSchema::new(NS_PDF, "pdf");
        assert!(schema.is_empty());
        schema.set("Producer", XmpValue::Text("tagged_pdf".into()));
        assert!(!schema.is_empty());
        assert_eq!(schema.get("Producer").and_then(|v| v.as_text()), Some("tagged_pdf"));
    }

    #[test]
    fn test_value_accessors() {
        let seq = XmpValue::Seq(vec!["a".into(), "b".into()]);
        assert_eq!(seq.items().map(|i| i.len()), Some(2));
        assert!(seq.as_text().is_none());
        assert!(XmpValue::LangAlt(LangAlt::new("x")).as_lang_alt().is_some());
    }
}
