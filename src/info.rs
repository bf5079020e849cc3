//! Info dictionary adapter.
//!
//! Turns the loosely typed document Info dictionary (ISO 32000-1:2008,
//! Section 14.3.3) into [`DocumentProperties`], the typed record the XMP
//! synthesizer works from.
//!
//! Unknown keys are ignored and `null` values skipped. A value that cannot be
//! converted (wrong object type, malformed date) produces a
//! [`MetadataFieldError`]; the field is left out and adaptation carries on.

use crate::date::PdfDate;
use crate::encoding::decode_text_string;
use crate::object::Object;
use crate::xmp::LangAlt;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;

/// Raw Info dictionary entries, in document order.
pub type InfoDictionary = IndexMap<String, Object>;

/// A document property that could not be converted.
///
/// Never fatal: the field is omitted from the metadata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Metadata field /{field} dropped: {reason}")]
pub struct MetadataFieldError {
    /// Info dictionary key
    pub field: String,
    /// Why the value was rejected
    pub reason: String,
}

impl MetadataFieldError {
    /// Create a new field error.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Info dictionary keys the adapter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoKey {
    /// `/Title`
    Title,
    /// `/Author`
    Author,
    /// `/Subject`
    Subject,
    /// `/Keywords`
    Keywords,
    /// `/Creator`
    Creator,
    /// `/Producer`
    Producer,
    /// `/CreationDate`
    CreationDate,
    /// `/ModDate`
    ModDate,
}

impl InfoKey {
    /// All known keys.
    pub const ALL: [InfoKey; 8] = [
        InfoKey::Title,
        InfoKey::Author,
        InfoKey::Subject,
        InfoKey::Keywords,
        InfoKey::Creator,
        InfoKey::Producer,
        InfoKey::CreationDate,
        InfoKey::ModDate,
    ];

    /// Look up a key by its PDF name (without the leading slash).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }

    /// PDF name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoKey::Title => "Title",
            InfoKey::Author => "Author",
            InfoKey::Subject => "Subject",
            InfoKey::Keywords => "Keywords",
            InfoKey::Creator => "Creator",
            InfoKey::Producer => "Producer",
            InfoKey::CreationDate => "CreationDate",
            InfoKey::ModDate => "ModDate",
        }
    }
}

/// Canonical document properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentProperties {
    /// Title with optional per-language alternates
    pub title: Option<LangAlt>,
    /// Authors in order
    pub authors: Vec<String>,
    /// Subject, also used as the description
    pub subject: Option<String>,
    /// Keywords
    pub keywords: Option<String>,
    /// Tool that created the original document
    pub creator: Option<String>,
    /// Tool that produced the PDF
    pub producer: Option<String>,
    /// Creation date
    pub creation_date: Option<DateTime<FixedOffset>>,
    /// Last modification date
    pub modification_date: Option<DateTime<FixedOffset>>,
}

impl DocumentProperties {
    /// Create empty properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Set the default-language title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        match &mut self.title {
            Some(alt) => alt.set_default(title),
            None => self.title = Some(LangAlt::new(title)),
        }
        self
    }

    /// Add a title for a specific language.
    ///
    /// Ignored (with a warning) when no default title is set, since XMP
    /// requires the `x-default` entry.
    pub fn with_title_alternate(mut self, lang: &str, title: impl Into<String>) -> Self {
        match &mut self.title {
            Some(alt) => alt.insert(lang, title),
            None => log::warn!("Title alternate for '{}' ignored: no default title", lang),
        }
        self
    }

    /// Append an author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the keywords.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Set the creator tool.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Set the producer.
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    /// Set the creation date.
    pub fn with_creation_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Set the modification date.
    pub fn with_modification_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.modification_date = Some(date);
        self
    }
}

/// Output of [`adapt`]: the properties plus the fields that were dropped.
#[derive(Debug, Clone, Default)]
pub struct AdaptedProperties {
    /// Converted properties
    pub properties: DocumentProperties,
    /// Non-fatal conversion errors
    pub errors: Vec<MetadataFieldError>,
}

/// Convert a raw Info dictionary into [`DocumentProperties`].
pub fn adapt(info: &InfoDictionary) -> AdaptedProperties {
    let mut adapted = AdaptedProperties::default();

    for (name, value) in info {
        let key = match InfoKey::from_name(name.trim_start_matches('/')) {
            Some(key) => key,
            None => {
                log::trace!("Ignoring Info entry /{}", name);
                continue;
            },
        };
        if matches!(value, Object::Null) {
            continue;
        }

        if let Err(err) = apply(&mut adapted.properties, key, value) {
            log::warn!("{}", err);
            adapted.errors.push(err);
        }
    }

    adapted
}

fn apply(
    props: &mut DocumentProperties,
    key: InfoKey,
    value: &Object,
) -> Result<(), MetadataFieldError> {
    let bytes = value.as_string().ok_or_else(|| {
        MetadataFieldError::new(
            key.as_str(),
            format!("expected a string, found {}", value.type_name()),
        )
    })?;
    let text = decode_text_string(bytes);

    match key {
        InfoKey::Title => match &mut props.title {
            Some(alt) => alt.set_default(text),
            None => props.title = Some(LangAlt::new(text)),
        },
        InfoKey::Author => props.authors.push(text),
        InfoKey::Subject => props.subject = Some(text),
        InfoKey::Keywords => props.keywords = Some(text),
        InfoKey::Creator => props.creator = Some(text),
        InfoKey::Producer => props.producer = Some(text),
        InfoKey::CreationDate => props.creation_date = Some(parse_date(key, &text)?),
        InfoKey::ModDate => props.modification_date = Some(parse_date(key, &text)?),
    }
    Ok(())
}

fn parse_date(key: InfoKey, text: &str) -> Result<DateTime<FixedOffset>, MetadataFieldError> {
    PdfDate::parse(text)
        .map(|date| date.datetime())
        .map_err(|reason| MetadataFieldError::new(key.as_str(), reason))
}
