//! Elements, ids and attribute keys of a logical structure tree
//! (ISO 32000-1:2008, Section 14.7.2).

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Identifier of a structure element.
///
/// Ids embed the identity of the tree that issued them, so an id from one
/// document is rejected by every other document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    pub(crate) tree: Uuid,
    pub(crate) index: usize,
}

impl ElementId {
    /// Position of the element in its tree's arena.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Identity of the tree that issued this id.
    pub fn tree(&self) -> Uuid {
        self.tree
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} (tree {})", self.index, self.tree)
    }
}

/// Structure type of an element (`/S`), ISO 32000-1:2008 Section 14.8.4.
///
/// Anything outside the standard set is [`StructType::Custom`] and should be
/// given a RoleMap entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructType {
    // Document-level structure types
    /// Document root
    Document,
    /// Part (major division)
    Part,
    /// Article
    Art,
    /// Section
    Sect,
    /// Division
    Div,

    // Paragraph-level structure types
    /// Paragraph
    P,
    /// Heading (unnumbered)
    H,
    /// Heading level 1
    H1,
    /// Heading level 2
    H2,
    /// Heading level 3
    H3,
    /// Heading level 4
    H4,
    /// Heading level 5
    H5,
    /// Heading level 6
    H6,

    // List structure types
    /// List
    L,
    /// List item
    LI,
    /// Label (list item marker)
    Lbl,
    /// List body (list item content)
    LBody,

    // Table structure types
    /// Table
    Table,
    /// Table row
    TR,
    /// Table header cell
    TH,
    /// Table data cell
    TD,
    /// Table header group
    THead,
    /// Table body group
    TBody,
    /// Table footer group
    TFoot,

    // Inline structure types
    /// Span (inline generic)
    Span,
    /// Quote
    Quote,
    /// Note
    Note,
    /// Reference
    Reference,
    /// Bibliographic entry
    BibEntry,
    /// Code
    Code,
    /// Link
    Link,
    /// Annotation
    Annot,

    // Illustration structure types
    /// Figure
    Figure,
    /// Formula
    Formula,
    /// Form (input field)
    Form,

    /// Custom structure type, resolved through the RoleMap
    Custom(String),
}

impl StructType {
    /// Parse a structure type name (without the leading slash).
    pub fn from_name(s: &str) -> Self {
        match s.trim_start_matches('/') {
            "Document" => Self::Document,
            "Part" => Self::Part,
            "Art" => Self::Art,
            "Sect" => Self::Sect,
            "Div" => Self::Div,
            "P" => Self::P,
            "H" => Self::H,
            "H1" => Self::H1,
            "H2" => Self::H2,
            "H3" => Self::H3,
            "H4" => Self::H4,
            "H5" => Self::H5,
            "H6" => Self::H6,
            "L" => Self::L,
            "LI" => Self::LI,
            "Lbl" => Self::Lbl,
            "LBody" => Self::LBody,
            "Table" => Self::Table,
            "TR" => Self::TR,
            "TH" => Self::TH,
            "TD" => Self::TD,
            "THead" => Self::THead,
            "TBody" => Self::TBody,
            "TFoot" => Self::TFoot,
            "Span" => Self::Span,
            "Quote" => Self::Quote,
            "Note" => Self::Note,
            "Reference" => Self::Reference,
            "BibEntry" => Self::BibEntry,
            "Code" => Self::Code,
            "Link" => Self::Link,
            "Annot" => Self::Annot,
            "Figure" => Self::Figure,
            "Formula" => Self::Formula,
            "Form" => Self::Form,
            other => Self::Custom(other.to_string()),
        }
    }

    /// PDF name of the type, as written to `/S`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Document => "Document",
            Self::Part => "Part",
            Self::Art => "Art",
            Self::Sect => "Sect",
            Self::Div => "Div",
            Self::P => "P",
            Self::H => "H",
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::H3 => "H3",
            Self::H4 => "H4",
            Self::H5 => "H5",
            Self::H6 => "H6",
            Self::L => "L",
            Self::LI => "LI",
            Self::Lbl => "Lbl",
            Self::LBody => "LBody",
            Self::Table => "Table",
            Self::TR => "TR",
            Self::TH => "TH",
            Self::TD => "TD",
            Self::THead => "THead",
            Self::TBody => "TBody",
            Self::TFoot => "TFoot",
            Self::Span => "Span",
            Self::Quote => "Quote",
            Self::Note => "Note",
            Self::Reference => "Reference",
            Self::BibEntry => "BibEntry",
            Self::Code => "Code",
            Self::Link => "Link",
            Self::Annot => "Annot",
            Self::Figure => "Figure",
            Self::Formula => "Formula",
            Self::Form => "Form",
            Self::Custom(name) => name,
        }
    }

    /// Whether this is a type defined by the PDF specification.
    pub fn is_standard(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    /// Check if this is a heading type (H, H1-H6)
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::H | Self::H1 | Self::H2 | Self::H3 | Self::H4 | Self::H5 | Self::H6)
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StructType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Structure element attribute keys (ISO 32000-1:2008, Table 323 and 14.9).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    /// `/Lang`: natural language of the element's content
    Lang,
    /// `/ActualText`: replacement text, e.g. for hyphenated words
    ActualText,
    /// `/Alt`: alternate description
    Alt,
    /// `/E`: expansion of an abbreviation
    E,
    /// `/T`: title
    T,
    /// Any other key
    Custom(String),
}

impl AttributeKey {
    /// Dictionary key name.
    pub fn as_str(&self) -> &str {
        match self {
            AttributeKey::Lang => "Lang",
            AttributeKey::ActualText => "ActualText",
            AttributeKey::Alt => "Alt",
            AttributeKey::E => "E",
            AttributeKey::T => "T",
            AttributeKey::Custom(name) => name,
        }
    }

    /// Parse a key name.
    pub fn from_name(name: &str) -> Self {
        match name.trim_start_matches('/') {
            "Lang" => AttributeKey::Lang,
            "ActualText" => AttributeKey::ActualText,
            "Alt" => AttributeKey::Alt,
            "E" => AttributeKey::E,
            "T" => AttributeKey::T,
            other => AttributeKey::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference from a structure element to a marked-content sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ContentRef {
    /// Zero-based page index
    pub page: usize,
    /// Marked-content id within the page's content stream
    pub mcid: u32,
}

/// Kid of a structure element, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kid {
    /// Child structure element
    Element(ElementId),
    /// Marked-content sequence
    Content(ContentRef),
}

/// A node of the structure tree arena.
#[derive(Debug, Clone)]
pub struct StructureElement {
    pub(crate) id: ElementId,
    pub(crate) tag: Option<StructType>,
    pub(crate) parent: Option<ElementId>,
    pub(crate) kids: Vec<Kid>,
    pub(crate) attributes: IndexMap<AttributeKey, String>,
}

impl StructureElement {
    pub(crate) fn root(id: ElementId) -> Self {
        Self {
            id,
            tag: None,
            parent: None,
            kids: Vec::new(),
            attributes: IndexMap::new(),
        }
    }

    pub(crate) fn new(id: ElementId, tag: StructType, parent: ElementId) -> Self {
        Self {
            id,
            tag: Some(tag),
            parent: Some(parent),
            kids: Vec::new(),
            attributes: IndexMap::new(),
        }
    }

    /// Element id.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Structure type; `None` for the StructTreeRoot.
    pub fn tag(&self) -> Option<&StructType> {
        self.tag.as_ref()
    }

    /// Whether this node is the StructTreeRoot.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Parent element.
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Kids in reading order.
    pub fn kids(&self) -> &[Kid] {
        &self.kids
    }

    /// Attribute value.
    pub fn attribute(&self, key: &AttributeKey) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> &IndexMap<AttributeKey, String> {
        &self.attributes
    }
}
