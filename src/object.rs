//! PDF values exchanged with a document layer.
//!
//! Info dictionary entries arrive as [`Object`]s, and the writer builds the
//! catalog, structure elements and metadata stream from them.

use std::collections::HashMap;

/// A PDF value (ISO 32000-1:2008, Section 7.3).
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean(bool),
    /// Integer number
    Integer(i64),
    /// Real number
    Real(f64),
    /// String bytes, already in their PDF encoding
    String(Vec<u8>),
    /// Name, without the leading slash
    Name(String),
    /// Array
    Array(Vec<Object>),
    /// Dictionary
    Dictionary(HashMap<String, Object>),
    /// Stream: dictionary plus payload. `/Length` is filled in on output.
    Stream {
        /// Stream dictionary
        dict: HashMap<String, Object>,
        /// Payload
        data: bytes::Bytes,
    },
    /// Indirect reference
    Reference(ObjectRef),
}

/// `id gen R`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// A text string: PDFDocEncoding when possible, UTF-16BE with BOM otherwise.
    pub fn text(s: &str) -> Self {
        Object::String(crate::encoding::encode_text_string(s))
    }

    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Stream { .. } => "Stream",
            Object::Reference(_) => "Reference",
        }
    }

    /// String bytes, if this is a string.
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    /// Dictionary entries of a dictionary or stream.
    pub fn as_dict(&self) -> Option<&HashMap<String, Object>> {
        match self {
            Object::Dictionary(d) | Object::Stream { dict: d, .. } => Some(d),
            _ => None,
        }
    }

    pub(crate) fn as_array(&self) -> Option<&[Object]> {
        match self {
            Object::Array(items) => Some(items),
            _ => None,
        }
    }
}
