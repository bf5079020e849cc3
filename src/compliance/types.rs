//! Conformance claims written to the XMP packet.

use serde::{Deserialize, Serialize};
use std::fmt;

/// PDF/A level (ISO 19005), named in configuration as `"1a"`, `"2b"`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PdfALevel {
    /// PDF/A-1a
    #[serde(rename = "1a")]
    A1a,
    /// PDF/A-1b
    #[serde(rename = "1b")]
    A1b,
    /// PDF/A-2a
    #[serde(rename = "2a")]
    A2a,
    /// PDF/A-2b
    #[serde(rename = "2b")]
    A2b,
    /// PDF/A-2u
    #[serde(rename = "2u")]
    A2u,
    /// PDF/A-3a
    #[serde(rename = "3a")]
    A3a,
    /// PDF/A-3b
    #[serde(rename = "3b")]
    A3b,
    /// PDF/A-3u
    #[serde(rename = "3u")]
    A3u,
}

impl PdfALevel {
    /// Part number and conformance letter.
    fn parts(self) -> (&'static str, &'static str) {
        use PdfALevel::*;
        match self {
            A1a => ("1", "A"),
            A1b => ("1", "B"),
            A2a => ("2", "A"),
            A2b => ("2", "B"),
            A2u => ("2", "U"),
            A3a => ("3", "A"),
            A3b => ("3", "B"),
            A3u => ("3", "U"),
        }
    }

    /// Value of `pdfaid:part`.
    pub fn xmp_part(&self) -> &'static str {
        self.parts().0
    }

    /// Value of `pdfaid:conformance`.
    pub fn xmp_conformance(&self) -> &'static str {
        self.parts().1
    }
}

impl fmt::Display for PdfALevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (part, conformance) = self.parts();
        write!(f, "PDF/A-{}{}", part, conformance.to_ascii_lowercase())
    }
}

/// PDF/UA part claimed by `pdfuaid:part` (ISO 14289).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UaPart {
    /// PDF/UA-1
    #[default]
    #[serde(rename = "1")]
    Ua1,
    /// PDF/UA-2, PDF 2.0 only
    #[serde(rename = "2")]
    Ua2,
}

impl UaPart {
    /// Value of `pdfuaid:part`.
    pub fn xmp_part(&self) -> &'static str {
        match self {
            UaPart::Ua1 => "1",
            UaPart::Ua2 => "2",
        }
    }
}

impl fmt::Display for UaPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PDF/UA-{}", self.xmp_part())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdfa_xmp_values() {
        assert_eq!((PdfALevel::A1a.xmp_part(), PdfALevel::A1a.xmp_conformance()), ("1", "A"));
        assert_eq!(PdfALevel::A2b.xmp_conformance(), "B");
        assert_eq!((PdfALevel::A3u.xmp_part(), PdfALevel::A3u.xmp_conformance()), ("3", "U"));
    }

    #[test]
    fn test_display() {
        assert_eq!(PdfALevel::A2u.to_string(), "PDF/A-2u");
        assert_eq!(UaPart::Ua1.to_string(), "PDF/UA-1");
        assert_eq!(UaPart::Ua2.to_string(), "PDF/UA-2");
    }

    #[test]
    fn test_serde_names() {
        let level: PdfALevel = serde_json::from_str("\"3b\"").unwrap();
        assert_eq!(level, PdfALevel::A3b);
        let part: UaPart = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(part, UaPart::Ua2);
        assert!(serde_json::from_str::<PdfALevel>("\"4a\"").is_err());
    }
}
