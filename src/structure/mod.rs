//! PDF Logical Structure (Tagged PDF) support.
//!
//! This module builds logical structure trees according to
//! ISO 32000-1:2008 Section 14.7.
//!
//! ## Overview
//!
//! Tagged PDFs contain explicit document structure that defines reading order,
//! semantic meaning, and accessibility information. Assistive technology reads
//! the structure tree instead of guessing from the page layout.
//!
//! ## Structure Tree
//!
//! A structure tree consists of:
//! - **StructTreeRoot**: The root of the structure hierarchy
//! - **StructElem**: Structure elements (paragraphs, headings, sections, etc.)
//! - **Marked content references**: links from elements to MCIDs in page
//!   content streams
//! - **RoleMap**: Maps custom structure types to standard ones
//!
//! ## Example
//!
//! ```
//! use tagged_pdf::structure::{AttributeKey, StructType, StructureTree};
//!
//! let mut tree = StructureTree::new();
//! let root = tree.create_root()?;
//! let doc = tree.add_element(root, StructType::Document)?;
//! let p = tree.add_element(doc, StructType::P)?;
//! tree.set_attribute(p, AttributeKey::Lang, "en-US")?;
//! tree.bind_content(p, 0, 0)?;
//!
//! let serialized = tree.finalize()?;
//! assert_eq!(serialized.nodes.len(), 3);
//! # Ok::<(), tagged_pdf::error::Error>(())
//! ```

mod tree;
mod types;

pub use tree::{SerializedKid, SerializedNode, SerializedTree, StructureTree};
pub use types::{AttributeKey, ContentRef, ElementId, Kid, StructType, StructureElement};
