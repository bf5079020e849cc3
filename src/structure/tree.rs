//! Structure tree arena.
//!
//! All elements live in one `Vec` owned by [`StructureTree`]; parents and
//! children refer to each other by [`ElementId`]. Children are append-only,
//! so reading order is the order in which elements and content were added.

use super::types::{AttributeKey, ContentRef, ElementId, Kid, StructType, StructureElement};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

/// Builder for a document's logical structure.
///
/// Not `Clone`: element ids are bound to the tree's identity, and a copy
/// sharing it would accept ids issued by its twin.
#[derive(Debug)]
pub struct StructureTree {
    id: Uuid,
    nodes: Vec<StructureElement>,
    role_map: IndexMap<String, StructType>,
    finalized: bool,
}

impl StructureTree {
    /// Create an empty tree with a fresh identity.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            nodes: Vec::new(),
            role_map: IndexMap::new(),
            finalized: false,
        }
    }

    /// Create the StructTreeRoot.
    ///
    /// Fails with [`Error::DuplicateRoot`] if a root already exists; the
    /// existing root stays valid.
    pub fn create_root(&mut self) -> Result<ElementId> {
        self.check_open()?;
        if !self.nodes.is_empty() {
            return Err(Error::DuplicateRoot);
        }
        let id = self.next_id();
        self.nodes.push(StructureElement::root(id));
        log::debug!("Created structure tree root {}", id);
        Ok(id)
    }

    /// Append a new element as the last kid of `parent`.
    pub fn add_element(&mut self, parent: ElementId, tag: StructType) -> Result<ElementId> {
        self.check_open()?;
        if !self.contains(parent) {
            return Err(Error::UnknownParent(parent));
        }
        let id = self.next_id();
        log::trace!("Adding /{} under {}", tag, parent);
        self.nodes.push(StructureElement::new(id, tag, parent));
        self.nodes[parent.index].kids.push(Kid::Element(id));
        Ok(id)
    }

    /// Set an attribute; a later value for the same key replaces the earlier one.
    pub fn set_attribute(
        &mut self,
        element: ElementId,
        key: AttributeKey,
        value: impl Into<String>,
    ) -> Result<()> {
        let node = self.element_mut(element)?;
        node.attributes.insert(key, value.into());
        Ok(())
    }

    /// Append a marked-content reference to an element's kids.
    pub fn bind_content(&mut self, element: ElementId, page: usize, mcid: u32) -> Result<()> {
        let node = self.element_mut(element)?;
        node.kids.push(Kid::Content(ContentRef { page, mcid }));
        Ok(())
    }

    /// Map a custom structure type to a standard one (RoleMap entry).
    pub fn map_role(&mut self, custom: impl Into<String>, standard: StructType) -> Result<()> {
        self.check_open()?;
        let custom = custom.into();
        if let Some(previous) = self.role_map.insert(custom.clone(), standard) {
            log::debug!("RoleMap entry /{} replaced (was /{})", custom, previous);
        }
        Ok(())
    }

    /// Freeze the tree and produce its serialized form.
    ///
    /// Nodes are listed depth-first in kid order, the root first.
    pub fn finalize(&mut self) -> Result<SerializedTree> {
        self.check_open()?;
        if self.nodes.is_empty() {
            return Err(Error::MissingRoot);
        }
        self.finalized = true;

        // Arena index -> pre-order position
        let order = self.pre_order();
        let mut position = vec![0usize; self.nodes.len()];
        for (pos, &index) in order.iter().enumerate() {
            position[index] = pos;
        }

        let nodes = order
            .iter()
            .map(|&index| {
                let node = &self.nodes[index];
                SerializedNode {
                    tag: node.tag.clone(),
                    parent: node.parent.map(|p| position[p.index]),
                    attributes: node
                        .attributes
                        .iter()
                        .map(|(k, v)| (k.as_str().to_string(), v.clone()))
                        .collect(),
                    kids: node
                        .kids
                        .iter()
                        .map(|kid| match kid {
                            Kid::Element(id) => SerializedKid::Node(position[id.index]),
                            Kid::Content(content) => SerializedKid::Content(*content),
                        })
                        .collect(),
                }
            })
            .collect();

        let role_map = self
            .role_map
            .iter()
            .map(|(custom, standard)| (custom.clone(), standard.clone()))
            .collect();

        log::debug!("Finalized structure tree with {} node(s)", self.nodes.len());
        Ok(SerializedTree { nodes, role_map })
    }

    /// The root, once created.
    pub fn root(&self) -> Option<ElementId> {
        self.nodes.first().map(|n| n.id)
    }

    /// Look up an element.
    pub fn element(&self, id: ElementId) -> Option<&StructureElement> {
        if self.contains(id) {
            Some(&self.nodes[id.index])
        } else {
            None
        }
    }

    /// Parent of an element; `None` for the root or a foreign id.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).and_then(|e| e.parent)
    }

    /// Child elements in reading order (content references omitted).
    pub fn children(&self, id: ElementId) -> Result<Vec<ElementId>> {
        let node = self.element(id).ok_or(Error::UnknownElement(id))?;
        Ok(node
            .kids
            .iter()
            .filter_map(|kid| match kid {
                Kid::Element(child) => Some(*child),
                Kid::Content(_) => None,
            })
            .collect())
    }

    /// RoleMap entries.
    pub fn role_map(&self) -> &IndexMap<String, StructType> {
        &self.role_map
    }

    /// Number of nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no root has been created yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether [`finalize`](Self::finalize) has been called.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Identity embedded in every id this tree issues.
    pub fn id(&self) -> Uuid {
        self.id
    }

    fn next_id(&self) -> ElementId {
        ElementId {
            tree: self.id,
            index: self.nodes.len(),
        }
    }

    fn contains(&self, id: ElementId) -> bool {
        id.tree == self.id && id.index < self.nodes.len()
    }

    fn check_open(&self) -> Result<()> {
        if self.finalized {
            Err(Error::TreeFinalized)
        } else {
            Ok(())
        }
    }

    /// Mutable access to a non-root element of an open tree.
    fn element_mut(&mut self, id: ElementId) -> Result<&mut StructureElement> {
        self.check_open()?;
        if !self.contains(id) {
            return Err(Error::UnknownElement(id));
        }
        let node = &mut self.nodes[id.index];
        if node.is_root() {
            return Err(Error::RootContent);
        }
        Ok(node)
    }

    fn pre_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            order.push(index);
            // Reverse so the first kid is popped first
            for kid in self.nodes[index].kids.iter().rev() {
                if let Kid::Element(child) = kid {
                    stack.push(child.index);
                }
            }
        }
        order
    }
}

impl Default for StructureTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Kid of a serialized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializedKid {
    /// Index into [`SerializedTree::nodes`]
    Node(usize),
    /// Marked-content reference
    Content(ContentRef),
}

/// A finalized structure element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerializedNode {
    /// Structure type; absent for the StructTreeRoot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<StructType>,
    /// Index of the parent node
    pub parent: Option<usize>,
    /// Attributes by key name
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    /// Kids in reading order
    pub kids: Vec<SerializedKid>,
}

/// Immutable, finalized structure tree handed to the document layer.
///
/// `nodes[0]` is the StructTreeRoot; every other node appears after its
/// parent, in depth-first reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerializedTree {
    /// Nodes in pre-order
    pub nodes: Vec<SerializedNode>,
    /// RoleMap: custom type name to standard type
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub role_map: IndexMap<String, StructType>,
}

impl SerializedTree {
    /// All marked-content references as `(node index, reference)`, in
    /// reading order.
    pub fn content_refs(&self) -> impl Iterator<Item = (usize, ContentRef)> + '_ {
        self.nodes.iter().enumerate().flat_map(|(index, node)| {
            node.kids.iter().filter_map(move |kid| match kid {
                SerializedKid::Content(content) => Some((index, *content)),
                SerializedKid::Node(_) => None,
            })
        })
    }

    /// First page a node has content on, used as its `/Pg`.
    pub fn page_of(&self, index: usize) -> Option<usize> {
        self.nodes.get(index)?.kids.iter().find_map(|kid| match kid {
            SerializedKid::Content(content) => Some(content.page),
            SerializedKid::Node(_) => None,
        })
    }

    /// Pretty JSON dump, for debugging and snapshots.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Io(e.into()))
    }
}
