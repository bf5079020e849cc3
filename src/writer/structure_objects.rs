//! Structure tree to PDF objects (ISO 32000-1:2008, Section 14.7).
//!
//! Produces the StructTreeRoot, one StructElem per node, and the ParentTree
//! number tree that maps each page's MCIDs back to their elements.

use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef};
use crate::structure::{SerializedKid, SerializedTree};
use std::collections::{BTreeMap, HashMap};

use super::object_serializer::ObjectSerializer as O;

/// Attribute keys written as text strings on the StructElem.
const TEXT_ATTRIBUTES: [&str; 5] = ["Lang", "ActualText", "Alt", "E", "T"];

/// Objects making up a document's logical structure.
#[derive(Debug)]
pub(crate) struct StructureObjects {
    /// Reference to the StructTreeRoot
    pub root: ObjectRef,
    /// Indirect objects, in ascending id order
    pub objects: Vec<(ObjectRef, Object)>,
}

/// Convert `tree` into indirect objects numbered from `first_id`.
///
/// Node `i` gets id `first_id + i` (node 0 is the StructTreeRoot), the
/// ParentTree follows the last node. `pages[n]` is the page object of page
/// index `n`.
pub(crate) fn structure_objects(
    tree: &SerializedTree,
    pages: &[ObjectRef],
    first_id: u32,
) -> Result<StructureObjects> {
    let node_ref = |index: usize| ObjectRef::new(first_id + index as u32, 0);
    let parent_tree_ref = node_ref(tree.nodes.len());
    let page_ref = |page: usize| {
        pages.get(page).copied().ok_or_else(|| {
            Error::Writer(format!("marked content refers to missing page {}", page))
        })
    };

    let root = tree
        .nodes
        .first()
        .ok_or_else(|| Error::Writer("structure tree has no root".to_string()))?;
    let mut objects = Vec::with_capacity(tree.nodes.len() + 1);

    let mut root_dict = vec![
        ("Type", O::name("StructTreeRoot")),
        ("ParentTree", O::reference(parent_tree_ref)),
        ("ParentTreeNextKey", O::integer(pages.len() as i64)),
    ];
    let top_level: Vec<Object> = root
        .kids
        .iter()
        .filter_map(|kid| match kid {
            SerializedKid::Node(index) => Some(O::reference(node_ref(*index))),
            SerializedKid::Content(_) => None,
        })
        .collect();
    if let Some(k) = collapse(top_level) {
        root_dict.push(("K", k));
    }
    if !tree.role_map.is_empty() {
        let role_map = tree
            .role_map
            .iter()
            .map(|(custom, standard)| (custom.clone(), O::name(standard.as_str())))
            .collect::<HashMap<_, _>>();
        root_dict.push(("RoleMap", Object::Dictionary(role_map)));
    }
    objects.push((node_ref(0), O::dict(root_dict)));

    for (index, node) in tree.nodes.iter().enumerate().skip(1) {
        let tag = node
            .tag
            .as_ref()
            .ok_or_else(|| Error::Writer(format!("structure element {} has no type", index)))?;
        let parent = node.parent.ok_or_else(|| {
            Error::Writer(format!("structure element {} has no parent", index))
        })?;

        let pg = tree.page_of(index).map(page_ref).transpose()?;
        let mut kids = Vec::with_capacity(node.kids.len());
        for kid in &node.kids {
            kids.push(match kid {
                SerializedKid::Node(child) => O::reference(node_ref(*child)),
                SerializedKid::Content(content) if Some(content.page) == tree.page_of(index) => {
                    O::integer(i64::from(content.mcid))
                },
                SerializedKid::Content(content) => O::dict(vec![
                    ("Type", O::name("MCR")),
                    ("Pg", O::reference(page_ref(content.page)?)),
                    ("MCID", O::integer(i64::from(content.mcid))),
                ]),
            });
        }

        let mut dict = vec![
            ("Type", O::name("StructElem")),
            ("S", O::name(tag.as_str())),
            ("P", O::reference(node_ref(parent))),
        ];
        if let Some(pg) = pg {
            dict.push(("Pg", O::reference(pg)));
        }
        if let Some(k) = collapse(kids) {
            dict.push(("K", k));
        }
        for (key, value) in &node.attributes {
            if TEXT_ATTRIBUTES.contains(&key.as_str()) {
                dict.push((key.as_str(), O::text(value)));
            } else {
                log::debug!("Attribute /{} of element {} not written", key, index);
            }
        }
        objects.push((node_ref(index), O::dict(dict)));
    }

    objects.push((parent_tree_ref, parent_tree(tree, pages.len(), &node_ref)));

    Ok(StructureObjects {
        root: node_ref(0),
        objects,
    })
}

/// ParentTree with one entry per page, keyed by the page's `/StructParents`.
fn parent_tree(
    tree: &SerializedTree,
    page_count: usize,
    node_ref: &dyn Fn(usize) -> ObjectRef,
) -> Object {
    let mut per_page: BTreeMap<usize, BTreeMap<u32, usize>> =
        (0..page_count).map(|page| (page, BTreeMap::new())).collect();
    for (index, content) in tree.content_refs() {
        per_page
            .entry(content.page)
            .or_default()
            .insert(content.mcid, index);
    }

    let mut nums = Vec::with_capacity(per_page.len() * 2);
    for (page, mcids) in per_page {
        nums.push(O::integer(page as i64));
        nums.push(Object::Array(
            mcids
                .values()
                .map(|&index| O::reference(node_ref(index)))
                .collect(),
        ));
    }
    O::dict(vec![("Nums", Object::Array(nums))])
}

/// A `/K` value: nothing, a single kid, or an array.
fn collapse(mut kids: Vec<Object>) -> Option<Object> {
    match kids.len() {
        0 => None,
        1 => kids.pop(),
        _ => Some(Object::Array(kids)),
    }
}
