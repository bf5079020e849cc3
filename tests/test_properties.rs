//! Property tests for the structure tree, the marked-content linker and
//! metadata synthesis.

use proptest::prelude::*;
use tagged_pdf::content::MarkedContentLinker;
use tagged_pdf::info::DocumentProperties;
use tagged_pdf::structure::{ElementId, StructType, StructureTree};
use tagged_pdf::xmp::{XmpReader, XmpSynthesizer};

/// Build a tree where element `i` is attached to `parents[i] % (i + 1)`
/// (0 meaning the root).
fn build_tree(parents: &[usize]) -> (StructureTree, Vec<ElementId>) {
    let mut tree = StructureTree::new();
    let root = tree.create_root().unwrap();
    let mut ids = vec![root];
    for (i, choice) in parents.iter().enumerate() {
        let parent = ids[choice % (i + 1)];
        ids.push(tree.add_element(parent, StructType::Div).unwrap());
    }
    (tree, ids)
}

fn properties() -> impl Strategy<Value = DocumentProperties> {
    (
        proptest::option::of("[A-Za-z0-9 &<>\"'äöüßŁ李]{1,20}"),
        proptest::option::of("[A-Za-z. éñ]{1,20}"),
        proptest::option::of("[a-z, ]{1,20}"),
        proptest::option::of("[A-Za-z 0-9ø]{1,10}"),
    )
        .prop_map(|(title, author, keywords, producer)| {
            let mut props = DocumentProperties::new();
            if let Some(title) = title {
                props = props.with_title(title);
            }
            if let Some(author) = author {
                props = props.with_author(author);
            }
            if let Some(keywords) = keywords {
                props = props.with_keywords(keywords);
            }
            if let Some(producer) = producer {
                props = props.with_producer(producer);
            }
            props
        })
}

proptest! {
    #[test]
    fn prop_every_element_reaches_root(parents in proptest::collection::vec(any::<usize>(), 0..40)) {
        let (mut tree, ids) = build_tree(&parents);
        let root = ids[0];

        for &id in &ids[1..] {
            let mut current = id;
            let mut steps = 0;
            while let Some(parent) = tree.parent(current) {
                current = parent;
                steps += 1;
                prop_assert!(steps <= ids.len());
            }
            prop_assert_eq!(current, root);
        }

        let serialized = tree.finalize().unwrap();
        prop_assert_eq!(serialized.nodes.len(), ids.len());
        for (index, node) in serialized.nodes.iter().enumerate().skip(1) {
            let parent = node.parent.unwrap();
            prop_assert!(parent < index);
        }
    }

    #[test]
    fn prop_failed_close_leaves_stack_unchanged(depth in 2usize..10, pick in any::<usize>()) {
        let (_, ids) = build_tree(&vec![0; depth]);
        let mut linker = MarkedContentLinker::new();
        linker.begin_stream(0).unwrap();

        let handles: Vec<_> = ids[1..].iter().map(|&id| linker.open(id).unwrap()).collect();
        let before = linker.open_sequences().to_vec();

        // Anything but the innermost handle is rejected
        let wrong = handles[pick % (handles.len() - 1)];
        prop_assert!(linker.close(wrong).is_err());
        prop_assert_eq!(linker.open_sequences(), &before[..]);

        for handle in handles.iter().rev() {
            prop_assert!(linker.close(*handle).is_ok());
        }
        let summary = linker.end_stream().unwrap();
        prop_assert_eq!(summary.mcid_count(), depth);
    }

    #[test]
    fn prop_synthesis_is_deterministic(props in properties()) {
        let synthesizer = XmpSynthesizer::default();
        let first = synthesizer.synthesize(&props);
        let second = synthesizer.synthesize(&props);
        prop_assert_eq!(first.bytes(), second.bytes());
    }

    #[test]
    fn prop_no_empty_schema_in_packet(props in properties()) {
        let block = XmpSynthesizer::default().synthesize(&props);
        let schemas = XmpReader::parse_bytes(block.bytes()).unwrap();

        prop_assert!(schemas.iter().all(|s| !s.is_empty()));
        prop_assert!(schemas.iter().any(|s| s.prefix == "pdfuaid"));
        prop_assert_eq!(schemas.len(), block.schemas().len());
    }

    #[test]
    fn prop_packet_parses_back_to_its_schemas(props in properties()) {
        let block = XmpSynthesizer::default().synthesize(&props);
        let parsed = XmpReader::parse_bytes(block.bytes()).unwrap();
        prop_assert_eq!(&parsed[..], block.schemas());
    }
}
