//! Property tests: generated trees survive a write/read cycle in both
//! formats, and deterministic output is a fixed point.

use proptest::prelude::*;
use vdf_codec::{
    append_binary, append_text, parse_bytes, parse_str, DecodeOptions, Document, EncodeOptions,
    Format, NodeId,
};

#[derive(Debug, Clone)]
enum Entry {
    Text(String, String),
    Number(String, u32),
    Object(String, Vec<Entry>),
}

fn key() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_ ./-]{0,8}"
}

fn value() -> impl Strategy<Value = String> {
    "[ -~\t\n\r\u{e9}\u{4e2d}]{0,12}"
}

fn entries(numbers: bool) -> impl Strategy<Value = Vec<Entry>> {
    let leaf = if numbers {
        prop_oneof![
            (key(), value()).prop_map(|(k, v)| Entry::Text(k, v)),
            (key(), any::<u32>()).prop_map(|(k, n)| Entry::Number(k, n)),
        ]
        .boxed()
    } else {
        (key(), value()).prop_map(|(k, v)| Entry::Text(k, v)).boxed()
    };

    let tree = leaf.prop_recursive(4, 48, 6, |inner| {
        (key(), prop::collection::vec(inner, 0..6)).prop_map(|(k, c)| Entry::Object(k, c))
    });
    prop::collection::vec(tree, 0..5)
}

fn insert(doc: &mut Document, entry: &Entry) -> NodeId {
    match entry {
        Entry::Text(k, v) => doc.new_string(k.as_str(), v.as_str()),
        Entry::Number(k, n) => doc.new_uint32(k.as_str(), *n),
        Entry::Object(k, children) => {
            let id = doc.new_object(k.as_str());
            for child in children {
                let child = insert(doc, child);
                doc.add_child(id, child);
            }
            id
        }
    }
}

fn build(roots: &[Entry]) -> Document {
    let mut doc = Document::new();
    for entry in roots {
        let id = insert(&mut doc, entry);
        doc.add_root(id);
    }
    doc
}

fn text(doc: &Document, opts: EncodeOptions) -> String {
    let mut out = Vec::new();
    append_text(&mut out, doc, opts).unwrap();
    String::from_utf8(out).unwrap()
}

fn binary(doc: &Document, deterministic: bool) -> Vec<u8> {
    let mut out = Vec::new();
    let opts = EncodeOptions::new(Format::Binary).with_deterministic(deterministic);
    append_binary(&mut out, doc, opts).unwrap();
    out
}

proptest! {
    #[test]
    fn pretty_text_round_trip(roots in entries(false)) {
        let doc = build(&roots);
        let back = parse_str(&text(&doc, EncodeOptions::default())).unwrap();
        prop_assert!(back.same_structure(&doc));
    }

    #[test]
    fn compact_text_round_trip(roots in entries(false)) {
        let doc = build(&roots);
        let out = text(&doc, EncodeOptions::default().with_compact(true));
        let back = parse_str(&out).unwrap();
        prop_assert!(back.same_structure(&doc));
    }

    #[test]
    fn binary_round_trip(roots in entries(true)) {
        let doc = build(&roots);
        let out = binary(&doc, false);
        prop_assert_eq!(out.len(), vdf_codec::estimate_binary_size(&doc));

        let back = parse_bytes(&out, DecodeOptions::new(Format::Binary)).unwrap();
        prop_assert!(back.same_structure(&doc));
    }

    #[test]
    fn deterministic_binary_is_a_fixed_point(roots in entries(true)) {
        let doc = build(&roots);
        let first = binary(&doc, true);
        let back = parse_bytes(&first, DecodeOptions::new(Format::Binary)).unwrap();
        prop_assert_eq!(binary(&back, true), first);
    }

    #[test]
    fn deterministic_text_is_a_fixed_point(roots in entries(false)) {
        let opts = EncodeOptions::default().with_deterministic(true);
        let doc = build(&roots);
        let first = text(&doc, opts.clone());
        let back = parse_str(&first).unwrap();
        prop_assert_eq!(text(&back, opts), first);
    }

    #[test]
    fn lossy_map_never_fails(roots in entries(true)) {
        let doc = build(&roots);
        let map = doc.to_map_lossy();
        prop_assert!(map.len() <= doc.roots().len());
    }
}
