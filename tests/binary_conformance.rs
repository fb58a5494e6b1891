//! Binary VDF conformance tests.
//!
//! Wire vectors are written as hex so the byte layout is visible in the test:
//! type byte, NUL-terminated key, payload, and `08` end markers.

use vdf_codec::{
    append_binary, detect_format, estimate_binary_size, parse_auto, parse_bytes, parse_str,
    DecodeOptions, Document, EncodeOptions, ErrorCode, Format, NodeKind,
};

fn binary_opts() -> DecodeOptions {
    DecodeOptions::new(Format::Binary)
}

fn decode_hex(vector: &str) -> Result<Document, ErrorCode> {
    let bytes = hex::decode(vector).unwrap();
    parse_bytes(&bytes, binary_opts())
}

fn encode(doc: &Document, deterministic: bool) -> Vec<u8> {
    let mut out = Vec::new();
    let opts = EncodeOptions::new(Format::Binary).with_deterministic(deterministic);
    append_binary(&mut out, doc, opts).unwrap();
    out
}

/// `"root" { "name" "x" "id" 66846721 }`
const ROOT_VECTOR: &str = concat!(
    "00", "726f6f7400",
    "01", "6e616d6500", "7800",
    "02", "696400", "0100fc03",
    "08",
    "08"
);

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn binary_decode_reference_vector() {
    let doc = decode_hex(ROOT_VECTOR).unwrap();
    assert_eq!(doc.format, Format::Binary);

    let root = doc.first_root("root").unwrap();
    assert_eq!(root.kind(), NodeKind::Object);
    assert_eq!(root.first("name").unwrap().as_str(), Some("x"));
    assert_eq!(root.first("id").unwrap().as_u32(), Some(66_846_721));
}

#[test]
fn binary_empty_input_is_empty_document() {
    let doc = parse_bytes(b"", binary_opts()).unwrap();
    assert!(doc.roots().is_empty());
}

#[test]
fn binary_lone_terminator_is_empty_document() {
    let doc = decode_hex("08").unwrap();
    assert!(doc.roots().is_empty());
}

#[test]
fn binary_top_level_scalars() {
    let doc = decode_hex("016b007600026e00ffffffff08").unwrap();
    let kinds: Vec<_> = doc.root_nodes().map(|n| n.kind()).collect();
    assert_eq!(kinds, vec![NodeKind::String, NodeKind::Uint32]);
    assert_eq!(doc.first_root("n").unwrap().as_u32(), Some(u32::MAX));
}

#[test]
fn binary_invalid_utf8_replaced() {
    let doc = decode_hex("016b00ff0008").unwrap();
    assert_eq!(doc.first_root("k").unwrap().as_str(), Some("\u{FFFD}"));
}

// ============================================================================
// Truncation and corruption
// ============================================================================

#[test]
fn binary_truncation_is_buffer_overflow() {
    let full = hex::decode(ROOT_VECTOR).unwrap();
    // Every strict prefix that starts a root must fail as truncated.
    for len in 1..full.len() - 1 {
        let err = parse_bytes(&full[..len], binary_opts()).unwrap_err();
        assert!(
            matches!(err, ErrorCode::E102_BufferOverflow),
            "prefix {len}: {err:?}"
        );
        assert!(err.is_truncation());
    }
}

#[test]
fn binary_missing_document_terminator() {
    let full = hex::decode(ROOT_VECTOR).unwrap();
    let err = parse_bytes(&full[..full.len() - 1], binary_opts()).unwrap_err();
    assert_eq!(err.code(), 102);
}

#[test]
fn binary_unknown_type_byte() {
    let err = decode_hex("076b0008").unwrap_err();
    assert!(matches!(err, ErrorCode::E101_UnrecognizedType(0x07)));
    assert!(!err.is_truncation());
}

#[test]
fn binary_unknown_type_inside_object() {
    let err = decode_hex("00726f6f7400056b000808").unwrap_err();
    assert!(matches!(err, ErrorCode::E101_UnrecognizedType(0x05)));
}

#[test]
fn binary_short_uint32() {
    let err = decode_hex("026e000102").unwrap_err();
    assert!(matches!(err, ErrorCode::E102_BufferOverflow));
}

// ============================================================================
// Limits and strict mode
// ============================================================================

#[test]
fn binary_depth_limit() {
    // a { b { c "v" } }
    let vector = "0061000062000163007600080808";
    assert!(parse_bytes(&hex::decode(vector).unwrap(), binary_opts().with_max_depth(3)).is_ok());
    let err = parse_bytes(&hex::decode(vector).unwrap(), binary_opts().with_max_depth(2))
        .unwrap_err();
    assert!(matches!(err, ErrorCode::E106_DepthLimitExceeded(3, 2)));
}

#[test]
fn binary_node_limit() {
    let bytes = hex::decode(ROOT_VECTOR).unwrap();
    assert!(parse_bytes(&bytes, binary_opts().with_max_nodes(3)).is_ok());
    let err = parse_bytes(&bytes, binary_opts().with_max_nodes(2)).unwrap_err();
    assert_eq!(err.code(), 107);
}

#[test]
fn binary_strict_duplicate_roots() {
    // "k" "a" "k" "b" at the root
    let bytes = hex::decode("016b006100016b00620008").unwrap();
    assert_eq!(parse_bytes(&bytes, binary_opts()).unwrap().roots().len(), 2);

    let err = parse_bytes(&bytes, binary_opts().with_strict(true)).unwrap_err();
    match err {
        ErrorCode::E104_DuplicateKey { key, scope } => {
            assert_eq!(key, "k");
            assert_eq!(scope, "root");
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn binary_encode_matches_reference_vector() {
    let mut doc = Document::new();
    let root = doc.new_object("root");
    let name = doc.new_string("name", "x");
    let id = doc.new_uint32("id", 66_846_721);
    doc.add_child(root, name);
    doc.add_child(root, id);
    doc.add_root(root);

    let out = encode(&doc, false);
    assert_eq!(hex::encode(&out), ROOT_VECTOR);
    assert_eq!(estimate_binary_size(&doc), out.len());
}

#[test]
fn binary_high_uint32_round_trip() {
    let mut doc = Document::new();
    let n = doc.new_uint32("n", 0xFF00_0001);
    doc.add_root(n);

    let out = encode(&doc, false);
    assert_eq!(hex::encode(&out), "026e00010000ff08");
    let back = parse_bytes(&out, binary_opts()).unwrap();
    assert_eq!(back.first_root("n").unwrap().as_u32(), Some(0xFF00_0001));
}

#[test]
fn binary_nul_in_value_rejected() {
    let mut doc = Document::new();
    let s = doc.new_string("k", "a\0b");
    doc.add_root(s);

    let mut out = b"prefix".to_vec();
    let err = append_binary(&mut out, &doc, EncodeOptions::new(Format::Binary)).unwrap_err();
    assert!(matches!(err, ErrorCode::E103_NullInString(_)));
    assert_eq!(out, b"prefix", "failed append leaves the buffer untouched");
}

#[test]
fn binary_nul_in_key_rejected() {
    let mut doc = Document::new();
    let s = doc.new_object("bad\0key");
    doc.add_root(s);

    let err = append_binary(&mut Vec::new(), &doc, EncodeOptions::new(Format::Binary))
        .unwrap_err();
    assert_eq!(err.code(), 103);
}

#[test]
fn binary_deterministic_output_is_byte_identical() {
    let a = parse_str("r { z 1 a { y 2 b 3 } m 4 }").unwrap();
    let b = parse_str("r { m 4 a { b 3 y 2 } z 1 }").unwrap();
    assert_ne!(encode(&a, false), encode(&b, false));
    assert_eq!(encode(&a, true), encode(&b, true));
}

#[test]
fn binary_estimate_matches_encoded_length() {
    let doc = parse_str(include_str!("fixtures/appmanifest.vdf")).unwrap();
    assert_eq!(estimate_binary_size(&doc), encode(&doc, false).len());
    assert_eq!(estimate_binary_size(&Document::new()), 1);
}

#[test]
fn binary_text_values_stay_strings_across_formats() {
    let doc = parse_str(include_str!("fixtures/appmanifest.vdf")).unwrap();
    let back = parse_bytes(&encode(&doc, false), binary_opts()).unwrap();
    assert!(back.same_structure(&doc));
    let appid = back.first_root("AppState").unwrap().first("appid").unwrap();
    assert_eq!(appid.kind(), NodeKind::String);
}

// ============================================================================
// Detection
// ============================================================================

#[test]
fn binary_auto_detects_both_formats() {
    let bytes = hex::decode(ROOT_VECTOR).unwrap();
    assert_eq!(detect_format(&bytes), Format::Binary);
    assert_eq!(parse_auto(&bytes).unwrap().format, Format::Binary);

    let text = parse_auto(b"\"root\" { \"k\" \"v\" }").unwrap();
    assert_eq!(text.format, Format::Text);
}

#[test]
fn binary_auto_detect_on_long_stream() {
    let mut doc = Document::new();
    let root = doc.new_object("root");
    for i in 0..100 {
        let child = doc.new_string(format!("key{i}"), "value");
        doc.add_child(root, child);
    }
    doc.add_root(root);

    let out = encode(&doc, false);
    assert!(out.len() > 64);
    let back = parse_auto(&out).unwrap();
    assert_eq!(back.format, Format::Binary);
    assert!(back.same_structure(&doc));
}
