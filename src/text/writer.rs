//! Text VDF serialization.
//!
//! Pretty layout puts every entry and brace on its own line, indented one
//! unit per depth, with scalars written as `"key"\t\t"value"`. Compact layout
//! writes space-separated tokens on a single line. Both escape keys and
//! values with the table the lexer decodes.

use std::borrow::Cow;
use std::io::Write;

use super::lexer::is_whitespace;
use crate::ast::order::ordered;
use crate::ast::{Document, NodeId, NodeKind};
use crate::error::{ErrorCode, VdfResult};
use crate::options::EncodeOptions;

/// Escape `\`, `"`, newline, tab and carriage return.
///
/// Returns the input unchanged when nothing needs escaping.
pub fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '"', '\n', '\t', '\r']) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Returns true if `value` would survive as an unquoted token.
///
/// The writer always quotes; this is exposed for callers producing
/// hand-edited files who want to know which keys need quotes.
pub fn is_bare_token(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with("//")
        && !value.chars().any(|c| is_whitespace(c) || matches!(c, '{' | '}' | '"' | '\\'))
}

/// Layout parameters shared by the tree writer and the manual encoder.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextLayout<'o> {
    indent: &'o str,
    compact: bool,
}

impl<'o> TextLayout<'o> {
    pub(crate) fn new(opts: &'o EncodeOptions) -> Self {
        Self {
            indent: &opts.indent,
            compact: opts.compact,
        }
    }

    fn write_indent<W: Write>(&self, w: &mut W, depth: usize) -> VdfResult<()> {
        for _ in 0..depth {
            w.write_all(self.indent.as_bytes())?;
        }
        Ok(())
    }

    /// Object header at `depth`.
    pub(crate) fn object_start<W: Write>(&self, w: &mut W, key: &str, depth: usize) -> VdfResult<()> {
        let key = escape(key);
        if self.compact {
            write!(w, "\"{key}\" {{ ")?;
            return Ok(());
        }

        self.write_indent(w, depth)?;
        writeln!(w, "\"{key}\"")?;
        self.write_indent(w, depth)?;
        w.write_all(b"{\n")?;
        Ok(())
    }

    /// Object footer at `depth`.
    pub(crate) fn object_end<W: Write>(&self, w: &mut W, depth: usize) -> VdfResult<()> {
        if self.compact {
            w.write_all(b"} ")?;
            return Ok(());
        }

        self.write_indent(w, depth)?;
        w.write_all(b"}\n")?;
        Ok(())
    }

    /// One scalar entry at `depth`.
    pub(crate) fn leaf<W: Write>(&self, w: &mut W, key: &str, value: &str, depth: usize) -> VdfResult<()> {
        let (key, value) = (escape(key), escape(value));
        if self.compact {
            write!(w, "\"{key}\" \"{value}\" ")?;
            return Ok(());
        }

        self.write_indent(w, depth)?;
        writeln!(w, "\"{key}\"\t\t\"{value}\"")?;
        Ok(())
    }
}

/// Write a whole document as text VDF.
pub(crate) fn write_text_document<W: Write>(w: &mut W, doc: &Document, opts: &EncodeOptions) -> VdfResult<()> {
    let layout = TextLayout::new(opts);
    let roots = ordered(doc, doc.roots(), opts.deterministic);

    for (i, &root) in roots.iter().enumerate() {
        write_text_node(w, doc, root, &layout, opts.deterministic, 0)?;
        if !opts.compact && i + 1 < roots.len() {
            w.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn write_text_node<W: Write>(
    w: &mut W,
    doc: &Document,
    id: NodeId,
    layout: &TextLayout<'_>,
    deterministic: bool,
    depth: usize,
) -> VdfResult<()> {
    let node = doc
        .node(id)
        .ok_or_else(|| ErrorCode::invalid_node("nil node"))?;

    match node.kind {
        NodeKind::Object => {
            layout.object_start(w, &node.key, depth)?;
            for &child in ordered(doc, &node.children, deterministic).iter() {
                write_text_node(w, doc, child, layout, deterministic, depth + 1)?;
            }
            layout.object_end(w, depth)
        }
        NodeKind::String | NodeKind::Uint32 => {
            let value = node.text_value()?;
            layout.leaf(w, &node.key, &value, depth)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Format;

    fn sample() -> Document {
        let mut doc = Document::new();
        let root = doc.new_object("root");
        let name = doc.new_string("name", "say \"hi\"\n");
        let id = doc.new_uint32("id", 42);
        let inner = doc.new_object("inner");
        doc.add_child(root, name);
        doc.add_child(root, id);
        doc.add_child(root, inner);
        doc.add_root(root);
        doc
    }

    fn render(doc: &Document, opts: &EncodeOptions) -> String {
        let mut out = Vec::new();
        write_text_document(&mut out, doc, opts).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_escape() {
        assert!(matches!(escape("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape("a\\b\"c\nd\te\rf"), r#"a\\b\"c\nd\te\rf"#);
    }

    #[test]
    fn test_bare_token() {
        assert!(is_bare_token("/usr/lib"));
        assert!(!is_bare_token("two words"));
        assert!(!is_bare_token("//comment"));
        assert!(!is_bare_token(""));
    }

    #[test]
    fn test_pretty_layout() {
        let out = render(&sample(), &EncodeOptions::new(Format::Text));
        let expected = concat!(
            "\"root\"\n",
            "{\n",
            "\t\"name\"\t\t\"say \\\"hi\\\"\\n\"\n",
            "\t\"id\"\t\t\"42\"\n",
            "\t\"inner\"\n",
            "\t{\n",
            "\t}\n",
            "}\n",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_compact_layout() {
        let opts = EncodeOptions::new(Format::Text).with_compact(true);
        let out = render(&sample(), &opts);
        assert_eq!(
            out,
            r#""root" { "name" "say \"hi\"\n" "id" "42" "inner" { } } "#
        );
    }

    #[test]
    fn test_custom_indent_and_root_separator() {
        let mut doc = Document::new();
        let a = doc.new_object("a");
        let leaf = doc.new_string("k", "v");
        doc.add_child(a, leaf);
        let b = doc.new_string("b", "2");
        doc.add_root(a);
        doc.add_root(b);

        let opts = EncodeOptions::new(Format::Text).with_indent("  ");
        let out = render(&doc, &opts);
        assert_eq!(out, "\"a\"\n{\n  \"k\"\t\t\"v\"\n}\n\n\"b\"\t\t\"2\"\n");
    }

    #[test]
    fn test_deterministic_sorts_each_level() {
        let mut doc = Document::new();
        let root = doc.new_object("root");
        for (k, v) in [("b", "1"), ("a", "2"), ("b", "0")] {
            let leaf = doc.new_string(k, v);
            doc.add_child(root, leaf);
        }
        let z = doc.new_string("z", "last");
        doc.add_root(z);
        doc.add_root(root);

        let opts = EncodeOptions::new(Format::Text)
            .with_compact(true)
            .with_deterministic(true);
        assert_eq!(
            render(&doc, &opts),
            r#""root" { "a" "2" "b" "1" "b" "0" } "z" "last" "#
        );
    }

    #[test]
    fn test_dangling_child_is_invalid_state() {
        let mut doc = sample();
        let root = doc.roots()[0];
        doc.node_mut(root).unwrap().children.push(NodeId::NULL);

        let mut out = Vec::new();
        let err = write_text_document(&mut out, &doc, &EncodeOptions::default()).unwrap_err();
        assert_eq!(err.code(), 105);
    }
}
