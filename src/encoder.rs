//! Stream encoding front-end.
//!
//! [`Encoder`] writes whole documents, or entries one at a time through the
//! manual streaming calls. Manual writes go straight to the writer; the
//! encoder only tracks how many objects are open.

use std::io::{self, Write};

use crate::ast::{Document, Format};
use crate::binary::encode::{
    write_binary_document, write_object_end, write_object_start, write_string_entry,
    write_uint32_entry,
};
use crate::binary::estimate_binary_size;
use crate::error::{ErrorCode, VdfResult};
use crate::options::EncodeOptions;
use crate::text::writer::{write_text_document, TextLayout};

/// Counts bytes passed through to the inner writer.
struct Counted<'w, W: Write> {
    inner: &'w mut W,
    written: usize,
}

impl<W: Write> Write for Counted<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Encodes VDF to a writer.
pub struct Encoder<W: Write> {
    writer: W,
    opts: EncodeOptions,
    depth: usize,
    binary_used: bool,
    closed: bool,
}

impl<W: Write> Encoder<W> {
    /// Create an encoder. An empty indent is replaced with one tab.
    pub fn new(writer: W, opts: EncodeOptions) -> Self {
        Self {
            writer,
            opts: opts.normalized(),
            depth: 0,
            binary_used: false,
            closed: false,
        }
    }

    /// Encode a complete document.
    ///
    /// With [`Format::Auto`] the document's own format is used when it is
    /// text or binary, else text.
    pub fn encode_document(&mut self, doc: &Document) -> VdfResult<()> {
        if self.opts.validate {
            doc.validate()?;
        }

        let format = match (self.opts.format, doc.format) {
            (Format::Auto, Format::Binary) => Format::Binary,
            (Format::Auto, _) => Format::Text,
            (format, _) => format,
        };

        let mut out = Counted {
            inner: &mut self.writer,
            written: 0,
        };
        match format {
            Format::Binary => write_binary_document(&mut out, doc, self.opts.deterministic)?,
            _ => write_text_document(&mut out, doc, &self.opts)?,
        }

        tracing::debug!(%format, bytes = out.written, roots = doc.roots().len(), "encoded VDF");
        Ok(())
    }

    /// Format used by the manual streaming calls.
    fn manual_format(&self) -> Format {
        match self.opts.format {
            Format::Binary => Format::Binary,
            _ => Format::Text,
        }
    }

    fn ensure_open(&self) -> VdfResult<()> {
        if self.closed {
            return Err(ErrorCode::invalid_node("encoder already closed"));
        }
        Ok(())
    }

    /// Open an object.
    pub fn start_object(&mut self, key: &str) -> VdfResult<()> {
        self.ensure_open()?;
        match self.manual_format() {
            Format::Binary => {
                self.binary_used = true;
                write_object_start(&mut self.writer, key)?;
            }
            _ => TextLayout::new(&self.opts).object_start(&mut self.writer, key, self.depth)?,
        }
        self.depth += 1;
        Ok(())
    }

    /// Write a string leaf into the innermost open object, or as a root.
    pub fn write_string(&mut self, key: &str, value: &str) -> VdfResult<()> {
        self.ensure_open()?;
        match self.manual_format() {
            Format::Binary => {
                self.binary_used = true;
                write_string_entry(&mut self.writer, key, value)
            }
            _ => TextLayout::new(&self.opts).leaf(&mut self.writer, key, value, self.depth),
        }
    }

    /// Write a uint32 leaf into the innermost open object, or as a root.
    pub fn write_uint32(&mut self, key: &str, value: u32) -> VdfResult<()> {
        self.ensure_open()?;
        match self.manual_format() {
            Format::Binary => {
                self.binary_used = true;
                write_uint32_entry(&mut self.writer, key, value)
            }
            _ => TextLayout::new(&self.opts).leaf(&mut self.writer, key, &value.to_string(), self.depth),
        }
    }

    /// Close the innermost open object.
    pub fn end_object(&mut self) -> VdfResult<()> {
        self.ensure_open()?;
        if self.depth == 0 {
            return Err(ErrorCode::invalid_node("no open object"));
        }
        self.depth -= 1;
        match self.manual_format() {
            Format::Binary => write_object_end(&mut self.writer),
            _ => TextLayout::new(&self.opts).object_end(&mut self.writer, self.depth),
        }
    }

    /// Number of objects opened and not yet closed.
    pub fn open_objects(&self) -> usize {
        self.depth
    }

    /// Finish manual streaming and flush the writer.
    ///
    /// Fails while objects are still open. In binary mode the document
    /// terminator is written here, once, and only if a manual write happened.
    /// Calling `close` again is a no-op.
    pub fn close(&mut self) -> VdfResult<()> {
        if self.closed {
            return Ok(());
        }
        if self.depth != 0 {
            return Err(ErrorCode::invalid_node(format!("{} unclosed objects", self.depth)));
        }

        if self.manual_format() == Format::Binary && self.binary_used {
            write_object_end(&mut self.writer)?;
            tracing::trace!("wrote binary document terminator");
        }
        self.writer.flush()?;
        self.closed = true;
        Ok(())
    }

    /// Borrow the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Return the underlying writer without closing.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Encode `doc` as pretty text VDF.
pub fn write<W: Write>(writer: W, doc: &Document) -> VdfResult<()> {
    Encoder::new(writer, EncodeOptions::new(Format::Text)).encode_document(doc)
}

/// Encode `doc` as pretty text VDF into a string.
pub fn write_string(doc: &Document) -> VdfResult<String> {
    let mut out = Vec::new();
    append_text(&mut out, doc, EncodeOptions::new(Format::Text))?;
    // Text output is built from `str` keys and values only.
    String::from_utf8(out).map_err(|e| ErrorCode::invalid_node(e.to_string()))
}

/// Append text VDF to `dst`, ignoring `opts.format`.
///
/// On error `dst` is restored to its original length.
pub fn append_text(dst: &mut Vec<u8>, doc: &Document, opts: EncodeOptions) -> VdfResult<()> {
    append_with(dst, doc, opts.with_format(Format::Text))
}

/// Append binary VDF to `dst`, ignoring `opts.format`.
///
/// Reserves the estimated output size up front, after validation when
/// `opts.validate` is set. On error `dst` is restored to its original length.
pub fn append_binary(dst: &mut Vec<u8>, doc: &Document, opts: EncodeOptions) -> VdfResult<()> {
    if opts.validate {
        doc.validate()?;
    }
    dst.reserve(estimate_binary_size(doc));
    append_with(dst, doc, opts.with_format(Format::Binary).with_validate(false))
}

fn append_with(dst: &mut Vec<u8>, doc: &Document, opts: EncodeOptions) -> VdfResult<()> {
    let start = dst.len();
    let result = Encoder::new(&mut *dst, opts).encode_document(doc);
    if result.is_err() {
        dst.truncate(start);
    }
    result
}
