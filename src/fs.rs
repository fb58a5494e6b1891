//! File-path wrappers over the stream API.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::ast::{Document, Format};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::VdfResult;
use crate::options::{DecodeOptions, EncodeOptions};

/// Decode a file with the given options.
pub fn parse_file(path: impl AsRef<Path>, opts: DecodeOptions) -> VdfResult<Document> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading VDF file");
    let file = File::open(path)?;
    Decoder::new(BufReader::new(file), opts).into_document()
}

/// Decode a text VDF file.
pub fn parse_text_file(path: impl AsRef<Path>) -> VdfResult<Document> {
    parse_file(path, DecodeOptions::new(Format::Text))
}

/// Decode a file, detecting the format.
pub fn parse_auto_file(path: impl AsRef<Path>) -> VdfResult<Document> {
    parse_file(path, DecodeOptions::new(Format::Auto))
}

/// Encode `doc` into a new or truncated file.
pub fn write_file(path: impl AsRef<Path>, doc: &Document, opts: EncodeOptions) -> VdfResult<()> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "writing VDF file");
    let mut out = BufWriter::new(File::create(path)?);
    Encoder::new(&mut out, opts).encode_document(doc)?;
    out.flush()?;
    Ok(())
}

/// Encode `doc` as pretty text VDF into a file.
pub fn write_text_file(path: impl AsRef<Path>, doc: &Document) -> VdfResult<()> {
    write_file(path, doc, EncodeOptions::new(Format::Text))
}

/// Encode `doc` as binary VDF into a file.
pub fn write_binary_file(path: impl AsRef<Path>, doc: &Document) -> VdfResult<()> {
    write_file(path, doc, EncodeOptions::new(Format::Binary))
}
