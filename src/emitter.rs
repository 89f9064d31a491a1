//! Resource Emitter
//!
//! Turns one manifest entry into one generated C source file holding the
//! resource bytes as an `unsigned char` array.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::config::GeneratorConfig;
use crate::hashing::sha256_hex;
use crate::manifest::{ManifestEntry, ResourceKind};
use crate::pipeline::GeneratorError;

pub const GENERATED_BANNER: &str = "// Generated file, do not modify!";
pub const BYTES_PER_LINE: usize = 16;
const INDENT: &str = "    ";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmittedResource {
    pub symbol: String,
    pub kind: ResourceKind,
    pub file: String,
    pub output: PathBuf,
    /// On-disk length of the resource (no terminator).
    pub size: usize,
    /// Length of the emitted array.
    pub array_len: usize,
    pub hash: String,
}

/// Bytes as they appear in the generated array: text gains a NUL.
pub fn embedded_bytes(mut content: Vec<u8>, kind: ResourceKind) -> Vec<u8> {
    if kind == ResourceKind::Text {
        content.push(0);
    }
    content
}

/// Render the generated source for `symbol`.
pub fn render_array(symbol: &str, bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 6 + 128);
    out.push_str(GENERATED_BANNER);
    out.push_str("\n\n");
    let _ = writeln!(out, "extern const unsigned char {}[] = {{", symbol);

    let mut chunks = bytes.chunks(BYTES_PER_LINE).peekable();
    if chunks.peek().is_none() {
        out.push_str(INDENT);
        out.push('\n');
    }
    for chunk in chunks {
        out.push_str(INDENT);
        for b in chunk {
            let _ = write!(out, "0x{:02X}, ", b);
        }
        out.push('\n');
    }

    out.push_str("};\n");
    out
}

/// Parse the array body of a generated source back into bytes.
pub fn decode_array(source: &str) -> Result<Vec<u8>, GeneratorError> {
    let malformed = |msg: &str| GeneratorError::MalformedSource(msg.to_string());

    let start = source.find("= {").ok_or_else(|| malformed("missing array initializer"))?;
    let body = &source[start + 3..];
    let end = body.rfind("};").ok_or_else(|| malformed("missing closing brace"))?;

    body[..end]
        .split(',')
        .map(str::trim)
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            let hex = tok
                .strip_prefix("0x")
                .or_else(|| tok.strip_prefix("0X"))
                .ok_or_else(|| malformed(&format!("bad literal '{}'", tok)))?;
            u8::from_str_radix(hex, 16).map_err(|_| malformed(&format!("bad literal '{}'", tok)))
        })
        .collect()
}

/// Read the resource for `entry` and write its generated source file.
pub fn emit_resource(
    entry: &ManifestEntry,
    config: &GeneratorConfig,
) -> Result<EmittedResource, GeneratorError> {
    let input = config.resource_path(&entry.file);
    info!("Generating {}...", input.display());

    if !input.is_file() {
        return Err(GeneratorError::MissingResource(input));
    }
    let content = fs::read(&input).map_err(|source| GeneratorError::Io {
        path: input.clone(),
        source,
    })?;
    let size = content.len();

    let bytes = embedded_bytes(content, entry.kind);
    let source = render_array(&entry.symbol, &bytes);

    let output = config.source_path(&entry.file);
    fs::write(&output, &source).map_err(|source| GeneratorError::Io {
        path: output.clone(),
        source,
    })?;

    Ok(EmittedResource {
        symbol: entry.symbol.clone(),
        kind: entry.kind,
        file: entry.file.clone(),
        output,
        size,
        array_len: bytes.len(),
        hash: sha256_hex(source.as_bytes()),
    })
}
