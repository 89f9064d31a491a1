//! Master Header Emitter
//!
//! One header declares every embedded symbol. Text symbols are NUL
//! terminated and get no size constant; binary symbols get `<S><suffix>`.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::config::GeneratorConfig;
use crate::emitter::GENERATED_BANNER;
use crate::pipeline::GeneratorError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeEntry {
    pub symbol: String,
    pub size: usize,
}

/// Binary symbol -> byte length, in the order resources were emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeTable {
    entries: Vec<SizeEntry>,
}

impl SizeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, symbol: impl Into<String>, size: usize) {
        let symbol = symbol.into();
        match self.entries.iter_mut().find(|e| e.symbol == symbol) {
            Some(existing) => existing.size = size,
            None => self.entries.push(SizeEntry { symbol, size }),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.symbol == symbol).map(|e| e.size)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SizeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn render_header<'a>(
    strings: impl IntoIterator<Item = &'a str>,
    sizes: &SizeTable,
    size_suffix: &str,
) -> String {
    let mut out = String::new();
    out.push_str("#pragma once\n");
    out.push_str(GENERATED_BANNER);
    out.push_str("\n\n");

    for symbol in strings {
        let _ = writeln!(out, "extern \"C\" const char {}[];", symbol);
    }

    out.push('\n');

    for entry in sizes.iter() {
        let _ = writeln!(out, "extern \"C\" const unsigned char {}[];", entry.symbol);
        let _ = writeln!(
            out,
            "static const unsigned int {}{} = {};",
            entry.symbol, size_suffix, entry.size
        );
    }

    out
}

pub fn write_header<'a>(
    strings: impl IntoIterator<Item = &'a str>,
    sizes: &SizeTable,
    config: &GeneratorConfig,
) -> Result<(PathBuf, String), GeneratorError> {
    let path = config.header_path();
    info!("Generating {}...", path.display());

    let content = render_header(strings, sizes, &config.size_suffix);
    fs::write(&path, &content).map_err(|source| GeneratorError::Io {
        path: path.clone(),
        source,
    })?;

    Ok((path, content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let mut sizes = SizeTable::new();
        sizes.record("MAIN_TEXTURE", 10);

        let header = render_header(
            ["DEFAULT_FRAG_SHADER", "DEFAULT_VERTEX_SHADER"],
            &sizes,
            "_SIZE",
        );

        assert_eq!(
            header,
            "#pragma once\n\
             // Generated file, do not modify!\n\
             \n\
             extern \"C\" const char DEFAULT_FRAG_SHADER[];\n\
             extern \"C\" const char DEFAULT_VERTEX_SHADER[];\n\
             \n\
             extern \"C\" const unsigned char MAIN_TEXTURE[];\n\
             static const unsigned int MAIN_TEXTURE_SIZE = 10;\n"
        );
    }

    #[test]
    fn test_strings_have_no_size() {
        let header = render_header(["ONLY_TEXT"], &SizeTable::new(), "_SIZE");
        assert!(header.contains("ONLY_TEXT[]"));
        assert!(!header.contains("ONLY_TEXT_SIZE"));
    }

    #[test]
    fn test_size_table_keeps_order() {
        let mut sizes = SizeTable::new();
        sizes.record("B", 2);
        sizes.record("A", 1);
        sizes.record("B", 3);

        let order: Vec<_> = sizes.iter().map(|e| (e.symbol.as_str(), e.size)).collect();
        assert_eq!(order, vec![("B", 3), ("A", 1)]);
        assert_eq!(sizes.get("A"), Some(1));
        assert_eq!(sizes.get("C"), None);
    }
}
