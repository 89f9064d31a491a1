//! Resource Manifest - What Gets Embedded
//!
//! Binary entries are emitted byte-for-byte and get a size constant.
//! Text entries are NUL-terminated and get no size constant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::pipeline::GeneratorError;

pub type Symbol = String;

/// Binary resources shipped with the tool: file name -> symbol.
const BUILTIN_BINARY: &[(&str, &str)] = &[("cards.png", "MAIN_TEXTURE")];

/// Text resources shipped with the tool: file name -> symbol.
const BUILTIN_STRINGS: &[(&str, &str)] = &[
    ("default.fragmentshader", "DEFAULT_FRAG_SHADER"),
    ("default.vertexshader", "DEFAULT_VERTEX_SHADER"),
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Binary,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    pub file: String,
    pub symbol: Symbol,
    pub kind: ResourceKind,
}

impl ManifestEntry {
    pub fn binary(file: impl Into<String>, symbol: impl Into<Symbol>) -> Self {
        Self { file: file.into(), symbol: symbol.into(), kind: ResourceKind::Binary }
    }

    pub fn text(file: impl Into<String>, symbol: impl Into<Symbol>) -> Self {
        Self { file: file.into(), symbol: symbol.into(), kind: ResourceKind::Text }
    }
}

/// On-disk manifest format. Keys iterate sorted, so file order is stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ManifestFile {
    #[serde(default)]
    pub generator_min_version: Option<String>,
    #[serde(default)]
    pub binary: BTreeMap<String, Symbol>,
    #[serde(default)]
    pub strings: BTreeMap<String, Symbol>,
}

/// The combined manifest: binary entries first, then text entries.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator_min_version: Option<String>,
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn builtin() -> Self {
        Self::from_mappings(BUILTIN_BINARY.iter().copied(), BUILTIN_STRINGS.iter().copied())
    }

    pub fn from_mappings<F, S>(
        binary: impl IntoIterator<Item = (F, S)>,
        strings: impl IntoIterator<Item = (F, S)>,
    ) -> Self
    where
        F: Into<String>,
        S: Into<Symbol>,
    {
        let mut entries: Vec<ManifestEntry> = binary
            .into_iter()
            .map(|(file, symbol)| ManifestEntry::binary(file, symbol))
            .collect();
        entries.extend(strings.into_iter().map(|(file, symbol)| ManifestEntry::text(file, symbol)));

        Self { generator_min_version: None, entries }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, GeneratorError> {
        let content = fs::read_to_string(path).map_err(|source| GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ManifestFile = serde_json::from_str(&content)?;
        Ok(Self::from(file))
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn binaries(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter().filter(|e| e.kind == ResourceKind::Binary)
    }

    pub fn strings(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter().filter(|e| e.kind == ResourceKind::Text)
    }

    pub fn get_by_symbol(&self, symbol: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<ManifestFile> for Manifest {
    fn from(file: ManifestFile) -> Self {
        let mut manifest = Self::from_mappings(file.binary, file.strings);
        manifest.generator_min_version = file.generator_min_version;
        manifest
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_binaries_come_first() {
        let manifest = Manifest::builtin();
        let kinds: Vec<_> = manifest.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ResourceKind::Binary, ResourceKind::Text, ResourceKind::Text]);
        assert_eq!(manifest.get_by_symbol("MAIN_TEXTURE").unwrap().file, "cards.png");
    }

    #[test]
    fn test_manifest_file_parses() {
        let json = r#"{
            "generatorMinVersion": "1.0.0",
            "binary": {"logo.png": "LOGO"},
            "strings": {"b.glsl": "B_SHADER", "a.glsl": "A_SHADER"}
        }"#;
        let file: ManifestFile = serde_json::from_str(json).unwrap();
        let manifest = Manifest::from(file);

        assert_eq!(manifest.generator_min_version.as_deref(), Some("1.0.0"));
        assert_eq!(manifest.binaries().count(), 1);
        let strings: Vec<_> = manifest.strings().map(|e| e.symbol.as_str()).collect();
        assert_eq!(strings, vec!["A_SHADER", "B_SHADER"]);
    }

    #[test]
    fn test_unknown_section_rejected() {
        let json = r#"{"binary": {"logo.png": "LOGO"}, "string": {"a.glsl": "A_SHADER"}}"#;
        let err = serde_json::from_str::<ManifestFile>(json).unwrap_err();
        assert!(err.to_string().contains("unknown field `string`"));
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let file: ManifestFile = serde_json::from_str("{}").unwrap();
        assert!(Manifest::from(file).is_empty());
    }
}
