//! Manifest Validation - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Policy decides whether the run may touch the output directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::GeneratorConfig;
use crate::manifest::{Manifest, ResourceKind};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ManifestViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    /// One-line summary of all errors, for fatal reporting.
    pub fn error_summary(&self) -> String {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
            .map(|v| format!("{}: {}", v.rule, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validation rule trait - produces violations
pub trait ManifestRule {
    fn name(&self) -> &'static str;
    fn validate(&self, manifest: &Manifest, config: &GeneratorConfig) -> Vec<ManifestViolation>;
}

fn error(rule: &dyn ManifestRule, message: String, remediation: &str) -> ManifestViolation {
    ManifestViolation {
        rule: rule.name().to_string(),
        severity: ViolationSeverity::Error,
        message,
        remediation: vec![remediation.to_string()],
    }
}

// --- Concrete Rules ---

pub struct UniqueSymbolRule;

impl ManifestRule for UniqueSymbolRule {
    fn name(&self) -> &'static str { "unique_symbol" }

    fn validate(&self, manifest: &Manifest, _config: &GeneratorConfig) -> Vec<ManifestViolation> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        let mut violations = vec![];

        for entry in manifest.entries() {
            if let Some(first) = seen.insert(&entry.symbol, &entry.file) {
                violations.push(error(
                    self,
                    format!("Symbol {} used by both {} and {}", entry.symbol, first, entry.file),
                    "Give every resource its own symbol name",
                ));
            }
        }
        violations
    }
}

pub struct UniqueFileRule;

impl ManifestRule for UniqueFileRule {
    fn name(&self) -> &'static str { "unique_file" }

    fn validate(&self, manifest: &Manifest, _config: &GeneratorConfig) -> Vec<ManifestViolation> {
        let mut seen: HashMap<&str, ResourceKind> = HashMap::new();
        let mut violations = vec![];

        for entry in manifest.entries() {
            if seen.insert(&entry.file, entry.kind).is_some() {
                violations.push(error(
                    self,
                    format!("{} is listed more than once", entry.file),
                    "List each resource file once, as either binary or text",
                ));
            }
        }
        violations
    }
}

pub struct SymbolIdentifierRule;

pub fn is_c_identifier(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

impl ManifestRule for SymbolIdentifierRule {
    fn name(&self) -> &'static str { "symbol_identifier" }

    fn validate(&self, manifest: &Manifest, _config: &GeneratorConfig) -> Vec<ManifestViolation> {
        manifest
            .entries()
            .iter()
            .filter(|e| !is_c_identifier(&e.symbol))
            .map(|e| {
                error(
                    self,
                    format!("'{}' ({}) is not a valid C identifier", e.symbol, e.file),
                    "Use letters, digits and underscores, not starting with a digit",
                )
            })
            .collect()
    }
}

/// `<binary symbol><suffix>` must not shadow another symbol.
pub struct SizeSymbolCollisionRule;

impl ManifestRule for SizeSymbolCollisionRule {
    fn name(&self) -> &'static str { "size_symbol_collision" }

    fn validate(&self, manifest: &Manifest, config: &GeneratorConfig) -> Vec<ManifestViolation> {
        manifest
            .binaries()
            .filter_map(|e| {
                let size_symbol = format!("{}{}", e.symbol, config.size_suffix);
                manifest.get_by_symbol(&size_symbol).map(|other| {
                    error(
                        self,
                        format!(
                            "Size constant {} collides with the symbol of {}",
                            size_symbol, other.file
                        ),
                        "Rename one of the resources",
                    )
                })
            })
            .collect()
    }
}

/// Generated files must land directly inside the output directory.
pub struct FileNameRule;

impl ManifestRule for FileNameRule {
    fn name(&self) -> &'static str { "file_name" }

    fn validate(&self, manifest: &Manifest, config: &GeneratorConfig) -> Vec<ManifestViolation> {
        let mut violations = vec![];

        for entry in manifest.entries() {
            let file = entry.file.as_str();
            if file.is_empty() || file == "." || file == ".." || file.contains(['/', '\\']) {
                violations.push(error(
                    self,
                    format!("'{}' is not a plain file name", file),
                    "Place the resource directly in the resource directory",
                ));
            } else if format!("{}.{}", file, config.source_extension) == config.header_name {
                violations.push(error(
                    self,
                    format!("{} would overwrite the master header", file),
                    "Rename the resource",
                ));
            }
        }
        violations
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ManifestRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(FileNameRule),
                Box::new(UniqueFileRule),
                Box::new(SymbolIdentifierRule),
                Box::new(UniqueSymbolRule),
                Box::new(SizeSymbolCollisionRule),
            ],
        }
    }

    pub fn validate(&self, manifest: &Manifest, config: &GeneratorConfig) -> ValidationResult {
        let mut violations = vec![];

        for rule in &self.rules {
            violations.extend(rule.validate(manifest, config));
        }

        if manifest.is_empty() {
            violations.push(ManifestViolation {
                rule: "empty_manifest".to_string(),
                severity: ViolationSeverity::Warning,
                message: "Manifest lists no resources".to_string(),
                remediation: vec!["Only the master header will be generated".to_string()],
            });
        }

        // Warnings never block
        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult { valid, violations }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
