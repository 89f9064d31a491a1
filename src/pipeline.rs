//! Generation Pipeline - Single Entry Point
//!
//! validate -> clean -> emit every resource -> write the master header.
//! The first failure stops the run; output already written stays in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::cleaner::clean_output_dir;
use crate::config::{check_generator_version, GeneratorConfig};
use crate::emitter::{decode_array, embedded_bytes, emit_resource, render_array, EmittedResource};
use crate::hashing::sha256_hex;
use crate::header::{render_header, write_header, SizeTable};
use crate::manifest::{Manifest, ResourceKind};
use crate::validation::{ValidationResult, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Sorry, {} is not a file!", .0.display())]
    MissingResource(PathBuf),

    #[error("Failed to clean {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Manifest requires generator >= {0}, current is {1}")]
    VersionMismatch(String, String),

    #[error("Malformed generated source: {0}")]
    MalformedSource(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub engine_version: String,
    pub generated_at: DateTime<Utc>,
    pub output_dir: PathBuf,
    pub removed: Vec<PathBuf>,
    pub resources: Vec<EmittedResource>,
    pub sizes: SizeTable,
    pub header: PathBuf,
    pub header_hash: String,
    pub validation: ValidationResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Drift {
    /// An expected generated file does not exist.
    Missing { path: PathBuf },
    /// A generated file decodes to different bytes than its resource.
    ContentChanged { path: PathBuf },
    /// Same bytes, different text (symbol, layout or header).
    TextChanged { path: PathBuf },
    /// A file the current manifest would not produce.
    Stale { path: PathBuf },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    pub up_to_date: bool,
    pub checked: usize,
    pub drift: Vec<Drift>,
}

/// The generation pipeline - owns the manifest and the output layout
pub struct GenerationPipeline {
    manifest: Manifest,
    config: GeneratorConfig,
    validator: Validator,
}

impl GenerationPipeline {
    pub fn new(manifest: Manifest, config: GeneratorConfig) -> Self {
        Self {
            manifest,
            config,
            validator: Validator::new(),
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Check the manifest without touching the filesystem.
    ///
    /// Any error-severity violation is fatal.
    pub fn validate_manifest(&self) -> Result<ValidationResult, GeneratorError> {
        check_generator_version(self.manifest.generator_min_version.as_deref())?;

        let validation = self.validator.validate(&self.manifest, &self.config);
        for v in &validation.violations {
            warn!(rule = %v.rule, "{}", v.message);
        }
        if !validation.valid {
            return Err(GeneratorError::InvalidManifest(validation.error_summary()));
        }
        Ok(validation)
    }

    /// Clean the output directory and regenerate everything.
    pub fn run(&self) -> Result<GenerationReport, GeneratorError> {
        let validation = self.validate_manifest()?;

        let removed = clean_output_dir(&self.config.output_dir)?;

        let mut sizes = SizeTable::new();
        let mut resources = Vec::with_capacity(self.manifest.len());
        for entry in self.manifest.entries() {
            let emitted = emit_resource(entry, &self.config)?;
            if emitted.kind == ResourceKind::Binary {
                sizes.record(&emitted.symbol, emitted.size);
            }
            resources.push(emitted);
        }

        let (header, content) = write_header(self.string_symbols(), &sizes, &self.config)?;
        info!(resources = resources.len(), "Generated {}", self.config.output_dir.display());

        Ok(GenerationReport {
            engine_version: ENGINE_VERSION.to_string(),
            generated_at: Utc::now(),
            output_dir: self.config.output_dir.clone(),
            removed,
            resources,
            sizes,
            header,
            header_hash: sha256_hex(content.as_bytes()),
            validation,
        })
    }

    /// Compare the output directory against what `run` would produce.
    ///
    /// Writes nothing. A missing resource file is still fatal.
    pub fn verify(&self) -> Result<VerifyReport, GeneratorError> {
        self.validate_manifest()?;

        let mut drift = vec![];
        let mut expected = BTreeSet::new();
        let mut sizes = SizeTable::new();

        for entry in self.manifest.entries() {
            let input = self.config.resource_path(&entry.file);
            if !input.is_file() {
                return Err(GeneratorError::MissingResource(input));
            }
            let content = fs::read(&input).map_err(|source| GeneratorError::Io {
                path: input.clone(),
                source,
            })?;
            if entry.kind == ResourceKind::Binary {
                sizes.record(&entry.symbol, content.len());
            }

            let bytes = embedded_bytes(content, entry.kind);
            let path = self.config.source_path(&entry.file);
            expected.insert(path.clone());

            match read_generated(&path)? {
                None => drift.push(Drift::Missing { path }),
                Some(text) if text == render_array(&entry.symbol, &bytes) => {}
                Some(text) => match decode_array(&text) {
                    Ok(decoded) if decoded == bytes => drift.push(Drift::TextChanged { path }),
                    _ => drift.push(Drift::ContentChanged { path }),
                },
            }
        }

        let header_path = self.config.header_path();
        expected.insert(header_path.clone());
        let header = render_header(self.string_symbols(), &sizes, &self.config.size_suffix);
        match read_generated(&header_path)? {
            None => drift.push(Drift::Missing { path: header_path }),
            Some(text) if text == header => {}
            Some(_) => drift.push(Drift::TextChanged { path: header_path }),
        }

        drift.extend(self.stale_files(&expected)?.into_iter().map(|path| Drift::Stale { path }));

        Ok(VerifyReport {
            up_to_date: drift.is_empty(),
            checked: expected.len(),
            drift,
        })
    }

    /// Regular files in the output directory the manifest would not produce.
    fn stale_files(&self, expected: &BTreeSet<PathBuf>) -> Result<Vec<PathBuf>, GeneratorError> {
        let dir = &self.config.output_dir;
        let io_err = |source: std::io::Error| GeneratorError::Io { path: dir.clone(), source };

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(io_err(e)),
        };

        let mut stale = vec![];
        for entry in entries {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && !expected.contains(&path) {
                stale.push(path);
            }
        }
        stale.sort();
        Ok(stale)
    }

    fn string_symbols(&self) -> impl Iterator<Item = &str> {
        self.manifest.strings().map(|e| e.symbol.as_str())
    }
}

/// Contents of a generated file, `None` if it does not exist.
///
/// Bytes that are not UTF-8 come back lossily decoded so they show up as drift.
fn read_generated(path: &Path) -> Result<Option<String>, GeneratorError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl Default for GenerationPipeline {
    fn default() -> Self {
        Self::new(Manifest::builtin(), GeneratorConfig::default())
    }
}
