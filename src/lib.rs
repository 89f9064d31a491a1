//! ResGen Core - Resource Embedder
//!
//! Converts resource files into C source arrays plus one master header,
//! so a native build can link resources straight into the binary.
//!
//! # Run Contract
//! 1. The manifest is checked before anything is written
//! 2. The output directory is owned: emptied, then repopulated
//! 3. Text resources are NUL-terminated, binaries are byte-exact
//! 4. Binary sizes in the header equal the on-disk length
//! 5. Same inputs produce byte-identical output

pub mod manifest;
pub mod config;
pub mod validation;
pub mod cleaner;
pub mod emitter;
pub mod header;
pub mod hashing;
pub mod pipeline;

pub use manifest::{Manifest, ManifestEntry, ManifestFile, ResourceKind};
pub use config::{GeneratorConfig, MASTER_HEADER, SIZE_SUFFIX};
pub use validation::{ManifestRule, ManifestViolation, ValidationResult, ViolationSeverity};
pub use cleaner::clean_output_dir;
pub use emitter::{decode_array, emit_resource, render_array, EmittedResource};
pub use header::{render_header, SizeTable};
pub use hashing::sha256_hex;
pub use pipeline::{Drift, GenerationPipeline, GenerationReport, GeneratorError, VerifyReport};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
