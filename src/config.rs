//! Generator configuration: where resources live and where output goes.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::pipeline::GeneratorError;
use crate::ENGINE_VERSION;

pub const MASTER_HEADER: &str = "resources_gen.h";
pub const SIZE_SUFFIX: &str = "_SIZE";
pub const SOURCE_EXTENSION: &str = "c";

#[derive(Debug, Clone, Serialize)]
pub struct GeneratorConfig {
    /// Directory holding every file named in the manifest.
    pub resource_dir: PathBuf,
    /// Directory owned by the generator. Emptied on every run.
    pub output_dir: PathBuf,
    pub header_name: String,
    pub size_suffix: String,
    pub source_extension: String,
}

impl GeneratorConfig {
    /// Standard layout: `<root>/res` in, `<root>/src/generated` out.
    pub fn for_root(root: &Path) -> Self {
        Self::new(root.join("res"), root.join("src").join("generated"))
    }

    pub fn new(resource_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            output_dir: output_dir.into(),
            header_name: MASTER_HEADER.to_string(),
            size_suffix: SIZE_SUFFIX.to_string(),
            source_extension: SOURCE_EXTENSION.to_string(),
        }
    }

    pub fn header_path(&self) -> PathBuf {
        self.output_dir.join(&self.header_name)
    }

    /// `cards.png` -> `<output_dir>/cards.png.c`
    pub fn source_path(&self, file: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", file, self.source_extension))
    }

    pub fn resource_path(&self, file: &str) -> PathBuf {
        self.resource_dir.join(file)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::for_root(Path::new("."))
    }
}

/// Refuse to run a manifest that needs a newer generator.
pub fn check_generator_version(required: Option<&str>) -> Result<(), GeneratorError> {
    let Some(required) = required else {
        return Ok(());
    };

    let current = semver::Version::parse(ENGINE_VERSION)
        .map_err(|_| GeneratorError::InvalidManifest("Invalid generator version".into()))?;
    let min = semver::Version::parse(required).map_err(|_| {
        GeneratorError::InvalidManifest(format!("Invalid generatorMinVersion '{}'", required))
    })?;

    if current < min {
        return Err(GeneratorError::VersionMismatch(
            required.to_string(),
            ENGINE_VERSION.to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_layout() {
        let config = GeneratorConfig::for_root(Path::new("/proj"));
        assert_eq!(config.resource_path("cards.png"), Path::new("/proj/res/cards.png"));
        assert_eq!(config.source_path("cards.png"), Path::new("/proj/src/generated/cards.png.c"));
        assert_eq!(config.header_path(), Path::new("/proj/src/generated/resources_gen.h"));
    }

    #[test]
    fn test_version_gate() {
        assert!(check_generator_version(None).is_ok());
        assert!(check_generator_version(Some("0.1.0")).is_ok());
        assert!(check_generator_version(Some(ENGINE_VERSION)).is_ok());

        let err = check_generator_version(Some("99.0.0")).unwrap_err();
        assert!(matches!(err, GeneratorError::VersionMismatch(..)));

        let err = check_generator_version(Some("not-a-version")).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidManifest(_)));
    }
}
