//! Hierarchy data source service
//!
//! Loads record sets from JSON or TOML files through the filesystem boundary.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::RecordSet;
use crate::infrastructure::traits::FileSystem;

/// File formats a record set can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `{ "<id>": { "name": .., "parent": .., "type": .. } }`
    Json,
    /// One table per identifier: `["<id>"]` with `name`, `parent`, `type`
    Toml,
}

impl SourceFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Service for reading hierarchy records from files.
pub struct HierarchyService {
    fs: Arc<dyn FileSystem>,
}

impl HierarchyService {
    /// Create a new hierarchy service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load the record set stored at `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<RecordSet> {
        let format = SourceFormat::from_path(path)
            .ok_or_else(|| ApplicationError::UnsupportedFormat(path.to_path_buf()))?;
        if !self.fs.is_file(path) {
            return Err(ApplicationError::SourceNotFound(path.to_path_buf()));
        }

        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read hierarchy", path)?;

        let records = Self::parse(&content, format, path)?;
        debug!("loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Parse `content` in the given format; `path` is only used for errors.
    pub fn parse(content: &str, format: SourceFormat, path: &Path) -> ApplicationResult<RecordSet> {
        let parse_err = |message: String| ApplicationError::Parse {
            path: path.to_path_buf(),
            message,
        };
        match format {
            SourceFormat::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
            SourceFormat::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_extensions_when_detecting_format_then_maps_known_ones() {
        assert_eq!(SourceFormat::from_path(Path::new("a.json")), Some(SourceFormat::Json));
        assert_eq!(SourceFormat::from_path(Path::new("a.toml")), Some(SourceFormat::Toml));
        assert_eq!(SourceFormat::from_path(Path::new("a.yaml")), None);
        assert_eq!(SourceFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn given_record_without_type_when_parsing_then_reports_path() {
        let err = HierarchyService::parse(
            r#"{"0": {"name": "x", "parent": "-1"}}"#,
            SourceFormat::Json,
            &PathBuf::from("broken.json"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
