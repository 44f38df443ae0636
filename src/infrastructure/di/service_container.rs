//! Service container for dependency injection
//!
//! Wires up services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::sample::sample_records;
use crate::application::services::HierarchyService;
use crate::application::{ApplicationError, HierarchySession, TreeRenderer};
use crate::config::Settings;
use crate::domain::{ExpansionPolicy, RecordSet};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub hierarchy: HierarchyService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let hierarchy = HierarchyService::new(Arc::clone(&fs));

        Self {
            settings,
            fs,
            hierarchy,
        }
    }

    /// Records from `file`, the built-in sample, or the configured source,
    /// in that order of preference.
    pub fn load_records(&self, file: Option<&Path>, sample: bool) -> InfraResult<RecordSet> {
        if sample {
            debug!("using built-in sample");
            return Ok(sample_records());
        }
        let path = file
            .or(self.settings.source.as_deref())
            .ok_or(ApplicationError::NoSource)?;
        Ok(self.hierarchy.load(path)?)
    }

    /// Session over `records` using the configured policy and sentinel.
    pub fn session(&self, records: RecordSet) -> HierarchySession {
        let policy = ExpansionPolicy {
            expand_depth: self.settings.expand_depth,
        };
        HierarchySession::with_sentinel(records, policy, self.settings.sentinel.clone())
    }

    pub fn renderer(&self, no_color: bool) -> TreeRenderer {
        TreeRenderer::new(self.settings.color && !no_color)
    }
}
