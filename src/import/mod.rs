use std::path::Path;

use crate::error::ImportError;
use crate::models::Climb;

pub mod gpx;

pub use self::gpx::GpxProfileImporter;

/// Trait for building climbs from route files of different formats
pub trait ProfileImporter {
    /// Check if this importer can handle the given file
    fn can_import(&self, file_path: &Path) -> bool;

    /// Build a profiled climb from the file
    fn import_file(&self, file_path: &Path) -> Result<Climb, ImportError>;

    /// Get the format name for this importer
    fn format_name(&self) -> &'static str;
}

/// Dispatches route files to the first importer that accepts them
pub struct ImportManager {
    importers: Vec<Box<dyn ProfileImporter>>,
}

impl Default for ImportManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportManager {
    /// Create a new import manager with all available importers
    pub fn new() -> Self {
        Self::with_spacing(gpx::DEFAULT_SPACING_KM)
    }

    /// Import manager whose importers resample at `spacing_km`
    pub fn with_spacing(spacing_km: f64) -> Self {
        let importers: Vec<Box<dyn ProfileImporter>> =
            vec![Box::new(GpxProfileImporter::new().with_spacing(spacing_km))];
        Self { importers }
    }

    pub fn supported_formats(&self) -> Vec<&'static str> {
        self.importers.iter().map(|i| i.format_name()).collect()
    }

    /// Import a single file, picking the importer by file type
    pub fn import_file(&self, file_path: &Path) -> Result<Climb, ImportError> {
        let importer = self
            .importers
            .iter()
            .find(|importer| importer.can_import(file_path))
            .ok_or_else(|| ImportError::UnsupportedFormat {
                path: file_path.to_path_buf(),
            })?;

        tracing::debug!(
            path = %file_path.display(),
            format = importer.format_name(),
            "Importing route file"
        );
        importer.import_file(file_path)
    }
}
