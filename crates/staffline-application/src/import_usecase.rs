//! Bulk import of CSV and Excel files.

use staffline_core::gateway::{ImportGateway, ImportSummary};
use staffline_core::overlay::EntityKind;
use staffline_core::{Result, StafflineError};
use std::path::Path;
use std::sync::Arc;

/// File extensions the import endpoints understand.
pub const IMPORT_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

pub struct ImportUseCase {
    importer: Arc<dyn ImportGateway>,
}

impl ImportUseCase {
    pub fn new(importer: Arc<dyn ImportGateway>) -> Self {
        Self { importer }
    }

    /// Uploads `path` to the import endpoint for `kind`.
    ///
    /// The kind and the file extension are checked before the file is read.
    /// Row-level problems come back in [`ImportSummary::errors`], not as an
    /// `Err`.
    pub async fn import(&self, kind: EntityKind, path: &Path) -> Result<ImportSummary> {
        if !kind.supports_import() {
            return Err(StafflineError::unsupported(format!(
                "{} cannot be imported",
                kind.collection()
            )));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !IMPORT_EXTENSIONS.contains(&extension.as_str()) {
            return Err(StafflineError::validation(
                "Please select a CSV or Excel file",
            ));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let bytes = tokio::fs::read(path).await?;

        tracing::info!(
            "Importing {} from {} ({} bytes)",
            kind.collection(),
            file_name,
            bytes.len()
        );
        let summary = self.importer.import(kind, &file_name, bytes).await?;
        tracing::info!(
            "Import finished: {} imported, {} skipped, {} errors",
            summary.imported,
            summary.skipped,
            summary.errors.len()
        );
        Ok(summary)
    }
}
