use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::export::{ExportFormat, PlanExporter};
use crate::models::EditorialPlan;

pub const DEFAULT_FILE_STEM: &str = "piano_editoriale_local_seo";

/// `piano_editoriale_local_seo.<ext>` in the current directory.
pub fn default_output_path(format: ExportFormat) -> PathBuf {
    PathBuf::from(format!("{}.{}", DEFAULT_FILE_STEM, format.extension()))
}

/// Write the plan to `path` in the requested format
pub fn save_plan(plan: &EditorialPlan, path: &Path, format: ExportFormat) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let bytes = match format {
        ExportFormat::Xlsx => PlanExporter::generate_xlsx(plan)?,
        ExportFormat::Csv => PlanExporter::generate_csv(plan).into_bytes(),
    };

    fs::write(path, bytes)
        .with_context(|| format!("Failed to write plan file: {}", path.display()))?;

    Ok(path.to_path_buf())
}
