use crate::error::{PriceError, Result};
use crate::models::material::{MaterialFile, PDF_MIME};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Native document picker, limited to a single PDF.
pub trait FilePicker {
    /// `Err(PriceError::PickCancelled)` when the user backs out.
    fn pick_pdf(&self) -> Result<MaterialFile>;
}

/// Runs the picker and folds cancellation into `None`. Any other failure
/// is returned so the caller can alert.
pub fn pick_material(picker: &dyn FilePicker) -> Result<Option<MaterialFile>> {
    match picker.pick_pdf() {
        Ok(file) => {
            debug!("Picked {} ({:?} bytes)", file.upload_name(), file.file_size);
            Ok(Some(file))
        }
        Err(PriceError::PickCancelled) => {
            debug!("File selection cancelled");
            Ok(None)
        }
        Err(e) => {
            warn!("File selection failed: {}", e);
            Err(e)
        }
    }
}

/// Picker backed by a path typed at the terminal. A blank path cancels.
#[derive(Debug, Clone)]
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(input: &str) -> Self {
        let input = input.trim();
        Self {
            path: (!input.is_empty()).then(|| PathBuf::from(input)),
        }
    }
}

impl FilePicker for PathPicker {
    fn pick_pdf(&self) -> Result<MaterialFile> {
        let path = self.path.as_deref().ok_or(PriceError::PickCancelled)?;
        if !is_pdf(path) {
            return Err(PriceError::UnsupportedFile(format!(
                "{} is not a PDF",
                path.display()
            )));
        }
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(PriceError::UnsupportedFile(format!(
                "{} is not a file",
                path.display()
            )));
        }
        let absolute = std::fs::canonicalize(path)?;
        Ok(MaterialFile {
            uri: format!("file://{}", absolute.display()),
            file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            mime_type: Some(PDF_MIME.to_string()),
            file_size: Some(metadata.len()),
        })
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
