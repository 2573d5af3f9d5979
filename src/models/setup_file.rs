use crate::error::SetupError;
use std::path::{Path, PathBuf};

/// A setup file found in the source directory.
///
/// The file name follows the delimited convention
/// `<prefix>_<series>_<carcode>_*.sto`; the third underscore-separated
/// segment of the stem identifies the vehicle the setup belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupFile {
    path: PathBuf,
}

impl SetupFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name including extension, as shown in reports.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Stem without the extension, the part the car code is parsed from.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Extract the car code for this file.
    pub fn car_code(&self) -> Result<String, SetupError> {
        extract_car_code(&self.stem()).ok_or_else(|| SetupError::InvalidFilenameFormat {
            file: self.file_name(),
        })
    }
}

impl From<PathBuf> for SetupFile {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

/// Pure function to extract the car code from a filename stem.
///
/// The code is the third `_`-separated segment, lower-cased. Returns
/// `None` when the stem has fewer than three segments.
pub fn extract_car_code(stem: &str) -> Option<String> {
    stem.split('_').nth(2).map(|code| code.to_lowercase())
}
