use crate::error::SetupError;
use crate::utils::{list_subdirectories, path_file_name};
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for setup-folder discovery
#[derive(Debug, Clone)]
pub struct FolderDiscoveryConfig {
    pub setups_dir: PathBuf,
}

impl Default for FolderDiscoveryConfig {
    fn default() -> Self {
        Self {
            setups_dir: default_setups_dir(),
        }
    }
}

/// Default location of the per-vehicle setup folders inside the
/// simulator's user data directory.
pub fn default_setups_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("iRacing")
        .join("setups")
}

/// A per-vehicle destination folder inside the setups directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupFolder {
    path: PathBuf,
    name: String,
}

impl SetupFolder {
    pub fn new(path: PathBuf) -> Self {
        let name = path_file_name(&path);
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name, the string the car code is matched against.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Enumerate the per-vehicle folders under the setups directory.
///
/// The directory must already exist; its absence is fatal and aborts the
/// run before any file is touched. Folder order is filesystem-dependent.
pub fn discover_setup_folders(
    config: &FolderDiscoveryConfig,
) -> Result<Vec<SetupFolder>, SetupError> {
    let setups_dir = &config.setups_dir;

    if !setups_dir.exists() {
        return Err(SetupError::DirectoryNotFound(setups_dir.clone()));
    }

    let folders: Vec<SetupFolder> = list_subdirectories(setups_dir)
        .map_err(|e| SetupError::Io(std::io::Error::other(e.to_string())))?
        .into_iter()
        .map(SetupFolder::new)
        .collect();

    info!("Found {} setup folders in {}", folders.len(), setups_dir.display());
    for folder in &folders {
        info!("- {}", folder.name());
    }

    Ok(folders)
}
