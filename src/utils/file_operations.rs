use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// List files in a directory whose extension matches the given suffix
/// (case-insensitive), sorted by file name for a stable processing order.
pub fn list_files_with_extension<P: AsRef<Path>>(
    directory: P,
    extension: &str,
) -> Result<Vec<PathBuf>> {
    let dir_path = directory.as_ref();

    let entries = fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read directory: {:?}", dir_path))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| matches_extension(path, extension))
        .collect();

    files.sort();

    Ok(files)
}

/// List immediate subdirectories of a directory, non-recursive.
///
/// Order is whatever the filesystem reports; callers must not rely on it
/// being stable.
pub fn list_subdirectories<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>> {
    let dir_path = directory.as_ref();

    let entries = fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read directory: {:?}", dir_path))?;

    let folders: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();

    Ok(folders)
}

/// Check if a file matches the given extension
/// Pure function
fn matches_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_with_dot = format!(".{}", ext);
            extension.eq_ignore_ascii_case(&ext_with_dot) || extension.eq_ignore_ascii_case(ext)
        })
        .unwrap_or(false)
}

/// Copy a file into the destination path, overwriting any existing file
/// and carrying the source modification time onto the copy.
pub fn copy_file_preserving_mtime<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
) -> Result<()> {
    let src_path = source.as_ref();
    let dest_path = destination.as_ref();

    let metadata = fs::metadata(src_path)
        .with_context(|| format!("Failed to read metadata for: {:?}", src_path))?;

    fs::copy(src_path, dest_path)
        .with_context(|| format!("Failed to copy file from {:?} to {:?}", src_path, dest_path))?;

    if let Ok(modified) = metadata.modified() {
        let dest_file = fs::OpenOptions::new()
            .write(true)
            .open(dest_path)
            .with_context(|| format!("Failed to open copied file: {:?}", dest_path))?;
        dest_file
            .set_modified(modified)
            .with_context(|| format!("Failed to set modification time on: {:?}", dest_path))?;
    }

    Ok(())
}

/// Last path component as a plain string, used for folder and file names
/// in reports.
pub fn path_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
