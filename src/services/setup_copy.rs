use crate::error::SetupError;
use crate::models::{AliasTable, SetupFile};
use crate::services::folder_discovery::SetupFolder;
use crate::utils::{copy_file_preserving_mtime, list_files_with_extension};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Configuration for setup-file copying operations
#[derive(Debug, Clone)]
pub struct SetupCopyConfig {
    pub source_dir: PathBuf,
    pub extension: String,
    pub alias_table_path: PathBuf,
    pub dry_run: bool,
}

impl Default for SetupCopyConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            extension: ".sto".to_string(),
            alias_table_path: PathBuf::from("iracing-folders.json"),
            dry_run: false,
        }
    }
}

/// Enumerate setup files in the source directory.
///
/// An empty result is valid; the caller reports it as a warning, not a
/// failure. Files are processed in name order.
pub fn collect_setup_files(config: &SetupCopyConfig) -> Result<Vec<SetupFile>, SetupError> {
    let files: Vec<SetupFile> = list_files_with_extension(&config.source_dir, &config.extension)
        .map_err(|e| SetupError::Io(std::io::Error::other(e.to_string())))?
        .into_iter()
        .map(SetupFile::new)
        .collect();

    info!(
        "Found {} setup files in {}",
        files.len(),
        config.source_dir.display()
    );

    Ok(files)
}

/// Pure function to resolve the destination folder for a car code.
///
/// Priority order: alias-table lookup mapped onto the enumerated folders,
/// then an exact case-insensitive folder-name match, then the first folder
/// containing the code as a substring. The substring fallback follows
/// folder enumeration order, which is filesystem-dependent; when a short
/// code matches several folders the pick is not deterministic and the
/// alias table is the supported disambiguator.
pub fn resolve_destination<'a>(
    car_code: &str,
    folders: &'a [SetupFolder],
    alias_table: Option<&AliasTable>,
) -> Option<&'a SetupFolder> {
    let code = car_code.to_lowercase();

    if let Some(canonical) = alias_table.and_then(|table| table.resolve(&code)) {
        if let Some(folder) = folders
            .iter()
            .find(|folder| folder.name().eq_ignore_ascii_case(canonical))
        {
            return Some(folder);
        }
    }

    if let Some(folder) = folders
        .iter()
        .find(|folder| folder.name().eq_ignore_ascii_case(&code))
    {
        return Some(folder);
    }

    folders
        .iter()
        .find(|folder| folder.name().to_lowercase().contains(&code))
}

/// Copy each setup file into its matched folder.
///
/// Every input file yields exactly one entry in the report, either a copy
/// record or a classified error; a failure on one file never aborts the
/// rest of the batch.
pub fn copy_setup_files(
    config: &SetupCopyConfig,
    folders: &[SetupFolder],
    files: &[SetupFile],
    alias_table: Option<&AliasTable>,
) -> SetupCopyReport {
    let mut copied = Vec::new();
    let mut errors = Vec::new();

    for file in files {
        let car_code = match file.car_code() {
            Ok(code) => code,
            Err(e) => {
                warn!("{e}");
                errors.push(e);
                continue;
            }
        };

        let Some(folder) = resolve_destination(&car_code, folders, alias_table) else {
            let e = SetupError::NoMatchingFolder {
                car_code,
                file: file.file_name(),
            };
            warn!("{e}");
            errors.push(e);
            continue;
        };

        if config.dry_run {
            info!("Would copy {} to {}", file.file_name(), folder.name());
            copied.push(CopiedSetup {
                file: file.file_name(),
                folder: folder.name().to_string(),
            });
            continue;
        }

        let destination = folder.path().join(file.file_name());
        match copy_file_preserving_mtime(file.path(), &destination) {
            Ok(()) => {
                info!("Copied {} to {}", file.file_name(), folder.name());
                copied.push(CopiedSetup {
                    file: file.file_name(),
                    folder: folder.name().to_string(),
                });
            }
            Err(e) => {
                let e = SetupError::CopyFailure {
                    file: file.file_name(),
                    cause: format!("{e:#}"),
                };
                error!("{e}");
                errors.push(e);
            }
        }
    }

    SetupCopyReport { copied, errors }
}

/// Report structure for one copy run
#[derive(Debug)]
pub struct SetupCopyReport {
    pub copied: Vec<CopiedSetup>,
    pub errors: Vec<SetupError>,
}

impl SetupCopyReport {
    pub fn empty() -> Self {
        Self {
            copied: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn total_processed(&self) -> usize {
        self.copied.len() + self.errors.len()
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.total_processed();
        if total == 0 {
            0.0
        } else {
            self.copied.len() as f64 / total as f64
        }
    }
}

/// A successfully placed setup file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedSetup {
    pub file: String,
    pub folder: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn folder(path: &str) -> SetupFolder {
        SetupFolder::new(PathBuf::from(path))
    }

    fn alias(pairs: &[(&str, &str)]) -> AliasTable {
        let raw: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let json = serde_json::to_string(&raw).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.json");
        fs::write(&path, json).unwrap();
        AliasTable::load(&path).unwrap()
    }

    fn make_setups_dir(folder_names: &[&str]) -> (TempDir, Vec<SetupFolder>) {
        let dir = tempfile::tempdir().unwrap();
        let folders = folder_names
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                fs::create_dir(&path).unwrap();
                SetupFolder::new(path)
            })
            .collect();
        (dir, folders)
    }

    fn make_source_dir(file_names: &[&str]) -> (TempDir, Vec<SetupFile>) {
        let dir = tempfile::tempdir().unwrap();
        let files = file_names
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                fs::write(&path, format!("setup data for {name}")).unwrap();
                SetupFile::new(path)
            })
            .collect();
        (dir, files)
    }

    fn config_for(source_dir: &Path) -> SetupCopyConfig {
        SetupCopyConfig {
            source_dir: source_dir.to_path_buf(),
            ..SetupCopyConfig::default()
        }
    }

    #[test]
    fn test_resolve_exact_match_beats_substring() {
        let folders = vec![folder("/s/porsche992gt3cup"), folder("/s/992")];
        let matched = resolve_destination("992", &folders, None).unwrap();
        assert_eq!(matched.name(), "992");
    }

    #[test]
    fn test_resolve_exact_match_case_insensitive() {
        let folders = vec![folder("/s/Porsche992GT3")];
        let matched = resolve_destination("PORSCHE992GT3", &folders, None).unwrap();
        assert_eq!(matched.name(), "Porsche992GT3");
    }

    #[test]
    fn test_resolve_substring_fallback() {
        let folders = vec![folder("/s/ferrarigt3"), folder("/s/porsche992gt3")];
        let matched = resolve_destination("992", &folders, None).unwrap();
        assert_eq!(matched.name(), "porsche992gt3");
    }

    #[test]
    fn test_resolve_alias_beats_substring() {
        // Without the alias, "gt3" would fall through to the substring
        // scan and hit whichever folder comes first.
        let folders = vec![folder("/s/ferrarigt3"), folder("/s/porsche992gt3")];
        let table = alias(&[("gt3", "porsche992gt3")]);
        let matched = resolve_destination("gt3", &folders, Some(&table)).unwrap();
        assert_eq!(matched.name(), "porsche992gt3");
    }

    #[test]
    fn test_resolve_alias_to_missing_folder_falls_back() {
        let folders = vec![folder("/s/porsche992gt3")];
        let table = alias(&[("992", "somedeletedfolder")]);
        let matched = resolve_destination("992", &folders, Some(&table)).unwrap();
        assert_eq!(matched.name(), "porsche992gt3");
    }

    #[test]
    fn test_resolve_no_match() {
        let folders = vec![folder("/s/porsche992gt3")];
        assert!(resolve_destination("unknowncar", &folders, None).is_none());
    }

    #[test]
    fn test_copy_scenario_from_release_batch() {
        let (_setups, folders) = make_setups_dir(&["porsche992gt3", "ferrarigt3"]);
        let (source, files) = make_source_dir(&[
            "VRS_25S1DS_porsche992gt3_A.sto",
            "VRS_25S1DS_ferrarigt3_B.sto",
            "bad.sto",
            "VRS_25S1DS_unknowncar_C.sto",
        ]);

        let report = copy_setup_files(&config_for(source.path()), &folders, &files, None);

        assert_eq!(report.copied.len(), 2);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.total_processed(), files.len());

        assert!(report
            .copied
            .iter()
            .any(|c| c.file == "VRS_25S1DS_porsche992gt3_A.sto" && c.folder == "porsche992gt3"));
        assert!(report
            .copied
            .iter()
            .any(|c| c.file == "VRS_25S1DS_ferrarigt3_B.sto" && c.folder == "ferrarigt3"));

        assert!(report.errors.iter().any(|e| matches!(
            e,
            SetupError::InvalidFilenameFormat { file } if file == "bad.sto"
        )));
        assert!(report.errors.iter().any(|e| matches!(
            e,
            SetupError::NoMatchingFolder { car_code, .. } if car_code == "unknowncar"
        )));

        // The matched files actually landed in their folders.
        for f in &folders {
            if f.name() == "porsche992gt3" {
                assert!(f.path().join("VRS_25S1DS_porsche992gt3_A.sto").is_file());
            }
        }
    }

    #[test]
    fn test_no_matching_folder_writes_nothing() {
        let (setups, folders) = make_setups_dir(&["porsche992gt3"]);
        let (source, files) = make_source_dir(&["VRS_25S1DS_unknowncar_C.sto"]);

        let report = copy_setup_files(&config_for(source.path()), &folders, &files, None);

        assert!(report.copied.is_empty());
        assert_eq!(report.errors.len(), 1);
        let copied_into: Vec<_> = fs::read_dir(setups.path().join("porsche992gt3"))
            .unwrap()
            .collect();
        assert!(copied_into.is_empty());
    }

    #[test]
    fn test_copy_is_idempotent() {
        let (_setups, folders) = make_setups_dir(&["porsche992gt3"]);
        let (source, files) = make_source_dir(&["VRS_25S1DS_porsche992gt3_A.sto"]);
        let config = config_for(source.path());

        let first = copy_setup_files(&config, &folders, &files, None);
        let second = copy_setup_files(&config, &folders, &files, None);

        assert_eq!(first.copied, second.copied);
        assert_eq!(first.errors.len(), second.errors.len());

        let dest = folders[0].path().join("VRS_25S1DS_porsche992gt3_A.sto");
        assert_eq!(
            fs::read(&dest).unwrap(),
            fs::read(files[0].path()).unwrap()
        );
    }

    #[test]
    fn test_copy_overwrites_existing_destination() {
        let (_setups, folders) = make_setups_dir(&["porsche992gt3"]);
        let (source, files) = make_source_dir(&["VRS_25S1DS_porsche992gt3_A.sto"]);
        let dest = folders[0].path().join("VRS_25S1DS_porsche992gt3_A.sto");
        fs::write(&dest, b"stale setup").unwrap();

        let report = copy_setup_files(&config_for(source.path()), &folders, &files, None);

        assert_eq!(report.copied.len(), 1);
        assert_eq!(
            fs::read(&dest).unwrap(),
            fs::read(files[0].path()).unwrap()
        );
    }

    #[test]
    fn test_copy_failure_does_not_abort_batch() {
        let (_setups, folders) = make_setups_dir(&["porsche992gt3", "ferrarigt3"]);
        let (source, files) = make_source_dir(&[
            "VRS_25S1DS_ferrarigt3_B.sto",
            "VRS_25S1DS_porsche992gt3_A.sto",
        ]);
        // A directory squatting on the destination path makes this one
        // copy fail regardless of process privileges.
        fs::create_dir(
            folders[1]
                .path()
                .join("VRS_25S1DS_ferrarigt3_B.sto"),
        )
        .unwrap();

        let report = copy_setup_files(&config_for(source.path()), &folders, &files, None);

        assert_eq!(report.copied.len(), 1);
        assert_eq!(report.copied[0].folder, "porsche992gt3");
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            report.errors[0],
            SetupError::CopyFailure { ref file, .. } if file == "VRS_25S1DS_ferrarigt3_B.sto"
        ));
    }

    #[test]
    fn test_dry_run_records_matches_without_copying() {
        let (_setups, folders) = make_setups_dir(&["porsche992gt3"]);
        let (source, files) = make_source_dir(&["VRS_25S1DS_porsche992gt3_A.sto"]);
        let config = SetupCopyConfig {
            source_dir: source.path().to_path_buf(),
            dry_run: true,
            ..SetupCopyConfig::default()
        };

        let report = copy_setup_files(&config, &folders, &files, None);

        assert_eq!(report.copied.len(), 1);
        assert!(!folders[0]
            .path()
            .join("VRS_25S1DS_porsche992gt3_A.sto")
            .exists());
    }

    #[test]
    fn test_empty_file_set_yields_empty_report() {
        let (_setups, folders) = make_setups_dir(&["porsche992gt3"]);
        let (source, _) = make_source_dir(&[]);

        let report = copy_setup_files(&config_for(source.path()), &folders, &[], None);

        assert_eq!(report.total_processed(), 0);
        assert_eq!(report.success_rate(), 0.0);
    }

    #[test]
    fn test_collect_setup_files_filters_and_sorts() {
        let (source, _) = make_source_dir(&["b_x_code.sto", "a_y_code.STO", "readme.txt"]);
        let config = config_for(source.path());

        let files = collect_setup_files(&config).unwrap();
        let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["a_y_code.STO", "b_x_code.sto"]);
    }
}
