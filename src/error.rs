use std::path::PathBuf;

/// Error conditions raised while matching and copying setup files.
///
/// Only `DirectoryNotFound` is fatal to a run; every other variant is
/// recorded per file and the batch keeps going.
#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    #[error("setups directory not found at: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("invalid filename format for {file}: expected <prefix>_<series>_<carcode>_*.sto")]
    InvalidFilenameFormat { file: String },

    #[error("no matching folder found for car code '{car_code}' in {file}")]
    NoMatchingFolder { car_code: String, file: String },

    #[error("error copying {file}: {cause}")]
    CopyFailure { file: String, cause: String },

    #[error("failed to load alias table {}: {cause}", .path.display())]
    AliasTable { path: PathBuf, cause: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SetupError {
    /// Per-file errors are accumulated in the report; anything else
    /// aborts the run before any file is touched.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            SetupError::InvalidFilenameFormat { .. }
                | SetupError::NoMatchingFolder { .. }
                | SetupError::CopyFailure { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SetupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_file_classification() {
        let invalid = SetupError::InvalidFilenameFormat {
            file: "bad.sto".into(),
        };
        let no_match = SetupError::NoMatchingFolder {
            car_code: "unknowncar".into(),
            file: "VRS_25S1DS_unknowncar_C.sto".into(),
        };
        let copy = SetupError::CopyFailure {
            file: "a.sto".into(),
            cause: "disk full".into(),
        };
        let fatal = SetupError::DirectoryNotFound(PathBuf::from("/nowhere/setups"));

        assert!(invalid.is_per_file());
        assert!(no_match.is_per_file());
        assert!(copy.is_per_file());
        assert!(!fatal.is_per_file());
    }

    #[test]
    fn test_messages_name_the_offending_file() {
        let e = SetupError::NoMatchingFolder {
            car_code: "unknowncar".into(),
            file: "VRS_25S1DS_unknowncar_C.sto".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("unknowncar"));
        assert!(msg.contains("VRS_25S1DS_unknowncar_C.sto"));

        let e = SetupError::CopyFailure {
            file: "a.sto".into(),
            cause: "disk full".into(),
        };
        assert!(e.to_string().contains("disk full"));
    }
}
