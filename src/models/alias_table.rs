use crate::error::SetupError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Mapping from car code to canonical setup-folder name, loaded from a
/// flat JSON object (`{"code": "FolderName", ...}`).
///
/// Lookups are case-insensitive. Canonical folder names are also entered
/// as keys so a file that already carries the canonical name resolves
/// without a dedicated alias entry.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

/// Raw on-disk shape of the alias file.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct RawAliasTable(HashMap<String, String>);

impl AliasTable {
    /// Load the alias table from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SetupError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| SetupError::AliasTable {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;

        let raw: RawAliasTable =
            serde_json::from_str(&content).map_err(|e| SetupError::AliasTable {
                path: path.to_path_buf(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_entries(raw.0))
    }

    /// Load the alias table, tolerating an absent file.
    ///
    /// A missing file means no table and matching falls back to folder-name
    /// comparison; a present but unreadable or malformed file is logged as
    /// a warning and treated the same way.
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("No alias table at {}, using folder-name matching only", path.display());
            return None;
        }

        match Self::load(path) {
            Ok(table) => {
                info!("Loaded {} alias entries from {}", table.len(), path.display());
                Some(table)
            }
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    /// Build the lookup map: canonical values first, then explicit keys,
    /// so an alias entry overrides a same-named canonical.
    fn from_entries(raw: HashMap<String, String>) -> Self {
        let mut entries = HashMap::with_capacity(raw.len() * 2);

        for canonical in raw.values() {
            entries.insert(canonical.to_lowercase(), canonical.clone());
        }
        for (code, canonical) in &raw {
            if !code.is_empty() {
                entries.insert(code.to_lowercase(), canonical.clone());
            }
        }

        Self { entries }
    }

    /// Canonical folder name for a car code, if the table knows it.
    pub fn resolve(&self, car_code: &str) -> Option<&str> {
        self.entries.get(&car_code.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
