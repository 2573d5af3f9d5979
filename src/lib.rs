pub mod error;
pub mod models;
pub mod notify;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use error::SetupError;
pub use models::{AliasTable, SetupFile};
pub use notify::{ConsoleNotifier, Notifier, Severity};
pub use services::{
    collect_setup_files, copy_setup_files, discover_setup_folders, FolderDiscoveryConfig,
    SetupCopyConfig, SetupCopyReport, SetupFolder,
};

// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub setup_copy: SetupCopyConfig,
    pub folder_discovery: FolderDiscoveryConfig,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            setup_copy: SetupCopyConfig::default(),
            folder_discovery: FolderDiscoveryConfig::default(),
            log_level: "info".to_string(),
        }
    }
}
