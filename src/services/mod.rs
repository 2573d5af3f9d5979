pub mod folder_discovery;
pub mod setup_copy;

pub use folder_discovery::{
    default_setups_dir, discover_setup_folders, FolderDiscoveryConfig, SetupFolder,
};
pub use setup_copy::{
    collect_setup_files, copy_setup_files, resolve_destination, CopiedSetup, SetupCopyConfig,
    SetupCopyReport,
};
