pub mod file_operations;

pub use file_operations::{
    copy_file_preserving_mtime, list_files_with_extension, list_subdirectories, path_file_name,
};
