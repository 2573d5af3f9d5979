pub mod alias_table;
pub mod setup_file;

pub use alias_table::AliasTable;
pub use setup_file::{extract_car_code, SetupFile};
