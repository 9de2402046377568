pub mod assertions;

pub use logging::init_logger;
pub use test_table::{TestTable, TICK};
