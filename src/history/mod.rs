mod reader;
mod types;
mod writer;

pub use reader::read_change_log;
pub use types::*;
pub use writer::{write_change_log, HistoryError};
