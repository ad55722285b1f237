pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod output;
pub mod parser;
pub mod progress;
pub mod prompt;
pub mod rename;
pub mod restore;
pub mod scanner;
pub mod validator;

pub use config::{CleanupOptions, Config};
pub use error::{AppError, ExitCode};
pub use history::{read_change_log, write_change_log, ChangeLog, HistoryError, RenameRecord};
pub use parser::{extract_episode_number, parse_season_folder, EpisodeMatch, SeasonFolder};
pub use rename::{
    build_episode_name, build_plan, build_season_folder_name, clean_title, execute_plan,
    ExecuteOptions, ExecutionReport, Operation, Plan, SkipReason,
};
pub use restore::{restore_from_log, RestoreOptions, RestoreResult};
pub use scanner::{DirectoryListing, FsListing, MemoryTree, ScannerError};
pub use validator::{find_collisions, Collision};
