mod executor;
mod name_builder;
mod planner;
mod types;

pub use executor::{
    apply_operation, execute_plan, rename_path, unlock_tree, ExecuteOptions, ExecutionReport,
    Failure, OperationError,
};
pub use name_builder::{build_episode_name, build_season_folder_name, clean_title};
pub use planner::build_plan;
pub use types::{Operation, Plan, SeasonGroup, SkipReason, Skipped};
