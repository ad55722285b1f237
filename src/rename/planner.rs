use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};

use crate::config::{CleanupOptions, Config};
use crate::parser::{
    extract_episode_number, is_jpg_file, is_nfo_file, is_trickplay, is_trickplay_folder,
    is_video_file, parse_season_folder,
};
use crate::scanner::{walk, DirectoryListing, EntryKind, ScannerError, WalkedDir};

use super::name_builder::{build_episode_name, build_season_folder_name, clean_title};
use super::types::{Operation, Plan, SkipReason};

/// Paths already scheduled for deletion; nothing below them is planned again
#[derive(Debug, Default)]
struct Exclusions {
    files: HashSet<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl Exclusions {
    fn from_plan(plan: &Plan) -> Self {
        let mut exclusions = Self::default();
        for op in &plan.operations {
            if let Operation::Delete { path, kind } = op {
                match kind {
                    EntryKind::Directory => exclusions.dirs.push(path.clone()),
                    EntryKind::File => {
                        exclusions.files.insert(path.clone());
                    }
                }
            }
        }
        exclusions
    }

    fn covers(&self, path: &Path) -> bool {
        self.files.contains(path) || self.dirs.iter().any(|d| path.starts_with(d))
    }
}

/// Walk the tree under the configured root and build the full plan.
///
/// Passes run in a fixed order: sidecar cleanup, episode renames, then season
/// folder renames (deepest first) when enabled.
pub fn build_plan(listing: &impl DirectoryListing, config: &Config) -> Result<Plan, ScannerError> {
    let tree = walk(listing, &config.root_dir)?;
    let mut plan = Plan::new();

    plan_cleanup(&tree, &config.cleanup, &mut plan);

    let exclusions = Exclusions::from_plan(&plan);
    plan_episode_renames(&tree, config, &exclusions, &mut plan);

    if config.rename_folders {
        plan_folder_renames(&tree, &config.root_dir, &exclusions, &mut plan);
    }

    info!(
        files = plan.file_renames(),
        folders = plan.folder_renames(),
        deletions = plan.deletions(),
        skipped = plan.skipped.len(),
        "Plan built"
    );

    Ok(plan)
}

/// Plan deletion of sidecar files and `.trickplay` folders anywhere in the tree
fn plan_cleanup(tree: &[WalkedDir], options: &CleanupOptions, plan: &mut Plan) {
    if !options.any() {
        return;
    }

    let mut trickplay_dirs: Vec<PathBuf> = Vec::new();
    if options.delete_trickplay_folders {
        for dir in tree {
            for sub in dir.dirs.iter().filter(|d| is_trickplay_folder(&d.name)) {
                // Pre-order: an enclosing trickplay folder is always seen first
                if !trickplay_dirs.iter().any(|t| sub.path.starts_with(t)) {
                    trickplay_dirs.push(sub.path.clone());
                }
            }
        }
    }

    for dir in tree.iter().rev() {
        if trickplay_dirs.iter().any(|t| dir.path.starts_with(t)) {
            continue;
        }

        for file in &dir.files {
            let wanted = (options.delete_nfo && is_nfo_file(&file.name))
                || (options.delete_jpg && is_jpg_file(&file.name));

            if wanted {
                debug!(path = ?file.path, "Planning sidecar deletion");
                plan.add_operation(Operation::delete(file.path.clone(), EntryKind::File));
            }
        }
    }

    if !trickplay_dirs.is_empty() {
        info!(count = trickplay_dirs.len(), "Planning trickplay folder deletion");
    }

    for path in trickplay_dirs {
        plan.add_operation(Operation::delete(path, EntryKind::Directory));
    }
}

/// Plan renames for video files sitting directly inside season folders.
///
/// Trickplay files are decided per file: they are never renamed, are recorded as
/// skipped, and are scheduled for deletion when `delete_trickplay` is set. A folder
/// holding nothing but trickplay files therefore produces no renames.
fn plan_episode_renames(
    tree: &[WalkedDir],
    config: &Config,
    exclusions: &Exclusions,
    plan: &mut Plan,
) {
    for dir in tree {
        if exclusions.covers(&dir.path) {
            continue;
        }

        let Some(season) = parse_season_folder(&dir.name) else {
            trace!(path = ?dir.path, "Not a season folder");
            continue;
        };

        debug!(
            path = ?dir.path,
            season = season.season,
            start = season.start,
            end = season.end,
            "Season folder"
        );
        plan.add_season(dir.path.clone(), season.clone());

        for file in &dir.files {
            if exclusions.covers(&file.path) {
                continue;
            }

            if is_trickplay(&file.name) {
                plan.skip(file.path.clone(), SkipReason::Trickplay);
                if config.delete_trickplay {
                    plan.add_operation(Operation::delete(file.path.clone(), EntryKind::File));
                }
                continue;
            }

            if !is_video_file(&file.name) {
                plan.skip(file.path.clone(), SkipReason::NotVideo);
                continue;
            }

            let Some(found) = extract_episode_number(&file.name) else {
                plan.skip(file.path.clone(), SkipReason::NoEpisodeNumber);
                continue;
            };

            if !season.contains(found.episode) {
                plan.skip(
                    file.path.clone(),
                    SkipReason::OutOfRange {
                        episode: found.episode,
                        start: season.start,
                        end: season.end,
                    },
                );
                continue;
            }

            let title = clean_title(&file.name, &config.show_name);
            let new_name =
                build_episode_name(&config.show_name, season.season, found.episode, &title);

            if new_name == file.name {
                plan.skip(file.path.clone(), SkipReason::AlreadyNamed);
                continue;
            }

            debug!(from = %file.name, to = %new_name, "Planning episode rename");
            plan.add_operation(Operation::rename_file(file.path.clone(), &new_name));
        }
    }
}

/// Plan renames for every season folder below the root, deepest first so that
/// parent renames never invalidate a child's path
fn plan_folder_renames(tree: &[WalkedDir], root: &Path, exclusions: &Exclusions, plan: &mut Plan) {
    let mut candidates: Vec<(usize, Operation)> = Vec::new();

    for dir in tree {
        if dir.path == root || exclusions.covers(&dir.path) {
            continue;
        }

        let Some(season) = parse_season_folder(&dir.name) else {
            continue;
        };

        let new_name = build_season_folder_name(&season);
        if new_name == dir.name {
            continue;
        }

        debug!(from = %dir.name, to = %new_name, "Planning folder rename");
        let depth = dir.path.components().count();
        candidates.push((depth, Operation::rename_folder(dir.path.clone(), &new_name)));
    }

    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    for (_, op) in candidates {
        plan.add_operation(op);
    }
}
