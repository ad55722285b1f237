use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::rename::Plan;
use tracing::{info, warn};

/// Two or more planned renames that resolve to the same destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub destination: PathBuf,
    pub sources: Vec<PathBuf>,
}

impl Collision {
    pub fn format_message(&self) -> String {
        let mut msg = format!(
            "{} items would be renamed to {}:\n",
            self.sources.len(),
            self.destination.display()
        );
        for source in &self.sources {
            msg.push_str(&format!("  - {}\n", source.display()));
        }
        msg
    }
}

/// Find destinations claimed by more than one rename in the plan.
///
/// Collisions are reported, not resolved: the executor refuses to rename onto an
/// existing path, so only the first rename of each group can succeed.
pub fn find_collisions(plan: &Plan) -> Vec<Collision> {
    let mut by_destination: HashMap<&Path, Vec<PathBuf>> = HashMap::new();
    let mut order: Vec<&Path> = Vec::new();

    for op in &plan.operations {
        let Some(destination) = op.destination() else {
            continue;
        };

        let sources = by_destination.entry(destination).or_insert_with(|| {
            order.push(destination);
            Vec::new()
        });
        sources.push(op.source().to_path_buf());
    }

    let collisions: Vec<Collision> = order
        .into_iter()
        .filter_map(|destination| {
            let sources = by_destination.remove(destination)?;
            (sources.len() > 1).then(|| Collision {
                destination: destination.to_path_buf(),
                sources,
            })
        })
        .collect();

    if collisions.is_empty() {
        info!("No rename collisions");
    } else {
        warn!(count = collisions.len(), "Rename collisions detected");
    }

    collisions
}
