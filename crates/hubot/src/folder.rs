//! Top-level folder lookup for auto-room naming.

use crate::types::{ItemParent, JobItem};

/// Maximum number of ancestors visited before the walk stops.
pub const MAX_FOLDER_DEPTH: usize = 64;

/// Returns the name of the top-most ancestor of `job` below the root.
///
/// This is the organisation or folder that groups the job, or the job itself
/// when it sits directly under the root. The walk also stops at a parent that
/// cannot be traversed, and after [`MAX_FOLDER_DEPTH`] steps; in both cases
/// the current node's name is returned.
pub fn top_level_folder_name(job: &JobItem) -> &str {
    let mut current = job;
    for _ in 0..MAX_FOLDER_DEPTH {
        match &current.parent {
            ItemParent::Folder(folder) => current = folder,
            ItemParent::Root | ItemParent::Opaque => return &current.name,
        }
    }

    tracing::debug!(
        max_depth = MAX_FOLDER_DEPTH,
        stopped_at = %current.name,
        "job hierarchy too deep"
    );
    &current.name
}
