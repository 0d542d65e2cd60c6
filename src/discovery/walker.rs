use crate::config::ScanConfig;
use crate::filtering::matches_ignore_glob;
use ignore::{WalkBuilder, WalkParallel};
use log::debug;
use std::path::{Path, PathBuf};

/// Configures and builds a parallel walker over every directory root.
///
/// Returns `None` when there is nothing to walk.
pub(super) fn build_walker(dirs: &[PathBuf], config: &ScanConfig) -> Option<WalkParallel> {
    let (first, rest) = dirs.split_first()?;
    let mut walker_builder = WalkBuilder::new(first);
    for dir in rest {
        walker_builder.add(dir);
    }

    if config.use_gitignore {
        walker_builder.standard_filters(true);
        debug!("Configuring WalkBuilder: standard_filters enabled.");
    } else {
        walker_builder.standard_filters(false);
        debug!("Configuring WalkBuilder: standard_filters disabled (gitignore usage off).");
    }
    // .gitignore files are honoured even outside a git checkout.
    walker_builder.require_git(false);
    walker_builder.follow_links(config.follow_links);

    if !config.ignore_globs.is_empty() {
        debug!(
            "Adding filter_entry for {} ignore glob(s).",
            config.ignore_globs.len()
        );
        let globs = config.ignore_globs.clone();
        let roots = dirs.to_vec();
        walker_builder.filter_entry(move |entry| {
            // The roots themselves are always walked.
            if entry.depth() == 0 {
                return true;
            }
            let relative = relative_to_closest_root(entry.path(), &roots);
            if matches_ignore_glob(&globs, relative) {
                debug!(
                    "Skipping {:?} matching ignore glob (relative path: {:?})",
                    entry.path(),
                    relative
                );
                return false;
            }
            true
        });
    }

    debug!(
        "Building walker over {} director(y/ies), follow_links={}",
        dirs.len(),
        config.follow_links
    );
    Some(walker_builder.build_parallel())
}

/// Strips the deepest root that contains `path`. Entries always sit under
/// one of the walked roots; the full path is returned otherwise.
fn relative_to_closest_root<'a>(path: &'a Path, roots: &[PathBuf]) -> &'a Path {
    roots
        .iter()
        .filter_map(|root| path.strip_prefix(root).ok())
        .min_by_key(|relative| relative.components().count())
        .unwrap_or(path)
}
