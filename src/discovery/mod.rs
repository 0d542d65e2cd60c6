//! Discovers the files to parse, walking directory roots in parallel.
use crate::cancellation::CancellationToken;
use crate::config::ScanConfig;
use crate::errors::{Error, Result, ScanIssue};
use crate::filtering::{matches_ignore_glob, FilenameChain};
use crossbeam_channel::unbounded;
use ignore::WalkState;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

mod entry_processor;
mod roots;
mod walker;

use entry_processor::{accept_candidate, process_direntry};
use roots::resolve_root;
use walker::build_walker;

/// The files selected for parsing, plus the roots that had to be skipped.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Canonical paths, sorted and free of duplicates.
    pub files: Vec<PathBuf>,
    /// One `RootUnavailable` issue per skipped root, in root order.
    pub issues: Vec<ScanIssue>,
}

/// Discovers every readable regular file under the configured roots that passes the filename chain.
///
/// Roots are canonicalized first. A root that cannot be resolved or read is
/// skipped and reported; a root that is a file is a candidate itself; a
/// directory root is walked recursively. Candidates reached through several
/// roots are kept once. The result is sorted by path so that scans, and the
/// last-write-wins merge that follows, are deterministic.
///
/// # Errors
/// Returns `Error::Interrupted` if the token is cancelled before or during the walk.
///
/// # Examples
///
/// ```
/// use defscan::cancellation::CancellationToken;
/// use defscan::config::ScanConfig;
/// use defscan::discovery::discover_files;
/// use defscan::filtering::FilenameChain;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ScanConfig {
///     roots: vec!["/definitely/missing".into()],
///     ..Default::default()
/// };
/// let discovery = discover_files(&config, &FilenameChain::new(), &CancellationToken::new())?;
/// assert!(discovery.files.is_empty());
/// assert_eq!(discovery.issues.len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn discover_files(
    config: &ScanConfig,
    chain: &FilenameChain,
    token: &CancellationToken,
) -> Result<Discovery> {
    // Check for stop signal before starting the walk
    if token.is_cancelled() {
        return Err(Error::Interrupted);
    }

    let mut issues = Vec::new();
    let mut files = BTreeSet::new();
    let mut dirs = Vec::new();

    for root in &config.roots {
        match resolve_root(root) {
            Ok(resolved) if resolved.is_file => {
                // A file root is matched by its name, as if it sat directly below a root.
                let name = resolved.path.file_name().map_or(resolved.path.as_path(), Path::new);
                if matches_ignore_glob(&config.ignore_globs, name) {
                    debug!("Skipping file root matching ignore glob: {}", resolved.path.display());
                } else if accept_candidate(&resolved.path, chain) {
                    files.insert(resolved.path);
                }
            }
            Ok(resolved) => dirs.push(resolved.path),
            Err(issue) => {
                warn!("{}", issue);
                issues.push(issue);
            }
        }
    }

    if let Some(walker) = build_walker(&dirs, config) {
        let (tx, rx) = unbounded();
        let follow_links = config.follow_links;

        walker.run(|| {
            // This factory closure is called once per walker thread.
            let tx = tx.clone();
            Box::new(move |entry_result| {
                if token.is_cancelled() {
                    return WalkState::Quit;
                }
                if let Some(path) = process_direntry(entry_result, chain, follow_links) {
                    if tx.send(path).is_err() {
                        log::error!("Receiver dropped, quitting discovery walk.");
                        return WalkState::Quit;
                    }
                }
                WalkState::Continue
            })
        });
        drop(tx);

        if token.is_cancelled() {
            return Err(Error::Interrupted);
        }
        files.extend(rx);
    }

    debug!(
        "Discovery complete. Files: {}, unavailable roots: {}",
        files.len(),
        issues.len()
    );
    Ok(Discovery {
        files: files.into_iter().collect(),
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glob::Pattern;
    use std::fs;
    use tempfile::tempdir;

    fn config(roots: Vec<PathBuf>) -> ScanConfig {
        ScanConfig {
            roots,
            ..Default::default()
        }
    }

    #[test]
    fn test_roots_union_without_duplicates() -> anyhow::Result<()> {
        let dir_a = tempdir()?;
        let other = tempdir()?;
        fs::create_dir(dir_a.path().join("sub"))?;
        fs::write(dir_a.path().join("one.hh"), "")?;
        fs::write(dir_a.path().join("sub/two.hh"), "")?;
        let file_b = other.path().join("b.hh");
        fs::write(&file_b, "")?;

        let roots = vec![
            dir_a.path().to_path_buf(),
            file_b.clone(),
            dir_a.path().join("one.hh"),
            dir_a.path().join("sub"),
        ];
        let discovery = discover_files(&config(roots), &FilenameChain::new(), &CancellationToken::new())?;

        let mut expected = vec![
            dir_a.path().canonicalize()?.join("one.hh"),
            dir_a.path().canonicalize()?.join("sub/two.hh"),
            file_b.canonicalize()?,
        ];
        expected.sort();
        assert_eq!(discovery.files, expected);
        assert!(discovery.issues.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_root_is_an_issue_not_an_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.hh"), "")?;
        let missing = dir.path().join("missing");

        let discovery = discover_files(
            &config(vec![missing.clone(), dir.path().to_path_buf()]),
            &FilenameChain::new(),
            &CancellationToken::new(),
        )?;
        assert_eq!(discovery.files.len(), 1);
        assert_eq!(discovery.issues.len(), 1);
        assert_eq!(discovery.issues[0].path(), missing.as_path());
        Ok(())
    }

    #[test]
    fn test_file_root_still_goes_through_chain() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("notes.txt");
        fs::write(&file, "")?;

        let mut chain = FilenameChain::new();
        chain.push(|p: &Path| p.extension().map_or(false, |e| e == "hh"));
        let discovery = discover_files(&config(vec![file]), &chain, &CancellationToken::new())?;
        assert!(discovery.files.is_empty());
        Ok(())
    }

    #[test]
    fn test_ignore_globs_apply_below_the_root_only() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let root = dir.path().canonicalize()?.join("build").join("src");
        fs::create_dir_all(root.join("build"))?;
        fs::write(root.join("Keep.hh"), "")?;
        fs::write(root.join("build").join("Gen.hh"), "")?;
        let stale = root.join("Stale.hh.bak");
        fs::write(&stale, "")?;

        let mut config = config(vec![root.clone(), stale]);
        config.ignore_globs = vec![Pattern::new("build")?, Pattern::new("*.bak")?];
        let discovery = discover_files(&config, &FilenameChain::new(), &CancellationToken::new())?;
        assert_eq!(discovery.files, vec![root.join("Keep.hh")]);
        Ok(())
    }

    #[test]
    fn test_gitignore_is_opt_in() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(".gitignore"), "ignored.hh\n")?;
        fs::write(dir.path().join("ignored.hh"), "")?;
        fs::write(dir.path().join("kept.hh"), "")?;
        let mut chain = FilenameChain::new();
        chain.push(|p: &Path| p.extension().map_or(false, |e| e == "hh"));

        let all = discover_files(&config(vec![dir.path().to_path_buf()]), &chain, &CancellationToken::new())?;
        assert_eq!(all.files.len(), 2);

        let mut respecting = config(vec![dir.path().to_path_buf()]);
        respecting.use_gitignore = true;
        let filtered = discover_files(&respecting, &chain, &CancellationToken::new())?;
        assert_eq!(filtered.files.len(), 1);
        assert!(filtered.files[0].ends_with("kept.hh"));
        Ok(())
    }

    #[test]
    fn test_cancelled_token_interrupts() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let token = CancellationToken::new();
        token.cancel();
        let result = discover_files(&config(vec![dir.path().to_path_buf()]), &FilenameChain::new(), &token);
        assert!(matches!(result, Err(Error::Interrupted)));
        Ok(())
    }
}
