use crate::cleaner;
use crate::constants::NODE_MODULES;
use crate::model::{Config, TargetDir};
use crate::output::Reporter;
use anyhow::Result;
use jwalk::WalkDir;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Per-root tally returned by [`scan_root`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    pub found: usize,
    pub removed: usize,
    pub bytes: u64,
}

/// Walks one root depth-first and handles every `node_modules` directory it
/// encounters. A matched directory is never descended into, whether it was
/// removed, reported, or too young, so nested `node_modules` belong to their
/// enclosing match. The only error this returns is a root that cannot be
/// stat'ed at all; everything below the root is best-effort.
pub fn scan_root(root: &Path, config: &Config, reporter: &Reporter) -> Result<ScanOutcome> {
    let meta = fs::symlink_metadata(root)?;
    let mut outcome = ScanOutcome::default();
    visit(root, &meta, config, reporter, &mut outcome);
    Ok(outcome)
}

fn visit(
    path: &Path,
    meta: &fs::Metadata,
    config: &Config,
    reporter: &Reporter,
    outcome: &mut ScanOutcome,
) {
    // Symlinks are lstat'ed, so a link to a directory lands here as a
    // non-directory and is neither matched nor entered.
    if !meta.is_dir() {
        return;
    }

    if path.file_name().is_some_and(|name| name == NODE_MODULES) {
        handle_target(path, meta, config, reporter, outcome);
        return;
    }

    let Ok(entries) = fs::read_dir(path) else {
        return;
    };
    for entry in entries.flatten() {
        let child = entry.path();
        if let Ok(child_meta) = fs::symlink_metadata(&child) {
            visit(&child, &child_meta, config, reporter, outcome);
        }
    }
}

fn handle_target(
    path: &Path,
    meta: &fs::Metadata,
    config: &Config,
    reporter: &Reporter,
    outcome: &mut ScanOutcome,
) {
    let age = entry_age(meta);
    if age < config.age {
        reporter.skipping(path, age, config.age);
        return;
    }

    outcome.found += 1;
    let size = match dir_size(path) {
        Ok(size) => size,
        Err(err) => {
            reporter.size_warning(path, &err);
            0
        }
    };
    outcome.bytes += size;

    let target = TargetDir {
        path: path.to_path_buf(),
        size,
        age,
    };
    if config.dry_run {
        reporter.would_remove(&target);
        return;
    }
    match cleaner::remove(&target.path) {
        Ok(()) => {
            outcome.removed += 1;
            reporter.removed(&target);
        }
        Err(err) => reporter.remove_failed(&err),
    }
}

/// Elapsed time since the entry was last modified. An unreadable or future
/// mtime counts as zero, which classifies the entry as too young.
fn entry_age(meta: &fs::Metadata) -> Duration {
    meta.modified()
        .ok()
        .and_then(|mtime| mtime.elapsed().ok())
        .unwrap_or_default()
}

/// Best-effort total size of all regular files transitively under `path`.
/// Entries that cannot be read contribute nothing; only a `path` that cannot
/// be stat'ed at entry is an error, which callers downgrade to zero.
pub fn dir_size(path: &Path) -> Result<u64> {
    fs::symlink_metadata(path)?;
    let mut size = 0;
    for entry in WalkDir::new(path)
        .skip_hidden(false)
        .parallelism(jwalk::Parallelism::Serial)
        .into_iter()
        .flatten()
    {
        if let Ok(meta) = entry.metadata()
            && meta.is_file()
        {
            size += meta.len();
        }
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn config(age: Duration, dry_run: bool) -> Config {
        Config {
            roots: Vec::new(),
            age,
            dry_run,
            verbose: false,
            quiet: true,
        }
    }

    fn reporter(config: &Config) -> Reporter {
        Reporter::new(config)
    }

    fn write_bytes(path: &PathBuf, len: usize) {
        let mut file = File::create(path).unwrap();
        file.write_all(&vec![0u8; len]).unwrap();
    }

    #[test]
    fn old_target_is_found_and_removed() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("proj/node_modules");
        fs::create_dir_all(&target)?;
        write_bytes(&target.join("pkg.js"), 100);

        let config = config(Duration::ZERO, false);
        let outcome = scan_root(dir.path(), &config, &reporter(&config))?;

        assert_eq!(
            outcome,
            ScanOutcome {
                found: 1,
                removed: 1,
                bytes: 100
            }
        );
        assert!(!target.exists());
        assert!(dir.path().join("proj").exists());
        Ok(())
    }

    #[test]
    fn young_target_is_left_alone() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("proj/node_modules");
        fs::create_dir_all(&target)?;
        write_bytes(&target.join("pkg.js"), 100);

        let config = config(Duration::from_secs(3_600), false);
        let outcome = scan_root(dir.path(), &config, &reporter(&config))?;

        assert_eq!(outcome, ScanOutcome::default());
        assert!(target.exists());
        Ok(())
    }

    #[test]
    fn dry_run_counts_but_never_deletes() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("proj/node_modules");
        fs::create_dir_all(&target)?;
        write_bytes(&target.join("pkg.js"), 256);

        let config = config(Duration::ZERO, true);
        let outcome = scan_root(dir.path(), &config, &reporter(&config))?;

        assert_eq!(
            outcome,
            ScanOutcome {
                found: 1,
                removed: 0,
                bytes: 256
            }
        );
        assert!(target.join("pkg.js").exists());
        Ok(())
    }

    #[test]
    fn dry_run_is_idempotent() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("a/node_modules");
        fs::create_dir_all(&target)?;
        write_bytes(&target.join("pkg.js"), 64);

        let config = config(Duration::ZERO, true);
        let first = scan_root(dir.path(), &config, &reporter(&config))?;
        let second = scan_root(dir.path(), &config, &reporter(&config))?;

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn nested_target_is_owned_by_the_enclosing_match() -> Result<()> {
        let dir = tempdir()?;
        let outer = dir.path().join("app/node_modules");
        let inner = outer.join("some-dep/node_modules");
        fs::create_dir_all(&inner)?;
        write_bytes(&outer.join("a.js"), 10);
        write_bytes(&inner.join("b.js"), 20);

        let config = config(Duration::ZERO, true);
        let outcome = scan_root(dir.path(), &config, &reporter(&config))?;

        // One match; the inner directory contributes to its size only.
        assert_eq!(outcome.found, 1);
        assert_eq!(outcome.bytes, 30);
        Ok(())
    }

    #[test]
    fn root_named_node_modules_matches_itself() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("node_modules");
        fs::create_dir_all(&target)?;
        write_bytes(&target.join("pkg.js"), 42);

        let config = config(Duration::ZERO, true);
        let outcome = scan_root(&target, &config, &reporter(&config))?;

        assert_eq!(outcome.found, 1);
        assert_eq!(outcome.bytes, 42);
        Ok(())
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let config = config(Duration::ZERO, true);
        assert!(scan_root(&missing, &config, &reporter(&config)).is_err());
    }

    #[test]
    fn file_root_yields_empty_outcome() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("plain.txt");
        write_bytes(&file, 5);

        let config = config(Duration::ZERO, false);
        let outcome = scan_root(&file, &config, &reporter(&config))?;

        assert_eq!(outcome, ScanOutcome::default());
        assert!(file.exists());
        Ok(())
    }

    #[test]
    fn removed_never_exceeds_found() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("a/node_modules"))?;
        fs::create_dir_all(dir.path().join("b/node_modules"))?;
        fs::create_dir_all(dir.path().join("c/not_modules"))?;

        let config = config(Duration::ZERO, false);
        let outcome = scan_root(dir.path(), &config, &reporter(&config))?;

        assert!(outcome.removed <= outcome.found);
        assert_eq!(outcome.found, 2);
        Ok(())
    }

    #[test]
    fn dir_size_sums_files_transitively() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("node_modules");
        fs::create_dir_all(root.join("nested/deeper"))?;
        write_bytes(&root.join("top.js"), 100);
        write_bytes(&root.join("nested/mid.js"), 200);
        write_bytes(&root.join("nested/deeper/.hidden"), 300);

        assert_eq!(dir_size(&root)?, 600);
        Ok(())
    }

    #[test]
    fn dir_size_of_empty_dir_is_zero() -> Result<()> {
        let dir = tempdir()?;
        assert_eq!(dir_size(dir.path())?, 0);
        Ok(())
    }

    #[test]
    fn dir_size_of_missing_path_errors() {
        let dir = tempdir().unwrap();
        assert!(dir_size(&dir.path().join("gone")).is_err());
    }
}
