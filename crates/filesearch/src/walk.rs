//! Sequential directory walking with hidden-directory pruning.
//!
//! The walk visits the files of a directory first, in directory-entry order,
//! then descends into its subdirectories, skipping any directory whose name
//! starts with `.`. Symlinked directories are not followed. Unreadable
//! entries are skipped, never fatal. The cancellation flag is checked at
//! every directory boundary.

use std::fs;
use std::path::Path;

use crate::cancel::CancelFlag;

/// Stops counting once the pre-scan estimate passes this many files.
pub const ESTIMATE_CAP: usize = 10_000;

/// Estimate reported when the root cannot be scanned at all.
pub const FALLBACK_ESTIMATE: usize = 1000;

/// Visitor decision after one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Continue,
    /// Stop the walk early (e.g. result cap reached).
    Stop,
}

/// How a walk ended.
#[derive(Debug)]
pub enum WalkOutcome {
    /// Every reachable file was visited.
    Completed,
    /// The visitor requested an early stop.
    Stopped,
    /// The cancellation flag was observed.
    Cancelled,
    /// The root itself could not be read; deeper failures are only skipped.
    Failed(std::io::Error),
}

/// Walks the subtree under `root` top-down, invoking `visit` for every file.
pub fn walk_files<F>(root: &Path, cancel: &CancelFlag, visit: &mut F) -> WalkOutcome
where
    F: FnMut(&Path) -> WalkState,
{
    walk_dir(root, cancel, visit, true)
}

fn walk_dir<F>(root: &Path, cancel: &CancelFlag, visit: &mut F, is_root: bool) -> WalkOutcome
where
    F: FnMut(&Path) -> WalkState,
{
    if cancel.is_cancelled() {
        return WalkOutcome::Cancelled;
    }

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(error) if is_root => return WalkOutcome::Failed(error),
        Err(error) => {
            log::debug!("cannot read directory {}: {}", root.display(), error);
            return WalkOutcome::Completed;
        }
    };

    let mut subdirs = Vec::new();
    for entry in entries.filter_map(|entry| entry.ok()) {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            subdirs.push(entry.path());
        } else if file_type.is_symlink() {
            // Do not follow symlinked directories; symlinks to files are
            // visited like plain files (a later stat decides their fate).
            match fs::metadata(entry.path()) {
                Ok(metadata) if metadata.is_dir() => continue,
                _ => match visit(&entry.path()) {
                    WalkState::Continue => {}
                    WalkState::Stop => return WalkOutcome::Stopped,
                },
            }
        } else {
            match visit(&entry.path()) {
                WalkState::Continue => {}
                WalkState::Stop => return WalkOutcome::Stopped,
            }
        }
    }

    for subdir in subdirs {
        match walk_dir(&subdir, cancel, visit, false) {
            WalkOutcome::Completed => {}
            ended => return ended,
        }
    }
    WalkOutcome::Completed
}

/// Capped pre-scan used only for progress totals.
///
/// Counts every file under `root` (no hidden-directory pruning), stops once
/// the count passes [`ESTIMATE_CAP`], and reports [`FALLBACK_ESTIMATE`] when
/// the root itself cannot be read.
pub fn estimate_file_count(root: &Path, cancel: &CancelFlag) -> usize {
    let Ok(entries) = fs::read_dir(root) else {
        return FALLBACK_ESTIMATE;
    };

    let mut count = 0usize;
    let mut stack = vec![entries];
    while let Some(iter) = stack.last_mut() {
        if cancel.is_cancelled() || count > ESTIMATE_CAP {
            break;
        }
        let Some(entry) = iter.next() else {
            stack.pop();
            continue;
        };
        let Ok(entry) = entry else {
            continue;
        };
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => {
                if let Ok(subdir) = fs::read_dir(entry.path()) {
                    stack.push(subdir);
                }
            }
            Ok(_) => count += 1,
            Err(_) => {}
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn collect(root: &Path) -> Vec<PathBuf> {
        let mut seen = Vec::new();
        walk_files(root, &CancelFlag::new(), &mut |path| {
            seen.push(path.to_path_buf());
            WalkState::Continue
        });
        seen
    }

    #[test]
    fn visits_every_file() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub/b.txt")).unwrap();

        let mut seen = collect(dir.path());
        seen.sort();
        assert_eq!(
            seen,
            vec![dir.path().join("a.txt"), dir.path().join("sub/b.txt")]
        );
    }

    #[test]
    fn prunes_hidden_directories_but_not_hidden_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".hidden")).unwrap();
        File::create(dir.path().join(".hidden/secret.txt")).unwrap();
        File::create(dir.path().join(".dotfile")).unwrap();
        File::create(dir.path().join("plain.txt")).unwrap();

        let mut seen = collect(dir.path());
        seen.sort();
        assert_eq!(
            seen,
            vec![dir.path().join(".dotfile"), dir.path().join("plain.txt")]
        );
    }

    #[test]
    fn own_directory_files_come_before_subdirectory_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("aaa")).unwrap();
        File::create(dir.path().join("aaa/nested.txt")).unwrap();
        File::create(dir.path().join("zzz.txt")).unwrap();

        let seen = collect(dir.path());
        assert_eq!(seen[0], dir.path().join("zzz.txt"));
        assert_eq!(seen[1], dir.path().join("aaa/nested.txt"));
    }

    #[test]
    fn visitor_can_stop_early() {
        let dir = TempDir::new().unwrap();
        for i in 0..5 {
            File::create(dir.path().join(format!("f{i}.txt"))).unwrap();
        }
        let mut visited = 0;
        let outcome = walk_files(dir.path(), &CancelFlag::new(), &mut |_| {
            visited += 1;
            WalkState::Stop
        });
        assert!(matches!(outcome, WalkOutcome::Stopped));
        assert_eq!(visited, 1);
    }

    #[test]
    fn pre_set_cancellation_visits_nothing() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut visited = 0;
        let outcome = walk_files(dir.path(), &cancel, &mut |_| {
            visited += 1;
            WalkState::Continue
        });
        assert!(matches!(outcome, WalkOutcome::Cancelled));
        assert_eq!(visited, 0);
    }

    #[test]
    fn unreadable_root_fails_the_walk() {
        let outcome = walk_files(
            Path::new("/nonexistent/root"),
            &CancelFlag::new(),
            &mut |_| WalkState::Continue,
        );
        assert!(matches!(outcome, WalkOutcome::Failed(_)));
    }

    #[test]
    fn estimate_counts_files_including_hidden_directories() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        fs::create_dir(dir.path().join(".hidden")).unwrap();
        File::create(dir.path().join(".hidden/b.txt")).unwrap();
        assert_eq!(estimate_file_count(dir.path(), &CancelFlag::new()), 2);
    }

    #[test]
    fn estimate_falls_back_for_unreadable_root() {
        assert_eq!(
            estimate_file_count(Path::new("/nonexistent/root"), &CancelFlag::new()),
            FALLBACK_ESTIMATE
        );
    }
}
