//! Candidate file enumeration: parallel directory walks and delimited name
//! lists.

mod names;

pub use names::{read_names, split_names};

use rayon::iter::{ParallelBridge, ParallelIterator};
use std::{
    fs,
    io::{self, Error, ErrorKind},
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};
use tracing::debug;

#[derive(Default, Debug)]
pub struct WalkData {
    pub num_files: AtomicUsize,
    pub num_dirs: AtomicUsize,
    /// Either full paths, or bare directory names that are skipped wherever
    /// they show up.
    ignore_directories: Vec<PathBuf>,
}

impl WalkData {
    pub fn new(ignore_directories: Vec<PathBuf>) -> Self {
        Self {
            num_files: AtomicUsize::new(0),
            num_dirs: AtomicUsize::new(0),
            ignore_directories,
        }
    }

    fn is_ignored(&self, dir: &Path) -> bool {
        self.ignore_directories.iter().any(|ignored| {
            ignored == dir
                || (ignored.components().count() == 1
                    && dir.file_name() == Some(ignored.as_os_str()))
        })
    }
}

/// Lists every non-directory entry below `root`, in no particular order.
///
/// Symlinks are reported but never followed. A `root` that is not a directory
/// is returned as the only candidate. Only a failure to stat `root` itself is
/// an error; unreadable subdirectories are skipped.
pub fn walk_it(root: &Path, walk_data: &WalkData) -> io::Result<Vec<PathBuf>> {
    // doesn't traverse symlink
    let metadata = root.symlink_metadata()?;
    if !metadata.is_dir() {
        walk_data.num_files.fetch_add(1, Ordering::Relaxed);
        return Ok(vec![root.to_path_buf()]);
    }
    if walk_data.is_ignored(root) {
        return Ok(Vec::new());
    }
    Ok(walk(root, walk_data))
}

fn walk(dir: &Path, walk_data: &WalkData) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(failed) => {
            if handle_error_and_retry(&failed) {
                return walk(dir, walk_data);
            }
            debug!(?dir, error = %failed, "skipping unreadable directory");
            return Vec::new();
        }
    };
    walk_data.num_dirs.fetch_add(1, Ordering::Relaxed);

    entries
        .par_bridge()
        .flat_map_iter(|entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(failed) => {
                    debug!(?dir, error = %failed, "skipping unreadable entry");
                    return Vec::new();
                }
            };
            let path = entry.path();
            // doesn't traverse symlink
            match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => {
                    if walk_data.is_ignored(&path) {
                        Vec::new()
                    } else {
                        walk(&path, walk_data)
                    }
                }
                Ok(_) => {
                    walk_data.num_files.fetch_add(1, Ordering::Relaxed);
                    vec![path]
                }
                Err(failed) => {
                    debug!(?path, error = %failed, "skipping entry without a file type");
                    Vec::new()
                }
            }
        })
        .collect()
}

fn handle_error_and_retry(failed: &Error) -> bool {
    failed.kind() == ErrorKind::Interrupted
}
