//! Breadth-first listing of files and folders below a root directory.
//!
//! Listing failures are not propagated. If any directory on the way cannot be
//! read, the whole walk is abandoned, the cause is logged and an empty list is
//! returned. Callers treat "nothing found" as "nothing to do", so an unreadable
//! tree behaves like an empty one.
//!
//! Entries come back in the order the file system enumerates them, which is
//! not sorted and not stable across platforms.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::ExtendableQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

/// List all regular files below `root`.
///
/// With `recursive == false` only the immediate children of `root` are
/// considered. Symbolic links to regular files count as files, symbolic links
/// to directories are never followed.
#[must_use]
#[tracing::instrument(level = "trace")]
pub fn list_files(root: &Path, recursive: bool) -> Vec<PathBuf> {
    walk(root, recursive, EntryKind::File)
}

/// List all directories below `root`, parents before their children.
#[must_use]
#[tracing::instrument(level = "trace")]
pub fn list_directories(root: &Path, recursive: bool) -> Vec<PathBuf> {
    walk(root, recursive, EntryKind::Directory)
}

fn walk(root: &Path, recursive: bool, wanted: EntryKind) -> Vec<PathBuf> {
    walk_with(root, recursive, wanted, read_children)
}

fn walk_with<F>(root: &Path, recursive: bool, wanted: EntryKind, mut read: F) -> Vec<PathBuf>
where
    F: FnMut(&Path) -> io::Result<Vec<(PathBuf, EntryKind)>>,
{
    let mut found = Vec::new();
    let mut pending = ExtendableQueue::from(vec![root.to_path_buf()]);

    while let Some(folder) = pending.next() {
        let children = match read(&folder) {
            Ok(children) => children,
            Err(err) => {
                tracing::error!("could not list {}: {err}", folder.display());
                return Vec::new();
            }
        };

        for (child, kind) in children {
            if kind == wanted {
                found.push(child.clone());
            }
            if kind == EntryKind::Directory && recursive {
                pending.push(child);
            }
        }
    }

    found
}

/// Read the direct children of `folder`, classifying each one exactly once.
///
/// Entries that are neither a regular file nor a real directory (dangling or
/// looping links, sockets, devices) are dropped.
fn read_children(folder: &Path) -> io::Result<Vec<(PathBuf, EntryKind)>> {
    let mut children = Vec::new();

    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        let Some(kind) = classify(&entry) else {
            tracing::trace!("skipping {}", path.display());
            continue;
        };
        children.push((path, kind));
    }

    Ok(children)
}

fn classify(entry: &fs::DirEntry) -> Option<EntryKind> {
    let file_type = entry.file_type().ok()?;
    if file_type.is_dir() {
        Some(EntryKind::Directory)
    } else if file_type.is_file() {
        Some(EntryKind::File)
    } else if file_type.is_symlink() {
        fs::metadata(entry.path())
            .ok()
            .filter(fs::Metadata::is_file)
            .map(|_| EntryKind::File)
    } else {
        None
    }
}
