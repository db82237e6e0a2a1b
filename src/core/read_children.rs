use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The immediate child directories of `path`.
///
/// File types come from `DirEntry::file_type`, which does not traverse
/// symlinks, so a symlink pointing at a directory is reported as a symlink
/// and left out. Symlinked directories are never followed or counted.
pub(crate) fn read_child_dirs(path: &Path, skip_hidden: bool) -> io::Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if skip_hidden && is_hidden(&entry.file_name()) {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_dir() && !file_type.is_symlink() {
            children.push(entry.path());
        }
    }
    Ok(children)
}

fn is_hidden(file_name: &OsStr) -> bool {
    file_name
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}
