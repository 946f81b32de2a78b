use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Lists regular files of `dir` accepted by `filter`, sorted by path.
pub fn list_files(dir: &Path, filter: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && filter(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
