use crate::common::mask::MaskFile;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expand the command-line inputs into mask files.
///
/// Directories are scanned (non-recursively) for entries ending with
/// `mask_suffix` and sorted by name; plain files are kept in the given order.
pub fn collect_mask_files(inputs: &[PathBuf], mask_suffix: &str) -> std::io::Result<Vec<MaskFile>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = scan_directory(input, mask_suffix)?;
            debug!("Found {} masks in {}", found.len(), input.display());
            files.extend(found.into_iter().map(MaskFile::new));
        } else {
            files.push(MaskFile::new(input.clone()));
        }
    }
    Ok(files)
}

fn scan_directory(dir: &Path, mask_suffix: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(mask_suffix));
        if matches {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}
