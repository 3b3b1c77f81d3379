//! Banner files - random selection from the configured directory

use std::path::Path;

use rand::seq::SliceRandom;

/// Picks a random file from `dir` under `root`, returning its path relative
/// to `root` (the redirect target). Only names carrying an extension count;
/// `None` when the directory is missing or holds no such file.
pub fn random_from_dir(root: &Path, dir: &str) -> Option<String> {
    let entries = std::fs::read_dir(root.join(dir)).ok()?;

    let files: Vec<String> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if !entry.file_type().ok()?.is_file() {
                return None;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            // same shape glob("*.*") accepts: an extension, not a dotfile
            if name.contains('.') && !name.starts_with('.') {
                Some(name)
            } else {
                None
            }
        })
        .collect();

    files
        .choose(&mut rand::thread_rng())
        .map(|name| format!("{dir}{name}"))
}
