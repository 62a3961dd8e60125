// SPDX-License-Identifier: GPL-3.0-only

//! Output directory setup and file naming
//!
//! Dataset tiles are named `{prefix}_{counter}{suffix}`; captured photos are
//! named `{prefix}{n}{suffix}` with `n` the first unused number.

use crate::errors::StorageError;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of preparing an output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDirStatus {
    /// The directory did not exist and was created
    Created,
    /// The directory existed, was removed and created again empty
    Recreated,
    /// The user declined removal; nothing was touched
    Declined,
}

/// Make `path` an empty directory
///
/// When `path` already exists as a directory, `confirm` is asked before it is
/// removed with everything in it. Declining leaves the filesystem untouched.
/// If anything is still at `path` once removal was attempted (for example a
/// plain file, which is never removed), the call fails with
/// [`StorageError::NotCleared`].
pub fn prepare_output_dir<F>(path: &Path, mut confirm: F) -> Result<OutputDirStatus, StorageError>
where
    F: FnMut(&Path) -> io::Result<bool>,
{
    let mut status = OutputDirStatus::Created;

    if path.is_dir() {
        let approved = confirm(path).map_err(|e| StorageError::PromptFailed(e.to_string()))?;
        if !approved {
            info!(path = %path.display(), "Output directory removal declined");
            return Ok(OutputDirStatus::Declined);
        }

        info!(path = %path.display(), "Removing existing output directory");
        std::fs::remove_dir_all(path).map_err(|e| StorageError::RemoveFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        status = OutputDirStatus::Recreated;
    }

    if path.exists() {
        warn!(path = %path.display(), "Output path still present");
        return Err(StorageError::NotCleared(path.to_path_buf()));
    }

    std::fs::create_dir_all(path).map_err(|e| StorageError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    debug!(path = %path.display(), ?status, "Output directory ready");
    Ok(status)
}

/// File name of dataset tile number `counter`
pub fn tile_file_name(prefix: &str, counter: u64, suffix: &str) -> String {
    format!("{}_{}{}", prefix, counter, suffix)
}

/// File name of captured photo number `n`
pub fn photo_file_name(prefix: &str, n: u64, suffix: &str) -> String {
    format!("{}{}{}", prefix, n, suffix)
}

/// First unused photo path in `dir`, counting up from `start`
///
/// Returns the number together with the path so callers can resume the
/// search after it.
pub fn next_free_path(dir: &Path, prefix: &str, suffix: &str, start: u64) -> (u64, PathBuf) {
    let mut n = start;
    loop {
        let path = dir.join(photo_file_name(prefix, n, suffix));
        if !path.exists() {
            return (n, path);
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(tile_file_name("background", 0, ".bmp"), "background_0.bmp");
        assert_eq!(tile_file_name("lego", 1234, ".png"), "lego_1234.png");
        assert_eq!(photo_file_name("IMG", 7, ".bmp"), "IMG7.bmp");
    }

    #[test]
    fn test_next_free_path_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("IMG0.bmp"), b"x").unwrap();
        std::fs::write(dir.path().join("IMG1.bmp"), b"x").unwrap();
        std::fs::write(dir.path().join("IMG3.bmp"), b"x").unwrap();

        let (n, path) = next_free_path(dir.path(), "IMG", ".bmp", 0);
        assert_eq!(n, 2);
        assert_eq!(path, dir.path().join("IMG2.bmp"));

        std::fs::write(&path, b"x").unwrap();
        let (n, _) = next_free_path(dir.path(), "IMG", ".bmp", n);
        assert_eq!(n, 4);
    }

    #[test]
    fn test_prepare_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");

        let status = prepare_output_dir(&out, |_| panic!("nothing to confirm")).unwrap();
        assert_eq!(status, OutputDirStatus::Created);
        assert!(out.is_dir());
    }

    #[test]
    fn test_prepare_recreates_on_approval() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("old_0.bmp"), b"stale").unwrap();

        let status = prepare_output_dir(&out, |_| Ok(true)).unwrap();
        assert_eq!(status, OutputDirStatus::Recreated);
        assert!(out.is_dir());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);

        // Running again with approval ends in the same state
        let status = prepare_output_dir(&out, |_| Ok(true)).unwrap();
        assert_eq!(status, OutputDirStatus::Recreated);
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_prepare_declined_leaves_contents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("keep.bmp"), b"keep").unwrap();

        let status = prepare_output_dir(&out, |_| Ok(false)).unwrap();
        assert_eq!(status, OutputDirStatus::Declined);
        assert!(out.join("keep.bmp").exists());
    }

    #[test]
    fn test_prepare_fails_on_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::write(&out, b"not a dir").unwrap();

        let err = prepare_output_dir(&out, |_| Ok(true)).unwrap_err();
        assert!(matches!(err, StorageError::NotCleared(_)));
    }

    #[test]
    fn test_prepare_prompt_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = prepare_output_dir(dir.path(), |_| {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "closed"))
        })
        .unwrap_err();
        assert!(matches!(err, StorageError::PromptFailed(_)));
    }
}
