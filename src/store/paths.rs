//! Path resolution and directory lifecycle
//!
//! Maps keys to their on-disk location through the configured transform,
//! creates missing parent directories before writes, and prunes emptied
//! directories after erases.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::config::Options;
use crate::error::{Result, StoreError};

/// Directory that holds the given key's file
pub(crate) fn dir_for(options: &Options, key: &str) -> PathBuf {
    let mut dir = options.base_path.clone();
    for segment in (options.transform)(key) {
        dir.push(segment);
    }
    dir
}

/// Full path to the file holding the given key's value
pub(crate) fn file_for(options: &Options, key: &str) -> PathBuf {
    dir_for(options, key).join(key)
}

/// Create every missing directory on the key's path, with the configured
/// directory permissions
pub(crate) fn ensure_dirs(options: &Options, key: &str) -> Result<()> {
    let dir = dir_for(options, key);
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(options.dir_perm);
    }
    builder.create(&dir)?;
    Ok(())
}

/// Open the key's file for writing, truncating any previous contents,
/// with the configured file permissions
pub(crate) fn create_file(options: &Options, key: &str) -> Result<fs::File> {
    let mut open = fs::OpenOptions::new();
    open.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        open.mode(options.file_perm);
    }
    Ok(open.open(file_for(options, key))?)
}

/// Open the key's file for reading.
///
/// A missing file maps to `NotFound`; a path resolving to a directory
/// maps to `BadKey`, which signals a key/transform collision.
pub(crate) fn open_for_read(options: &Options, key: &str) -> Result<fs::File> {
    let path = file_for(options, key);
    let file = match fs::File::open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(StoreError::NotFound),
        Err(err) => return Err(err.into()),
    };
    if file.metadata()?.is_dir() {
        return Err(StoreError::BadKey);
    }
    Ok(file)
}

/// Delete empty directories in the path walk leading to the key,
/// deepest first, stopping at the first non-empty directory.
///
/// The walk expects every level to exist and be a directory; anything
/// else means the on-disk layout no longer matches the transform, which
/// is surfaced as `Corrupt` rather than silently skipped.
pub(crate) fn prune_dirs(options: &Options, key: &str) -> Result<()> {
    let segments = (options.transform)(key);
    for depth in (1..=segments.len()).rev() {
        let mut dir = options.base_path.clone();
        for segment in &segments[..depth] {
            dir.push(segment);
        }

        let meta = fs::metadata(&dir).map_err(|err| {
            tracing::error!(dir = %dir.display(), %err, "expected directory missing during prune");
            StoreError::Corrupt(format!(
                "expected directory {} missing during prune: {err}",
                dir.display()
            ))
        })?;
        if !meta.is_dir() {
            tracing::error!(dir = %dir.display(), "non-directory on key path during prune");
            return Err(StoreError::Corrupt(format!(
                "corrupt dirstate at {}",
                dir.display()
            )));
        }

        let mut entries = fs::read_dir(&dir)?;
        if entries.next().is_some() {
            return Ok(()); // still holds entries, stop pruning
        }
        fs::remove_dir(&dir)?;
    }
    Ok(())
}
