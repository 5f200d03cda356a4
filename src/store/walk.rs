//! Key enumeration
//!
//! Keys are enumerated by walking the base directory and yielding the
//! file name of every leaf file. The walk is lazy, finite, and not
//! restartable; under concurrent mutation it is a best-effort snapshot,
//! so walk errors (e.g. a directory pruned mid-walk) are skipped rather
//! than surfaced.

use std::path::Path;

use walkdir::WalkDir;

/// Lazy iterator over the store's keys, in unspecified order
pub struct Keys {
    walker: walkdir::IntoIter,
    prefix: Option<String>,
}

impl Iterator for Keys {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(prefix) = &self.prefix {
                if !name.starts_with(prefix.as_str()) {
                    continue;
                }
            }
            return Some(name);
        }
    }
}

/// Walk every key under `base`
pub(crate) fn walk(base: &Path) -> Keys {
    Keys {
        walker: WalkDir::new(base).into_iter(),
        prefix: None,
    }
}

/// Walk every key under `base` whose name starts with `prefix`
pub(crate) fn walk_prefix(base: &Path, prefix: &str) -> Keys {
    Keys {
        walker: WalkDir::new(base).into_iter(),
        prefix: Some(prefix.to_string()),
    }
}
