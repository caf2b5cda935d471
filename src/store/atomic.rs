// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Crash-safe file replacement shared by document saves, backups and the session record.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// How hard a write tries to reach stable storage before reporting success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteDurability {
    /// Write + rename; no fsync.
    #[default]
    Fast,
    /// Additionally fsync the temp file and (on unix) its directory.
    Durable,
}

#[derive(Debug, thiserror::Error)]
#[error("io error at {path:?}: {source}")]
pub struct AtomicWriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl AtomicWriteError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self { path: path.to_path_buf(), source }
    }
}

/// Replaces `path` with `contents` without ever exposing a truncated file.
///
/// The bytes go to a hidden temp file next to the target which is then renamed over it, so a
/// failed write leaves the previous content in place. Missing parent directories are created.
/// A symlinked target is resolved first so the link itself survives.
pub fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), AtomicWriteError> {
    let path = resolve_symlink(path)?;
    let path = path.as_path();

    let Some(file_name) = path.file_name() else {
        return Err(AtomicWriteError::new(path, io::Error::other("path has no file name")));
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    fs::create_dir_all(&parent).map_err(|source| AtomicWriteError::new(&parent, source))?;

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let tmp_path = parent.join(format!(
        ".xqr.tmp.{}.{}.{nanos}",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| AtomicWriteError::new(&tmp_path, source))?;

    let written = file.write_all(contents).and_then(|()| {
        if durability == WriteDurability::Durable {
            file.sync_all()
        } else {
            Ok(())
        }
    });
    drop(file);
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(AtomicWriteError::new(&tmp_path, source));
    }

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(AtomicWriteError::new(path, source));
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir =
                fs::File::open(&parent).map_err(|source| AtomicWriteError::new(&parent, source))?;
            dir.sync_all().map_err(|source| AtomicWriteError::new(&parent, source))?;
        }
    }

    Ok(())
}

fn resolve_symlink(path: &Path) -> Result<PathBuf, AtomicWriteError> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            fs::canonicalize(path).map_err(|source| AtomicWriteError::new(path, source))
        }
        Ok(_) => Ok(path.to_path_buf()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(source) => Err(AtomicWriteError::new(path, source)),
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}
