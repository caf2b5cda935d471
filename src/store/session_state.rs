// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::atomic::{write_atomic, AtomicWriteError, WriteDurability};
use crate::model::DocumentKind;

const STATE_FILENAME: &str = "state.json";

/// What a later process needs to pick up the document a previous one loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub current_file: PathBuf,
    /// SHA-256 (hex) of the file content as last loaded or saved by xqr.
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub kind: Option<DocumentKind>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Write(#[from] AtomicWriteError),
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("json error at {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The per-user record of the last successfully loaded document.
///
/// This is advisory state: reads that fail for any reason are treated as "no session" and
/// callers are expected to log (not propagate) write failures.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state_dir: PathBuf,
    durability: WriteDurability,
}

impl SessionStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self { state_dir: state_dir.into(), durability: WriteDurability::Fast }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_dir.join(STATE_FILENAME)
    }

    pub fn record_loaded(
        &self,
        path: &Path,
        fingerprint: Option<&str>,
        kind: Option<DocumentKind>,
    ) -> Result<(), StoreError> {
        let record = SessionRecord {
            current_file: absolute_path(path),
            fingerprint: fingerprint.map(str::to_owned),
            kind,
        };
        let state_path = self.state_path();
        let mut json = serde_json::to_string_pretty(&record)
            .map_err(|source| StoreError::Json { path: state_path.clone(), source })?;
        json.push('\n');
        write_atomic(&state_path, json.as_bytes(), self.durability)?;
        tracing::debug!(path = %record.current_file.display(), "session record updated");
        Ok(())
    }

    pub fn current(&self) -> Option<SessionRecord> {
        match self.read() {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(error = %err, "ignoring unreadable session record");
                None
            }
        }
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.current().map(|record| record.current_file)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        let state_path = self.state_path();
        match fs::remove_file(&state_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path: state_path, source }),
        }
    }

    fn read(&self) -> Result<Option<SessionRecord>, StoreError> {
        let state_path = self.state_path();
        let raw = match fs::read_to_string(&state_path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path: state_path, source }),
        };
        let record: SessionRecord = serde_json::from_str(&raw)
            .map_err(|source| StoreError::Json { path: state_path, source })?;
        if record.current_file.as_os_str().is_empty() {
            return Ok(None);
        }
        Ok(Some(record))
    }
}

fn absolute_path(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
