// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command dispatch.
//!
//! Every front end turns its input into a [`Command`] and runs it against a [`Workspace`], the
//! explicit session object that owns the loaded documents. Only the path and fingerprint of the
//! current document outlive the process, through the [`SessionStore`].

pub mod templates;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::format::ParseBackend;
use crate::model::{fingerprint, Document, DocumentError, DocumentKind, MatchResult, Saved, Source};
use crate::query::Expression;
use crate::store::{write_atomic, SessionStore, WriteDurability};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadTarget {
    Text,
    Attribute(String),
    Markup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteTarget {
    Text,
    Attribute(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load {
        path: PathBuf,
    },
    Query {
        expression: Expression,
        target: ReadTarget,
    },
    Set {
        expression: Expression,
        target: WriteTarget,
        value: String,
    },
    Add {
        parent: Expression,
        tag: String,
        text: Option<String>,
        attributes: Vec<(String, String)>,
    },
    Remove {
        expression: Expression,
    },
    List {
        expression: Option<Expression>,
    },
    Save {
        output: Option<PathBuf>,
    },
    Backup,
    Files,
    Describe,
    Create {
        path: PathBuf,
        kind: Option<DocumentKind>,
        force: bool,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Load { .. } => "load",
            Self::Query { .. } => "query",
            Self::Set { .. } => "set",
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::List { .. } => "list",
            Self::Save { .. } => "save",
            Self::Backup => "backup",
            Self::Files => "files",
            Self::Describe => "describe",
            Self::Create { .. } => "create",
        }
    }

    fn mutates(&self) -> bool {
        matches!(self, Self::Set { .. } | Self::Add { .. } | Self::Remove { .. })
    }
}

/// Summary of one loaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    pub key: String,
    pub path: String,
    pub file_type: DocumentKind,
    pub elements_count: usize,
    pub modified: bool,
    pub lenient: bool,
}

impl DocumentInfo {
    fn of(key: &str, document: &Document) -> Self {
        Self {
            key: key.to_owned(),
            path: document.source().to_string(),
            file_type: document.kind(),
            elements_count: document.element_count(),
            modified: document.is_dirty(),
            lenient: document.backend() == ParseBackend::Lenient,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Loaded(DocumentInfo),
    Value(String),
    Matches(Vec<MatchResult>),
    /// Result of set/add/remove; `false` means nothing matched.
    Changed(bool),
    Saved(Saved),
    BackedUp(PathBuf),
    Files(Vec<DocumentInfo>),
    Described(DocumentInfo),
    Created(DocumentInfo),
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no document loaded; run `load <file>` first")]
    NoDocumentLoaded,
    #[error("{} must be loaded again: {reason}", path.display())]
    ReloadRequired { path: PathBuf, reason: String },
    #[error("document {key:?} is not loaded")]
    UnknownDocument { key: String },
    #[error("{} already exists", path.display())]
    AlreadyExists { path: PathBuf },
    #[error("documents can be read from stdin only by a one-shot command")]
    StdinUnavailable,
    #[error("missing argument: {name}")]
    MissingArgument { name: &'static str },
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// How `load` treats documents that are already open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlotMode {
    /// One document at a time; `load` replaces it.
    #[default]
    Single,
    /// Documents stay open under their path; `load` adds and activates.
    Keyed,
}

#[derive(Debug, Default)]
pub struct Workspace {
    documents: BTreeMap<String, Document>,
    current: Option<String>,
    mode: SlotMode,
    session: Option<SessionStore>,
    durability: WriteDurability,
    autosave: bool,
    /// Whether `load -` may read standard input.
    stdin: bool,
    /// Why the remembered document could not be restored.
    stale: Option<(PathBuf, String)>,
}

impl Workspace {
    pub fn new(mode: SlotMode) -> Self {
        Self { mode, ..Self::default() }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    /// Write mutated documents back to their own file right away.
    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// Allow `load -`. Long-lived front ends keep this off: their stdin is not a document.
    pub fn with_stdin(mut self, stdin: bool) -> Self {
        self.stdin = stdin;
        self
    }

    /// Attaches the session record and reopens the document it points at.
    pub fn with_session(mut self, session: SessionStore) -> Self {
        if let Some(record) = session.current() {
            let path = record.current_file.clone();
            if !path.exists() {
                tracing::warn!(
                    path = %path.display(),
                    "remembered document is gone; clearing session"
                );
                if let Err(err) = session.clear() {
                    tracing::warn!(error = %err, "failed to clear session state");
                }
                self.stale = Some((path, "the file no longer exists".to_owned()));
            } else {
                match std::fs::read(&path) {
                    Ok(bytes) => {
                        let expected = record.fingerprint.as_deref();
                        if expected.is_some_and(|expected| expected != fingerprint(&bytes)) {
                            let reason = "the file was changed outside xqr".to_owned();
                            self.stale = Some((path, reason));
                        } else {
                            match Document::from_bytes(Source::File(path.clone()), bytes) {
                                Ok(document) => self.insert(key_for(&path), document),
                                Err(err) => self.stale = Some((path, err.to_string())),
                            }
                        }
                    }
                    Err(err) => self.stale = Some((path, err.to_string())),
                }
            }
        }
        self.session = Some(session);
        self
    }

    pub fn current(&self) -> Option<&Document> {
        self.current.as_ref().and_then(|key| self.documents.get(key))
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.documents.values().any(Document::is_dirty)
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome, DispatchError> {
        self.execute_on(None, command)
    }

    /// Runs `command` against the document loaded under `target`, or the current one.
    pub fn execute_on(
        &mut self,
        target: Option<&str>,
        command: Command,
    ) -> Result<Outcome, DispatchError> {
        tracing::debug!(command = command.name(), document = target, "dispatch");
        let mutates = command.mutates();

        match command {
            Command::Load { path } => self.load(&path).map(Outcome::Loaded),
            Command::Create { path, kind, force } => self.create(&path, kind, force),
            Command::Files => Ok(Outcome::Files(
                self.documents.iter().map(|(key, doc)| DocumentInfo::of(key, doc)).collect(),
            )),
            command => {
                let key = self.resolve(target)?;
                let outcome = self.run_on(&key, command)?;
                if mutates && self.autosave && outcome == Outcome::Changed(true) {
                    self.save(&key, None)?;
                }
                Ok(outcome)
            }
        }
    }

    fn run_on(&mut self, key: &str, command: Command) -> Result<Outcome, DispatchError> {
        let command = match command {
            Command::Save { output } => {
                return self.save(key, output.as_deref()).map(Outcome::Saved)
            }
            other => other,
        };
        let document = self
            .documents
            .get_mut(key)
            .ok_or_else(|| DispatchError::UnknownDocument { key: key.to_owned() })?;

        let outcome = match command {
            Command::Query { expression, target } => Outcome::Value(match target {
                ReadTarget::Text => document.read_text(&expression)?,
                ReadTarget::Attribute(name) => document.read_attribute(&expression, &name)?,
                ReadTarget::Markup => document.read_markup(&expression)?,
            }),
            Command::Set { expression, target, value } => Outcome::Changed(match target {
                WriteTarget::Text => document.set_text(&expression, &value)?,
                WriteTarget::Attribute(name) => {
                    document.set_attribute(&expression, &name, &value)?
                }
            }),
            Command::Add { parent, tag, text, attributes } => Outcome::Changed(
                document.add_child(&parent, &tag, text.as_deref(), &attributes)?,
            ),
            Command::Remove { expression } => Outcome::Changed(document.remove_node(&expression)?),
            Command::List { expression } => Outcome::Matches(document.list(expression.as_ref())?),
            Command::Describe => Outcome::Described(DocumentInfo::of(key, document)),
            Command::Backup => Outcome::BackedUp(document.backup(self.durability)?),
            Command::Load { .. }
            | Command::Create { .. }
            | Command::Files
            | Command::Save { .. } => {
                return Err(DispatchError::Internal(
                    "workspace-level command routed to a document".into(),
                ))
            }
        };
        Ok(outcome)
    }

    fn load(&mut self, path: &Path) -> Result<DocumentInfo, DispatchError> {
        if Source::from_arg(path) == Source::Stdin && !self.stdin {
            return Err(DispatchError::StdinUnavailable);
        }
        // Parse fully before touching the workspace so a failed load keeps the old document.
        let document = Document::load(path)?;
        let key = match document.path() {
            Some(path) => key_for(path),
            None => "-".to_owned(),
        };
        if let Some(path) = document.path() {
            self.record(path, document.fingerprint(), document.kind());
        }
        if self.mode == SlotMode::Single && self.has_unsaved_changes() {
            tracing::warn!("replacing a document with unsaved changes");
        }
        self.stale = None;
        let info = DocumentInfo::of(&key, &document);
        self.insert(key, document);
        Ok(info)
    }

    fn create(
        &mut self,
        path: &Path,
        kind: Option<DocumentKind>,
        force: bool,
    ) -> Result<Outcome, DispatchError> {
        if path.exists() && !force {
            return Err(DispatchError::AlreadyExists { path: path.to_path_buf() });
        }
        let kind = kind.or_else(|| DocumentKind::from_extension(path)).unwrap_or(DocumentKind::Xml);
        write_atomic(path, templates::starter(kind).as_bytes(), self.durability)
            .map_err(DocumentError::from)?;
        tracing::debug!(path = %path.display(), %kind, "starter document written");
        self.load(path).map(Outcome::Created)
    }

    fn save(&mut self, key: &str, output: Option<&Path>) -> Result<Saved, DispatchError> {
        let durability = self.durability;
        let document = self
            .documents
            .get_mut(key)
            .ok_or_else(|| DispatchError::UnknownDocument { key: key.to_owned() })?;
        let before = document.fingerprint().to_owned();
        let saved = document.save(output, durability)?;

        // Only a write onto the document's own file moves its fingerprint.
        if document.fingerprint() != before && self.current.as_deref() == Some(key) {
            if let Some(own) = document.path().map(Path::to_path_buf) {
                let (fingerprint, kind) = (document.fingerprint().to_owned(), document.kind());
                self.record(&own, &fingerprint, kind);
            }
        }
        Ok(saved)
    }

    fn resolve(&self, target: Option<&str>) -> Result<String, DispatchError> {
        match target {
            Some(wanted) => {
                if self.documents.contains_key(wanted) {
                    return Ok(wanted.to_owned());
                }
                let wanted_key = key_for(Path::new(wanted));
                if self.documents.contains_key(&wanted_key) {
                    Ok(wanted_key)
                } else {
                    Err(DispatchError::UnknownDocument { key: wanted.to_owned() })
                }
            }
            None => match (&self.current, &self.stale) {
                (Some(key), _) => Ok(key.clone()),
                (None, Some((path, reason))) => Err(DispatchError::ReloadRequired {
                    path: path.clone(),
                    reason: reason.clone(),
                }),
                (None, None) => Err(DispatchError::NoDocumentLoaded),
            },
        }
    }

    fn insert(&mut self, key: String, document: Document) {
        if self.mode == SlotMode::Single {
            self.documents.clear();
        }
        self.documents.insert(key.clone(), document);
        self.current = Some(key);
    }

    fn record(&self, path: &Path, fingerprint: &str, kind: DocumentKind) {
        let Some(session) = &self.session else {
            return;
        };
        if let Err(err) = session.record_loaded(path, Some(fingerprint), Some(kind)) {
            tracing::warn!(error = %err, "failed to persist session state");
        }
    }
}

/// Documents are keyed by their absolute path when it can be resolved.
fn key_for(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests;
