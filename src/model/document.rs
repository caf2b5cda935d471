// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use sxd_document::dom::{self, ChildOfElement, ChildOfRoot};
use sxd_document::{Package, QName};

use super::matches::{attribute_name, XLINK_NAMESPACE, XML_NAMESPACE};
use super::{DocumentError, DocumentKind, MatchResult};
use crate::format::{self, ParseBackend, Prolog};
use crate::query::{self, Expression, Hit};
use crate::store::{write_atomic, WriteDurability};

/// Where a document was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    File(PathBuf),
    Stdin,
}

impl Source {
    /// `-` means standard input.
    pub fn from_arg(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stdin => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("-"),
        }
    }
}

/// Result of [`Document::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Saved {
    Written(PathBuf),
    /// Nothing changed and the target is the document's own file.
    Unchanged(PathBuf),
    /// Stdin document without an output path; the rendered markup is handed back.
    Stdout(String),
}

impl Saved {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Written(path) | Self::Unchanged(path) => Some(path),
            Self::Stdout(_) => None,
        }
    }
}

/// SHA-256 of `bytes` as lower-case hex.
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// A parsed markup document plus everything needed to write it back.
pub struct Document {
    source: Source,
    kind: DocumentKind,
    original: String,
    package: Package,
    backend: ParseBackend,
    prolog: Prolog,
    /// Changes not yet written to the backing file.
    dirty: bool,
    /// Any change since load, saved or not.
    edited: bool,
    fingerprint: String,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("source", &self.source)
            .field("kind", &self.kind)
            .field("backend", &self.backend)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Document {
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let source = Source::from_arg(path);
        let bytes = match &source {
            Source::Stdin => {
                let mut buffer = Vec::new();
                io::stdin()
                    .read_to_end(&mut buffer)
                    .map_err(|source| DocumentError::Io { path: PathBuf::from("-"), source })?;
                buffer
            }
            Source::File(path) => std::fs::read(path).map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => DocumentError::NotFound { path: path.clone() },
                _ => DocumentError::Io { path: path.clone(), source: err },
            })?,
        };
        Self::from_bytes(source, bytes)
    }

    pub fn from_bytes(source: Source, bytes: Vec<u8>) -> Result<Self, DocumentError> {
        let kind = DocumentKind::detect(source.path(), &bytes);
        let fingerprint = fingerprint(&bytes);
        let original = String::from_utf8(bytes).map_err(|err| DocumentError::Parse {
            source_name: source.to_string(),
            detail: format!("content is not valid UTF-8: {err}"),
        })?;
        let parsed = format::parse(kind, &original).map_err(|detail| DocumentError::Parse {
            source_name: source.to_string(),
            detail,
        })?;

        tracing::debug!(%source, %kind, backend = %parsed.backend, "document loaded");
        Ok(Self {
            source,
            kind,
            original,
            package: parsed.package,
            backend: parsed.backend,
            prolog: parsed.prolog,
            dirty: false,
            edited: false,
            fingerprint,
        })
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn path(&self) -> Option<&Path> {
        self.source.path()
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn backend(&self) -> ParseBackend {
        self.backend
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Hash of the backing file content as last loaded or saved.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn element_count(&self) -> usize {
        let doc = self.package.as_document();
        let mut stack: Vec<dom::Element<'_>> = doc
            .root()
            .children()
            .into_iter()
            .filter_map(|child| match child {
                ChildOfRoot::Element(element) => Some(element),
                _ => None,
            })
            .collect();
        let mut count = 0;
        while let Some(element) = stack.pop() {
            count += 1;
            stack.extend(element.children().into_iter().filter_map(|child| match child {
                ChildOfElement::Element(element) => Some(element),
                _ => None,
            }));
        }
        count
    }

    pub fn query(&self, expression: &Expression) -> Result<Vec<MatchResult>, DocumentError> {
        let doc = self.package.as_document();
        let hits = query::select(&doc, self.kind, expression)?;
        Ok(hits.into_iter().map(MatchResult::from_hit).collect())
    }

    /// Every element when no expression is given.
    pub fn list(&self, expression: Option<&Expression>) -> Result<Vec<MatchResult>, DocumentError> {
        match expression {
            Some(expression) => self.query(expression),
            None => self.query(&Expression::xpath("//*")),
        }
    }

    pub fn read_text(&self, expression: &Expression) -> Result<String, DocumentError> {
        let doc = self.package.as_document();
        let hits = query::select(&doc, self.kind, expression)?;
        Ok(hits.first().map(|hit| hit.text()).unwrap_or_default())
    }

    pub fn read_attribute(
        &self,
        expression: &Expression,
        name: &str,
    ) -> Result<String, DocumentError> {
        let doc = self.package.as_document();
        let hits = query::select(&doc, self.kind, expression)?;
        Ok(hits
            .first()
            .and_then(|hit| hit.element())
            .and_then(|element| find_attribute(element, name))
            .map(|attribute| attribute.value().to_owned())
            .unwrap_or_default())
    }

    pub fn read_markup(&self, expression: &Expression) -> Result<String, DocumentError> {
        let doc = self.package.as_document();
        let hits = query::select(&doc, self.kind, expression)?;
        Ok(match hits.first() {
            Some(Hit::Element(element)) => format::element_markup(*element, self.kind),
            Some(other) => other.text(),
            None => String::new(),
        })
    }

    pub fn set_text(
        &mut self,
        expression: &Expression,
        value: &str,
    ) -> Result<bool, DocumentError> {
        let changed = {
            let doc = self.package.as_document();
            let hits = query::select(&doc, self.kind, expression)?;
            match hits.first() {
                Some(hit) => {
                    hit.set_text(value);
                    true
                }
                None => false,
            }
        };
        self.mark_changed(changed);
        Ok(changed)
    }

    pub fn set_attribute(
        &mut self,
        expression: &Expression,
        name: &str,
        value: &str,
    ) -> Result<bool, DocumentError> {
        let changed = {
            let doc = self.package.as_document();
            let hits = query::select(&doc, self.kind, expression)?;
            match hits.first().and_then(|hit| hit.element()) {
                Some(element) => {
                    // Any name already on the element is overwritten as written.
                    match find_attribute(element, name) {
                        Some(existing) => {
                            let prefix = existing.preferred_prefix();
                            let updated = element.set_attribute_value(existing.name(), value);
                            updated.set_preferred_prefix(prefix);
                        }
                        None => {
                            element.set_attribute_value(attribute_qname(name)?, value);
                        }
                    }
                    true
                }
                None => false,
            }
        };
        self.mark_changed(changed);
        Ok(changed)
    }

    /// Appends `<tag>` under the first match. The new element takes the parent's namespace.
    pub fn add_child(
        &mut self,
        parent: &Expression,
        tag: &str,
        text: Option<&str>,
        attributes: &[(String, String)],
    ) -> Result<bool, DocumentError> {
        if !is_valid_name(tag) {
            return Err(DocumentError::InvalidName { name: tag.to_owned() });
        }
        let attribute_names = attributes
            .iter()
            .map(|(name, _)| attribute_qname(name))
            .collect::<Result<Vec<_>, _>>()?;

        let changed = {
            let doc = self.package.as_document();
            let hits = query::select(&doc, self.kind, parent)?;
            match hits.first().and_then(|hit| hit.element()) {
                Some(parent) => {
                    let child = match parent.name().namespace_uri() {
                        Some(namespace) => doc.create_element((namespace, tag)),
                        None => doc.create_element(tag),
                    };
                    if let Some(prefix) = parent.preferred_prefix() {
                        child.set_preferred_prefix(Some(prefix));
                    }
                    for (qname, (_, value)) in attribute_names.into_iter().zip(attributes) {
                        child.set_attribute_value(qname, value);
                    }
                    if let Some(text) = text.filter(|text| !text.is_empty()) {
                        child.set_text(text);
                    }
                    parent.append_child(child);
                    true
                }
                None => false,
            }
        };
        self.mark_changed(changed);
        Ok(changed)
    }

    /// Removes the first match: an element (never the document element) or an attribute.
    pub fn remove_node(&mut self, expression: &Expression) -> Result<bool, DocumentError> {
        let changed = {
            let doc = self.package.as_document();
            let hits = query::select(&doc, self.kind, expression)?;
            hits.first().is_some_and(|hit| hit.remove())
        };
        self.mark_changed(changed);
        Ok(changed)
    }

    pub fn render(&self) -> Result<String, DocumentError> {
        let doc = self.package.as_document();
        format::serialize(&doc, self.kind, &self.prolog).map_err(|source| {
            DocumentError::Io {
                path: self.path().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("-")),
                source,
            }
        })
    }

    /// Writes the document to `output`, or back to its own file.
    ///
    /// A clean document saved onto its own file is left alone; saved elsewhere it is copied
    /// byte for byte.
    pub fn save(
        &mut self,
        output: Option<&Path>,
        durability: WriteDurability,
    ) -> Result<Saved, DocumentError> {
        let own_path = self.path().map(Path::to_path_buf);
        let target = match (output, own_path.as_deref()) {
            (Some(output), _) => output.to_path_buf(),
            (None, Some(own)) => own.to_path_buf(),
            (None, None) => return Ok(Saved::Stdout(self.render()?)),
        };
        let onto_own = own_path.as_deref().is_some_and(|own| same_file(own, &target));

        if onto_own && !self.dirty {
            tracing::debug!(path = %target.display(), "save skipped; no changes");
            return Ok(Saved::Unchanged(target));
        }

        let content = if self.edited { self.render()? } else { self.original.clone() };
        write_atomic(&target, content.as_bytes(), durability)?;
        tracing::debug!(path = %target.display(), bytes = content.len(), "document saved");

        if onto_own {
            self.dirty = false;
            self.fingerprint = fingerprint(content.as_bytes());
        }
        Ok(Saved::Written(target))
    }

    /// Writes the content as loaded to `<file>.bak`, whatever has changed since.
    pub fn backup(&self, durability: WriteDurability) -> Result<PathBuf, DocumentError> {
        let path = self.path().ok_or(DocumentError::NoBackingFile)?;
        let mut name = path.as_os_str().to_owned();
        name.push(".bak");
        let backup = PathBuf::from(name);
        write_atomic(&backup, self.original.as_bytes(), durability)?;
        tracing::debug!(path = %backup.display(), "backup written");
        Ok(backup)
    }

    fn mark_changed(&mut self, changed: bool) {
        if changed {
            self.dirty = true;
            self.edited = true;
        }
    }
}

fn same_file(left: &Path, right: &Path) -> bool {
    if left == right {
        return true;
    }
    match (std::fs::canonicalize(left), std::fs::canonicalize(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

fn find_attribute<'d>(element: dom::Element<'d>, name: &str) -> Option<dom::Attribute<'d>> {
    element.attributes().into_iter().find(|attribute| attribute_name(*attribute) == name)
}

fn attribute_qname(name: &str) -> Result<QName<'_>, DocumentError> {
    let invalid = || DocumentError::InvalidName { name: name.to_owned() };
    match name.split_once(':') {
        None if is_valid_name(name) => Ok(QName::new(name)),
        Some(("xlink", local)) if is_valid_name(local) => {
            Ok(QName::with_namespace_uri(Some(XLINK_NAMESPACE), local))
        }
        Some(("xml", local)) if is_valid_name(local) => {
            Ok(QName::with_namespace_uri(Some(XML_NAMESPACE), local))
        }
        _ => Err(invalid()),
    }
}

/// XML NCName, which also covers HTML custom elements and `data-*` attributes.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
