// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io;
use std::path::PathBuf;

use super::DocumentKind;
use crate::store::AtomicWriteError;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("cannot parse {source_name}: {detail}")]
    Parse { source_name: String, detail: String },
    #[error("invalid expression {expression:?}: {detail}")]
    InvalidExpression { expression: String, detail: String },
    #[error("CSS selectors work only with HTML documents (this document is {kind})")]
    UnsupportedQuery { kind: DocumentKind },
    #[error("invalid element name {name:?}")]
    InvalidName { name: String },
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("document read from stdin has no backing file")]
    NoBackingFile,
}

impl DocumentError {
    pub(crate) fn invalid_expression(expression: &str, detail: impl Into<String>) -> Self {
        Self::InvalidExpression { expression: expression.to_owned(), detail: detail.into() }
    }
}

impl From<AtomicWriteError> for DocumentError {
    fn from(err: AtomicWriteError) -> Self {
        Self::Io { path: err.path, source: err.source }
    }
}
