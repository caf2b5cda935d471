// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use memchr::memmem;
use serde::{Deserialize, Serialize};

/// Structural family of a loaded document; decides serialization and which query
/// languages apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Svg,
    Html,
    Xml,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Html => "html",
            Self::Xml => "xml",
        }
    }

    /// Extension first, then a case-insensitive sniff of the content, then `xml`.
    pub fn detect(path: Option<&Path>, content: &[u8]) -> Self {
        path.and_then(Self::from_extension).unwrap_or_else(|| Self::sniff(content))
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "svg" => Some(Self::Svg),
            "html" | "htm" => Some(Self::Html),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub fn sniff(content: &[u8]) -> Self {
        let lowered = content.to_ascii_lowercase();
        let contains = |needle: &str| memmem::find(&lowered, needle.as_bytes()).is_some();

        if contains("<svg") {
            Self::Svg
        } else if contains("<html") || contains("<!doctype html") {
            Self::Html
        } else {
            Self::Xml
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document kind {0:?} (expected svg, html or xml)")]
pub struct ParseDocumentKindError(String);

impl FromStr for DocumentKind {
    type Err = ParseDocumentKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "html" | "htm" => Ok(Self::Html),
            "xml" => Ok(Self::Xml),
            _ => Err(ParseDocumentKindError(s.to_owned())),
        }
    }
}
