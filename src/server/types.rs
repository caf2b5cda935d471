// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON bodies of the HTTP API.

use serde::{Deserialize, Serialize};

use crate::model::{DocumentKind, MatchResult};

#[derive(Debug, Clone, Deserialize)]
pub struct LoadRequest {
    pub file_path: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryLanguage {
    #[default]
    Xpath,
    Css,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(rename = "type", default)]
    pub language: QueryLanguage,
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    Text,
    Attribute,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    pub xpath: String,
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub value: String,
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadResponse {
    pub success: bool,
    pub message: String,
    pub file_type: DocumentKind,
    pub elements_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub success: bool,
    pub elements: Vec<MatchResult>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub path: String,
    pub file_type: DocumentKind,
    pub elements_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilesResponse {
    pub success: bool,
    pub files: Vec<FileEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileResponse {
    pub success: bool,
    pub file_path: String,
    pub file_type: DocumentKind,
    pub elements_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { success: false, error: error.into() }
    }
}
