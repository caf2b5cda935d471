// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Xqr: query and edit SVG, HTML and XML documents with XPath or CSS selectors.
//!
//! One document model ([`model::Document`]) and one dispatcher ([`ops::Workspace`]) sit behind
//! three front ends: the one-shot CLI in `main.rs`, the line shell in [`shell`] and the HTTP API
//! in [`server`].

pub mod cli;
pub mod config;
pub mod format;
pub mod model;
pub mod ops;
pub mod query;
pub mod report;
pub mod server;
pub mod shell;
pub mod store;
