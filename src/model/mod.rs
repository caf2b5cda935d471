// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Loaded documents and what queries return about them.

pub mod document;
pub mod error;
pub mod kind;
pub mod matches;

pub use document::{fingerprint, Document, Saved, Source};
pub use error::DocumentError;
pub use kind::{DocumentKind, ParseDocumentKindError};
pub use matches::MatchResult;
