// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence on disk.
//!
//! Atomic file replacement used for every write xqr performs, plus the per-user session
//! record that lets a new process continue with the last loaded document.

pub mod atomic;
pub mod session_state;

pub use atomic::{write_atomic, AtomicWriteError, WriteDurability};
pub use session_state::{SessionRecord, SessionStore, StoreError};
