// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::store::{SessionStore, WriteDurability};

pub const STATE_DIR_ENV: &str = "XQR_STATE_DIR";
pub const LOG_ENV: &str = "XQR_LOG";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub state_dir: PathBuf,
    pub durability: WriteDurability,
}

impl Config {
    /// Flag value first, then `XQR_STATE_DIR`, then the platform default.
    pub fn resolve(explicit_state_dir: Option<&Path>, durable_writes: bool) -> Self {
        let state_dir = resolve_state_dir(
            explicit_state_dir,
            std::env::var_os(STATE_DIR_ENV),
            dirs::state_dir(),
        );
        let durability =
            if durable_writes { WriteDurability::Durable } else { WriteDurability::Fast };
        Self { state_dir, durability }
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(&self.state_dir).with_durability(self.durability)
    }
}

/// Resolve the session state directory:
/// 1. explicit path (with tilde expansion)
/// 2. `XQR_STATE_DIR` (with tilde expansion)
/// 3. platform state directory + `xqr`
/// 4. `~/.local/state/xqr`, or `.xqr` in the working directory without a home
pub fn resolve_state_dir(
    explicit: Option<&Path>,
    env: Option<OsString>,
    platform: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = explicit {
        return expand_tilde(path);
    }
    if let Some(env_path) = env.filter(|value| !value.is_empty()) {
        return expand_tilde(Path::new(&env_path));
    }
    if let Some(state_dir) = platform {
        return state_dir.join("xqr");
    }
    match dirs::home_dir() {
        Some(home) => home.join(".local").join("state").join("xqr"),
        None => PathBuf::from(".xqr"),
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

/// Address for the HTTP server.
pub fn server_addr(host: &str, port: u16) -> Result<SocketAddr, std::net::AddrParseError> {
    let host = if host == "localhost" { DEFAULT_HOST } else { host };
    format!("{host}:{port}").parse().or_else(|err| {
        // Bare IPv6 literal.
        format!("[{host}]:{port}").parse().map_err(|_| err)
    })
}
