// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP transport: a JSON API plus a small admin page, over one shared workspace.

pub mod page;
pub mod routes;
pub mod types;
pub mod worker;

use std::io;
use std::net::SocketAddr;

pub use routes::router;
pub use worker::WorkspaceHandle;

use crate::ops::Workspace;

/// Binds `addr` and serves until Ctrl-C. `build` creates the workspace on its worker thread.
pub fn run<F>(addr: SocketAddr, build: F) -> io::Result<()>
where
    F: FnOnce() -> Workspace + Send + 'static,
{
    let workspace = WorkspaceHandle::spawn(build)?;
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;
        tracing::info!(%local, "xqr server listening");
        println!("Serving on http://{local} (Ctrl-C to stop)");

        axum::serve(listener, router(workspace)).with_graceful_shutdown(shutdown_signal()).await?;
        tracing::info!("xqr server stopped");
        Ok(())
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
}
