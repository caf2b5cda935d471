// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The thread that owns the server's workspace.
//!
//! Parsed trees are not `Send`, so the workspace is built on, and never leaves, one OS thread.
//! Handlers send it jobs and await the reply; jobs run strictly one after another.

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tokio::sync::{mpsc, oneshot};

use crate::ops::{Command, DispatchError, Outcome, Workspace};

type Reply = Result<Outcome, DispatchError>;

struct Job {
    target: Option<String>,
    command: Command,
    reply: oneshot::Sender<Reply>,
}

/// Cloneable handle for submitting commands to the workspace thread.
#[derive(Debug, Clone)]
pub struct WorkspaceHandle {
    jobs: mpsc::UnboundedSender<Job>,
}

impl WorkspaceHandle {
    /// Starts the worker thread; `build` runs on it to create the workspace.
    pub fn spawn<F>(build: F) -> std::io::Result<Self>
    where
        F: FnOnce() -> Workspace + Send + 'static,
    {
        let (jobs, mut receiver) = mpsc::unbounded_channel::<Job>();
        thread::Builder::new().name("xqr-workspace".to_owned()).spawn(move || {
            let mut workspace = build();
            tracing::debug!("workspace worker started");
            while let Some(job) = receiver.blocking_recv() {
                let Job { target, command, reply } = job;
                let name = command.name();
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    workspace.execute_on(target.as_deref(), command)
                }))
                .unwrap_or_else(|payload| {
                    let detail = panic_message(payload.as_ref());
                    tracing::error!(command = name, %detail, "command panicked");
                    Err(DispatchError::Internal(format!("{name} failed: {detail}")))
                });
                // The requester may have gone away; nothing to do then.
                let _ = reply.send(result);
            }
            tracing::debug!("workspace worker stopped");
        })?;
        Ok(Self { jobs })
    }

    pub async fn execute(&self, target: Option<String>, command: Command) -> Reply {
        let (reply, response) = oneshot::channel();
        self.jobs
            .send(Job { target, command, reply })
            .map_err(|_| DispatchError::Internal("workspace worker is not running".to_owned()))?;
        response.await.map_err(|_| {
            DispatchError::Internal("workspace worker dropped the request".to_owned())
        })?
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_owned()
    }
}
