// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Xqr CLI entrypoint.
//!
//! Each invocation runs one verb against the document remembered in the state directory.
//! `shell` keeps a document in memory across commands; `server` serves the HTTP API.
//! `xqr FILE//XPATH [VALUE]` reads or edits one file without touching the remembered one.

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use xqr::cli::{Cli, DirectOperation, Verb};
use xqr::config::{self, Config};
use xqr::model::DocumentKind;
use xqr::ops::{Command, Outcome, SlotMode, Workspace};
use xqr::shell::Shell;
use xqr::{report, server};

fn main() -> ExitCode {
    // Usage errors exit with status 2 inside clap.
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("xqr: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(config::LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::resolve(cli.state_dir.as_deref(), cli.durable_writes);
    tracing::debug!(state_dir = %config.state_dir.display(), "configuration resolved");

    match &cli.verb {
        Verb::Server { host, port } => {
            let addr = config::server_addr(host, *port)
                .with_context(|| format!("invalid server address {host}:{port}"))?;
            let durability = config.durability;
            server::run(addr, move || Workspace::new(SlotMode::Keyed).with_durability(durability))
                .with_context(|| format!("cannot serve on {addr}"))?;
            return Ok(ExitCode::SUCCESS);
        }
        Verb::Shell => {
            let workspace = Workspace::new(SlotMode::Single)
                .with_durability(config.durability)
                .with_session(config.session_store());
            Shell::new(workspace, io::stdin().lock(), io::stdout().lock()).run()?;
            return Ok(ExitCode::SUCCESS);
        }
        Verb::Direct(args) => {
            let operation = match DirectOperation::parse(args) {
                Ok(operation) => operation,
                Err(message) => Cli::command().error(ErrorKind::InvalidSubcommand, message).exit(),
            };
            return direct(&config, &operation);
        }
        Verb::Examples { dir, force } => return examples(&config, dir, *force),
        Verb::List { file: Some(file), with_ids, .. } => {
            let Some(list) = cli.verb.to_command()? else {
                return Ok(ExitCode::SUCCESS);
            };
            let mut workspace = detached(&config);
            workspace.execute(Command::Load { path: file.clone() })?;
            let Outcome::Matches(matches) = workspace.execute(list)? else {
                return Ok(ExitCode::SUCCESS);
            };
            println!("{}", report::locators(&file.display().to_string(), &matches, *with_ids));
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let Some(command) = cli.verb.to_command()? else {
        return Ok(ExitCode::SUCCESS);
    };
    // The tree dies with the process, so changes are written back at once.
    let autosave = matches!(cli.verb, Verb::Set { .. } | Verb::Add { .. } | Verb::Remove { .. });
    let mut workspace = Workspace::new(SlotMode::Single)
        .with_durability(config.durability)
        .with_autosave(autosave)
        .with_stdin(true)
        .with_session(config.session_store());

    let outcome = workspace.execute(command)?;
    if let (Verb::List { with_ids: true, .. }, Outcome::Matches(matches)) = (&cli.verb, &outcome) {
        let Outcome::Described(info) = workspace.execute(Command::Describe)? else {
            return Ok(ExitCode::SUCCESS);
        };
        println!("{}", report::locators(&info.path, matches, true));
        return Ok(ExitCode::SUCCESS);
    }
    if outcome == Outcome::Changed(false) {
        eprintln!("xqr: {}", report::outcome(&outcome));
        return Ok(ExitCode::FAILURE);
    }
    println!("{}", report::outcome(&outcome));
    Ok(ExitCode::SUCCESS)
}

/// A single-slot workspace that never reads or writes the remembered document.
fn detached(config: &Config) -> Workspace {
    Workspace::new(SlotMode::Single).with_durability(config.durability).with_stdin(true)
}

fn direct(config: &Config, operation: &DirectOperation) -> anyhow::Result<ExitCode> {
    let mut workspace = detached(config).with_autosave(true);
    let [load, command] = operation.commands();
    workspace.execute(load)?;
    let xpath = operation.expression.as_str();
    let file = operation.path.display();

    match workspace.execute(command)? {
        Outcome::Changed(true) if operation.value.as_deref() == Some("") => {
            println!("Deleted content of {xpath} in {file}")
        }
        Outcome::Changed(true) => println!("Updated {xpath} in {file}"),
        Outcome::Matches(matches) if !matches.is_empty() => {
            println!("{}", report::numbered(&matches))
        }
        _ => {
            eprintln!("xqr: no element matches {xpath} in {file}");
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn examples(config: &Config, dir: &Path, force: bool) -> anyhow::Result<ExitCode> {
    let mut workspace = detached(config);
    let kinds = [DocumentKind::Svg, DocumentKind::Xml, DocumentKind::Html];
    for kind in kinds {
        let path = dir.join(format!("example.{kind}"));
        let outcome = workspace
            .execute(Command::Create { path: path.clone(), kind: Some(kind), force })
            .with_context(|| format!("cannot create {}", path.display()))?;
        println!("{}", report::outcome(&outcome));
    }
    Ok(ExitCode::SUCCESS)
}
