// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command-line surface of the one-shot front end.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_HOST, DEFAULT_PORT};
use crate::model::DocumentKind;
use crate::ops::{Command, DispatchError, ReadTarget, WriteTarget};
use crate::query::Expression;

#[derive(Debug, Parser)]
#[command(name = "xqr", version, about = "Query and edit SVG, HTML and XML documents")]
pub struct Cli {
    /// Directory holding the remembered current document.
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Flush writes to disk before returning (slower).
    #[arg(long, global = true)]
    pub durable_writes: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub verb: Verb,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReadKind {
    #[default]
    Text,
    Attribute,
    Markup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum WriteKind {
    #[default]
    Text,
    Attribute,
}

#[derive(Debug, Subcommand)]
pub enum Verb {
    /// Load a document and remember it as the current one.
    Load { file: PathBuf },
    /// Print the text, an attribute or the markup of the first match.
    Query {
        expression: String,
        #[arg(long = "type", value_enum, default_value_t)]
        kind: ReadKind,
        #[arg(long, value_name = "NAME")]
        attr: Option<String>,
        /// Treat the expression as a CSS selector (HTML only).
        #[arg(long)]
        css: bool,
    },
    /// Change the text or an attribute of the first match and save.
    Set {
        expression: String,
        value: String,
        #[arg(long = "type", value_enum, default_value_t)]
        kind: WriteKind,
        #[arg(long, value_name = "NAME")]
        attr: Option<String>,
        #[arg(long)]
        css: bool,
    },
    /// Append a child element under the first match and save.
    Add {
        parent: String,
        tag: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(long = "attribute", value_name = "NAME=VALUE", value_parser = parse_pair)]
        attributes: Vec<(String, String)>,
    },
    /// Remove the first match and save.
    Remove {
        expression: String,
        #[arg(long)]
        css: bool,
    },
    /// Print path, tag, text and attributes of every match.
    #[command(alias = "ls")]
    List {
        /// List this file instead of the current document.
        file: Option<PathBuf>,
        #[arg(long, visible_alias = "pattern", conflicts_with = "css")]
        xpath: Option<String>,
        #[arg(long)]
        css: Option<String>,
        /// Only elements with an `id`, each with a ready-to-run `xqr FILE//XPATH` locator.
        #[arg(long)]
        with_ids: bool,
    },
    /// Write the current document, to its own file unless --output is given.
    Save {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Write `<file>.bak` with the content as it was loaded.
    Backup,
    /// Describe the current document.
    Info,
    /// Write a starter document and load it.
    Create {
        file: PathBuf,
        #[arg(long)]
        kind: Option<DocumentKind>,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Serve the HTTP API.
    Server {
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Start the interactive shell.
    Shell,
    /// Write example.svg, example.xml and example.html.
    Examples {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[arg(long)]
        force: bool,
    },
    /// `FILE//XPATH` prints every match; `FILE//XPATH VALUE` sets the first one and saves.
    #[command(external_subcommand)]
    Direct(Vec<String>),
}

impl Verb {
    /// The dispatcher command for this verb; `None` for verbs that drive their own workspace.
    pub fn to_command(&self) -> Result<Option<Command>, DispatchError> {
        let command = match self {
            Self::Load { file } => Command::Load { path: file.clone() },
            Self::Query { expression, kind, attr, css } => Command::Query {
                expression: Expression::with_language(expression.clone(), *css),
                target: match kind {
                    ReadKind::Text => ReadTarget::Text,
                    ReadKind::Attribute => ReadTarget::Attribute(required_attr(attr)?),
                    ReadKind::Markup => ReadTarget::Markup,
                },
            },
            Self::Set { expression, value, kind, attr, css } => Command::Set {
                expression: Expression::with_language(expression.clone(), *css),
                target: match kind {
                    WriteKind::Text => WriteTarget::Text,
                    WriteKind::Attribute => WriteTarget::Attribute(required_attr(attr)?),
                },
                value: value.clone(),
            },
            Self::Add { parent, tag, text, attributes } => Command::Add {
                parent: Expression::xpath(parent.clone()),
                tag: tag.clone(),
                text: text.clone(),
                attributes: attributes.clone(),
            },
            Self::Remove { expression, css } => Command::Remove {
                expression: Expression::with_language(expression.clone(), *css),
            },
            Self::List { xpath, css, .. } => Command::List {
                expression: match (xpath, css) {
                    (_, Some(selector)) => Some(Expression::css(selector.clone())),
                    (Some(xpath), None) => Some(Expression::xpath(xpath.clone())),
                    (None, None) => None,
                },
            },
            Self::Save { output } => Command::Save { output: output.clone() },
            Self::Backup => Command::Backup,
            Self::Info => Command::Describe,
            Self::Create { file, kind, force } => {
                Command::Create { path: file.clone(), kind: *kind, force: *force }
            }
            Self::Server { .. } | Self::Shell | Self::Examples { .. } | Self::Direct(_) => {
                return Ok(None)
            }
        };
        Ok(Some(command))
    }
}

/// `xqr FILE//XPATH [VALUE]`: one file, one expression, no session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectOperation {
    pub path: PathBuf,
    pub expression: Expression,
    /// New text for the first match; reads every match when absent.
    pub value: Option<String>,
}

impl DirectOperation {
    /// `args` as captured after the binary name. A locator without `//` selects `//*` and must
    /// name an existing file, so a mistyped verb stays a usage error.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let (locator, value) = match args {
            [locator] => (locator, None),
            [locator, value] => (locator, Some(value.clone())),
            _ => return Err(format!("expected FILE//XPATH [VALUE], got {} arguments", args.len())),
        };
        let (file, xpath) = match locator.split_once("//") {
            Some((file, rest)) => (file, format!("//{rest}")),
            None if Path::new(locator).is_file() => (locator.as_str(), "//*".to_owned()),
            None => return Err(format!("unrecognized subcommand or file {locator:?}")),
        };
        if file.is_empty() {
            return Err(format!("no file in {locator:?}; expected FILE//XPATH"));
        }
        Ok(Self { path: PathBuf::from(file), expression: Expression::xpath(xpath), value })
    }

    pub fn commands(&self) -> [Command; 2] {
        let operation = match &self.value {
            Some(value) => Command::Set {
                expression: self.expression.clone(),
                target: WriteTarget::Text,
                value: value.clone(),
            },
            None => Command::List { expression: Some(self.expression.clone()) },
        };
        [Command::Load { path: self.path.clone() }, operation]
    }
}

fn required_attr(attr: &Option<String>) -> Result<String, DispatchError> {
    attr.clone().ok_or(DispatchError::MissingArgument { name: "--attr" })
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected NAME=VALUE, got {raw:?}")),
    }
}

#[cfg(test)]
mod tests;
