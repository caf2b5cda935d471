// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interactive line-oriented front end.
//!
//! The first whitespace token of a line is the verb; the last argument of each verb takes the
//! rest of the line, so `set //title New Value Here` sets `New Value Here`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::ops::{Command, ReadTarget, Workspace, WriteTarget};
use crate::query::Expression;
use crate::report;

pub const PROMPT: &str = "xqr> ";

const HELP: &str = "\
Commands:
  load <file>                      load a document (replaces the current one)
  query|get <xpath>                print the text of the first match
  css <selector>                   list elements matching a CSS selector (HTML only)
  attr <xpath> <name>              print an attribute of the first match
  set <xpath> <value>              set the text of the first match
  setattr <xpath> <name> <value>   set an attribute on the first match
  add <parent> <tag> [text]        append a child element under the first match
  remove|rm <xpath>                remove the first match
  list|ls [xpath]                  list matches (every element by default)
  save [path]                      write the document
  backup                           write <file>.bak with the content as loaded
  info                             describe the current document
  help                             show this text
  exit|quit                        leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Run(Command),
    Help,
    Exit,
    Nothing,
}

/// Turns one input line into an [`Action`]; `Err` carries a usage message.
pub fn parse_line(line: &str) -> Result<Action, String> {
    let mut tokens = line.split_whitespace();
    let Some(verb) = tokens.next() else {
        return Ok(Action::Nothing);
    };
    let args: Vec<&str> = tokens.collect();
    let rest = |from: usize| args.get(from..).map(|tail| tail.join(" ")).unwrap_or_default();
    let usage = |text: &str| Err(format!("usage: {text}"));

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Action::Help),
        "exit" | "quit" => return Ok(Action::Exit),
        "load" if !args.is_empty() => Command::Load { path: PathBuf::from(rest(0)) },
        "load" => return usage("load <file>"),
        "query" | "get" if !args.is_empty() => Command::Query {
            expression: Expression::xpath(rest(0)),
            target: ReadTarget::Text,
        },
        "query" | "get" => return usage("query <xpath>"),
        "css" if !args.is_empty() => Command::List { expression: Some(Expression::css(rest(0))) },
        "css" => return usage("css <selector>"),
        "attr" if args.len() >= 2 => Command::Query {
            expression: Expression::xpath(args[0]),
            target: ReadTarget::Attribute(rest(1)),
        },
        "attr" => return usage("attr <xpath> <name>"),
        "set" if args.len() >= 2 => Command::Set {
            expression: Expression::xpath(args[0]),
            target: WriteTarget::Text,
            value: rest(1),
        },
        "set" => return usage("set <xpath> <value>"),
        "setattr" if args.len() >= 3 => Command::Set {
            expression: Expression::xpath(args[0]),
            target: WriteTarget::Attribute(args[1].to_owned()),
            value: rest(2),
        },
        "setattr" => return usage("setattr <xpath> <name> <value>"),
        "add" if args.len() >= 2 => Command::Add {
            parent: Expression::xpath(args[0]),
            tag: args[1].to_owned(),
            text: Some(rest(2)).filter(|text| !text.is_empty()),
            attributes: Vec::new(),
        },
        "add" => return usage("add <parent> <tag> [text]"),
        "remove" | "rm" if !args.is_empty() => {
            Command::Remove { expression: Expression::xpath(rest(0)) }
        }
        "remove" | "rm" => return usage("remove <xpath>"),
        "list" | "ls" => Command::List {
            expression: Some(rest(0)).filter(|expr| !expr.is_empty()).map(Expression::xpath),
        },
        "save" => {
            Command::Save { output: Some(rest(0)).filter(|p| !p.is_empty()).map(PathBuf::from) }
        }
        "backup" => Command::Backup,
        "info" => Command::Describe,
        _ => return Err(format!("unknown command {verb:?}; type `help` for a list of commands")),
    };
    Ok(Action::Run(command))
}

pub struct Shell<R, W> {
    input: R,
    output: W,
    workspace: Workspace,
    exit_armed: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(workspace: Workspace, input: R, output: W) -> Self {
        Self { input, output, workspace, exit_armed: false }
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "xqr interactive shell; type `help` for commands, `exit` to quit")?;
        if let Some(document) = self.workspace.current() {
            writeln!(self.output, "Currently loaded: {} ({})", document.source(), document.kind())?;
        }

        let mut line = String::new();
        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }
            if !self.handle_line(&line)? {
                break;
            }
        }
        Ok(())
    }

    /// Returns `false` once the shell should stop.
    pub fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let action = match parse_line(line) {
            Ok(action) => action,
            Err(message) => {
                writeln!(self.output, "{message}")?;
                return Ok(true);
            }
        };

        match action {
            Action::Nothing => {}
            Action::Help => writeln!(self.output, "{HELP}")?,
            Action::Exit => {
                if self.workspace.has_unsaved_changes() && !self.exit_armed {
                    self.exit_armed = true;
                    writeln!(
                        self.output,
                        "Unsaved changes will be lost; `exit` again to quit or `save` first"
                    )?;
                    return Ok(true);
                }
                writeln!(self.output, "Goodbye!")?;
                return Ok(false);
            }
            Action::Run(command) => {
                if matches!(command, Command::Load { .. }) && self.workspace.has_unsaved_changes() {
                    writeln!(self.output, "Warning: discarding unsaved changes")?;
                }
                match self.workspace.execute(command) {
                    Ok(outcome) => writeln!(self.output, "{}", report::outcome(&outcome))?,
                    Err(err) => writeln!(self.output, "Error: {err}")?,
                }
            }
        }
        self.exit_armed = false;
        Ok(true)
    }

    pub fn into_workspace(self) -> Workspace {
        self.workspace
    }
}

#[cfg(test)]
mod tests;
