// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Plain-text rendering of dispatch outcomes for the CLI and the shell.

use std::fmt::Write as _;

use crate::model::{MatchResult, Saved};
use crate::ops::{DocumentInfo, Outcome};

pub fn outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Loaded(info) => format!("Loaded {}", summary(info)),
        Outcome::Created(info) => format!("Created {}", summary(info)),
        Outcome::Value(value) => value.clone(),
        Outcome::Matches(matches) => match_list(matches),
        Outcome::Changed(true) => "Updated".to_owned(),
        Outcome::Changed(false) => "No element matched".to_owned(),
        Outcome::Saved(Saved::Written(path)) => format!("Saved to {}", path.display()),
        Outcome::Saved(Saved::Unchanged(path)) => {
            format!("No changes to save ({})", path.display())
        }
        Outcome::Saved(Saved::Stdout(content)) => content.trim_end().to_owned(),
        Outcome::BackedUp(path) => format!("Backup written to {}", path.display()),
        Outcome::Files(files) if files.is_empty() => "No documents loaded".to_owned(),
        Outcome::Files(files) => files.iter().map(summary).collect::<Vec<_>>().join("\n"),
        Outcome::Described(info) => describe(info),
    }
}

pub fn summary(info: &DocumentInfo) -> String {
    let mut line = format!("{} ({}, {} elements)", info.path, info.file_type, info.elements_count);
    if info.modified {
        line.push_str(" [modified]");
    }
    if info.lenient {
        line.push_str(" [lenient parse]");
    }
    line
}

fn describe(info: &DocumentInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "file:     {}", info.path);
    let _ = writeln!(out, "type:     {}", info.file_type);
    let _ = writeln!(out, "elements: {}", info.elements_count);
    let _ = writeln!(out, "modified: {}", if info.modified { "yes" } else { "no" });
    let _ = write!(out, "parser:   {}", if info.lenient { "lenient" } else { "strict" });
    out
}

/// One block per match: locator, tag, text and attributes.
pub fn match_list(matches: &[MatchResult]) -> String {
    if matches.is_empty() {
        return "No matches".to_owned();
    }
    let mut out = String::new();
    for (index, result) in matches.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", result.path);
        let _ = writeln!(out, "  tag:  {}", result.tag);
        let text = result.text.trim();
        if !text.is_empty() {
            let _ = writeln!(out, "  text: {text}");
        }
        if !result.attributes.is_empty() {
            let _ = writeln!(out, "  attributes: {}", result.attributes_inline());
        }
    }
    let _ = write!(out, "{} match{}", matches.len(), if matches.len() == 1 { "" } else { "es" });
    out
}

/// Numbered text of every match, as printed by `xqr FILE//XPATH`.
pub fn numbered(matches: &[MatchResult]) -> String {
    let mut out = String::new();
    for (index, result) in matches.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let text = result.text.trim();
        if text.is_empty() {
            let _ = write!(out, "{}. <{}> (no text content)", index + 1, result.tag);
        } else {
            let _ = write!(out, "{}. {text}", index + 1);
        }
    }
    out
}

const PREVIEW_CHARS: usize = 50;

/// One `xqr FILE//XPATH` line per element, followed by its attributes and a text preview.
/// With `with_ids`, elements without an `id` are skipped.
pub fn locators(file: &str, matches: &[MatchResult], with_ids: bool) -> String {
    let shown: Vec<_> =
        matches.iter().filter(|result| !with_ids || result.attributes.contains_key("id")).collect();
    if shown.is_empty() {
        return if with_ids {
            "No elements with an id attribute; try without --with-ids".to_owned()
        } else {
            "No matches".to_owned()
        };
    }

    let mut out = String::new();
    for result in &shown {
        let _ = writeln!(out, "xqr {file}{}", locator(result));
        if !result.attributes.is_empty() {
            let _ = writeln!(out, "  attributes: {}", result.attributes_inline());
        }
        let text = result.text.trim();
        if !text.is_empty() {
            let preview: String = text.chars().take(PREVIEW_CHARS).collect();
            let ellipsis = if text.chars().count() > PREVIEW_CHARS { "..." } else { "" };
            let _ = writeln!(out, "  text: {preview}{ellipsis}");
        }
        out.push('\n');
    }
    let _ = write!(out, "{} of {} elements shown", shown.len(), matches.len());
    out
}

/// Descendant expression that re-selects `result`: by id, by `xlink:href`, else by path.
fn locator(result: &MatchResult) -> String {
    if let Some(id) = result.attributes.get("id") {
        format!("//{}[@id={}]", result.tag, quoted(id))
    } else if let Some(href) = result.attributes.get("xlink:href") {
        format!("//{}[@xlink:href={}]", result.tag, quoted(href))
    } else {
        format!("/{}", result.path)
    }
}

fn quoted(value: &str) -> String {
    if value.contains('\'') {
        format!("\"{value}\"")
    } else {
        format!("'{value}'")
    }
}
