// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io::Cursor;
use std::path::PathBuf;

use rstest::rstest;

use super::{parse_line, Action, Shell};
use crate::ops::{Command, ReadTarget, SlotMode, Workspace, WriteTarget};
use crate::query::Expression;

#[test]
fn set_joins_trailing_tokens() {
    assert_eq!(
        parse_line("set //title New Value Here").unwrap(),
        Action::Run(Command::Set {
            expression: Expression::xpath("//title"),
            target: WriteTarget::Text,
            value: "New Value Here".to_owned(),
        })
    );
}

#[test]
fn setattr_splits_name_and_value() {
    assert_eq!(
        parse_line("  setattr //rect fill light   blue ").unwrap(),
        Action::Run(Command::Set {
            expression: Expression::xpath("//rect"),
            target: WriteTarget::Attribute("fill".to_owned()),
            value: "light blue".to_owned(),
        })
    );
}

#[rstest]
#[case(
    "get //text",
    Action::Run(Command::Query {
        expression: Expression::xpath("//text"),
        target: ReadTarget::Text,
    })
)]
#[case(
    "attr //a href",
    Action::Run(Command::Query {
        expression: Expression::xpath("//a"),
        target: ReadTarget::Attribute("href".to_owned()),
    })
)]
#[case("css ul > li", Action::Run(Command::List { expression: Some(Expression::css("ul > li")) }))]
#[case("ls", Action::Run(Command::List { expression: None }))]
#[case("rm //g/rect", Action::Run(Command::Remove { expression: Expression::xpath("//g/rect") }))]
#[case("save", Action::Run(Command::Save { output: None }))]
#[case(
    "save out/copy.svg",
    Action::Run(Command::Save { output: Some(PathBuf::from("out/copy.svg")) })
)]
#[case("load my file.svg", Action::Run(Command::Load { path: PathBuf::from("my file.svg") }))]
#[case("info", Action::Run(Command::Describe))]
#[case("QUIT", Action::Exit)]
#[case("help", Action::Help)]
#[case("   ", Action::Nothing)]
fn parses_verbs(#[case] line: &str, #[case] expected: Action) {
    assert_eq!(parse_line(line).unwrap(), expected);
}

#[rstest]
#[case("set //title")]
#[case("load")]
#[case("setattr //a href")]
#[case("frobnicate")]
fn rejects_incomplete_lines(#[case] line: &str) {
    parse_line(line).unwrap_err();
}

#[test]
fn add_text_is_optional() {
    let Action::Run(Command::Add { tag, text, .. }) = parse_line("add //g circle").unwrap() else {
        panic!("expected add");
    };
    assert_eq!(tag, "circle");
    assert_eq!(text, None);

    let Action::Run(Command::Add { text, .. }) = parse_line("add /root item two words").unwrap()
    else {
        panic!("expected add");
    };
    assert_eq!(text.as_deref(), Some("two words"));
}

fn run_script(script: &str) -> (String, Workspace) {
    let mut output = Vec::new();
    let mut shell =
        Shell::new(Workspace::new(SlotMode::Single), Cursor::new(script.to_owned()), &mut output);
    shell.run().unwrap();
    let workspace = shell.into_workspace();
    (String::from_utf8(output).unwrap(), workspace)
}

#[test]
fn session_edits_and_saves() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("doc.xml");
    std::fs::write(&path, "<root><title>Old</title></root>").unwrap();

    let script = format!(
        "load {}\nset //title New Value Here\nget //title\nsave\nexit\n",
        path.display()
    );
    let (output, workspace) = run_script(&script);

    assert!(output.contains("Loaded"), "{output}");
    assert!(output.contains("xqr> New Value Here\n"), "{output}");
    assert!(output.contains("Goodbye!"));
    assert!(!workspace.has_unsaved_changes());
    assert!(std::fs::read_to_string(&path).unwrap().contains("<title>New Value Here</title>"));
}

#[test]
fn errors_are_reported_and_the_loop_continues() {
    let (output, _) = run_script("get //x\nload -\nbogus\nhelp\n");
    assert!(output.contains("Error: no document loaded"), "{output}");
    assert!(output.contains("Error: documents can be read from stdin only"), "{output}");
    assert!(output.contains("unknown command \"bogus\""));
    assert!(output.contains("Commands:"));
}

#[test]
fn exit_with_unsaved_changes_needs_confirmation() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("doc.xml");
    std::fs::write(&path, "<root><title>Old</title></root>").unwrap();

    let script = format!("load {}\nset //title changed\nexit\nexit\nget //title\n", path.display());
    let (output, workspace) = run_script(&script);

    assert!(output.contains("Unsaved changes will be lost"));
    assert!(output.contains("Goodbye!"));
    // The line after the second exit never runs.
    assert!(!output.contains("xqr> changed"));
    assert!(workspace.has_unsaved_changes());
}
