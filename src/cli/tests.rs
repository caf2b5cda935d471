// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use rstest::rstest;

use super::{Cli, DirectOperation, Verb};
use crate::model::DocumentKind;
use crate::ops::{Command, DispatchError, ReadTarget, WriteTarget};
use crate::query::Expression;

fn command(args: &[&str]) -> Result<Option<Command>, DispatchError> {
    let cli = Cli::try_parse_from(std::iter::once("xqr").chain(args.iter().copied())).unwrap();
    cli.verb.to_command()
}

#[test]
fn clap_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn global_flags_go_anywhere() {
    let args = ["xqr", "load", "a.svg", "-vv", "--state-dir", "/tmp/s"];
    let cli = Cli::try_parse_from(args).unwrap();
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/s")));
    assert!(!cli.durable_writes);
}

#[rstest]
#[case(&["query", "//title"], Expression::xpath("//title"), ReadTarget::Text)]
#[case(&["query", "p.x", "--css"], Expression::css("p.x"), ReadTarget::Text)]
#[case(&["query", "//g", "--type", "markup"], Expression::xpath("//g"), ReadTarget::Markup)]
#[case(
    &["query", "//rect", "--type", "attribute", "--attr", "fill"],
    Expression::xpath("//rect"),
    ReadTarget::Attribute("fill".to_owned())
)]
fn query_flags_select_target(
    #[case] args: &[&str],
    #[case] expression: Expression,
    #[case] target: ReadTarget,
) {
    assert_eq!(command(args).unwrap(), Some(Command::Query { expression, target }));
}

#[test]
fn attribute_target_needs_attr() {
    let err = command(&["set", "//rect", "blue", "--type", "attribute"]).unwrap_err();
    assert!(matches!(err, DispatchError::MissingArgument { name: "--attr" }));

    assert_eq!(
        command(&["set", "//rect", "blue", "--type", "attribute", "--attr", "fill"]).unwrap(),
        Some(Command::Set {
            expression: Expression::xpath("//rect"),
            target: WriteTarget::Attribute("fill".to_owned()),
            value: "blue".to_owned(),
        })
    );
}

#[test]
fn add_collects_attribute_pairs() {
    assert_eq!(
        command(&["add", "/svg", "circle", "--attribute", "r=5", "--attribute", "fill=a=b"])
            .unwrap(),
        Some(Command::Add {
            parent: Expression::xpath("/svg"),
            tag: "circle".to_owned(),
            text: None,
            attributes: vec![
                ("r".to_owned(), "5".to_owned()),
                ("fill".to_owned(), "a=b".to_owned()),
            ],
        })
    );
    assert!(Cli::try_parse_from(["xqr", "add", "/svg", "g", "--attribute", "novalue"]).is_err());
}

#[rstest]
#[case(&["list"], None)]
#[case(&["list", "--xpath", "//g"], Some(Expression::xpath("//g")))]
#[case(&["list", "--css", "li"], Some(Expression::css("li")))]
fn list_defaults_to_every_element(#[case] args: &[&str], #[case] expression: Option<Expression>) {
    assert_eq!(command(args).unwrap(), Some(Command::List { expression }));
}

#[test]
fn list_rejects_both_languages() {
    assert!(Cli::try_parse_from(["xqr", "list", "--xpath", "//a", "--css", "a"]).is_err());
}

#[test]
fn create_parses_kind() {
    assert_eq!(
        command(&["create", "new.data", "--kind", "svg", "--force"]).unwrap(),
        Some(Command::Create {
            path: PathBuf::from("new.data"),
            kind: Some(DocumentKind::Svg),
            force: true,
        })
    );
    assert!(Cli::try_parse_from(["xqr", "create", "x", "--kind", "pdf"]).is_err());
}

#[test]
fn server_and_shell_are_not_dispatched() {
    let cli = Cli::try_parse_from(["xqr", "server", "--port", "9000"]).unwrap();
    assert!(matches!(cli.verb, Verb::Server { ref host, port: 9000 } if host == "127.0.0.1"));
    assert_eq!(cli.verb.to_command().unwrap(), None);
    assert_eq!(command(&["shell"]).unwrap(), None);
}

fn direct(args: &[&str]) -> Result<DirectOperation, String> {
    DirectOperation::parse(&args.iter().map(|arg| (*arg).to_owned()).collect::<Vec<_>>())
}

#[test]
fn unknown_first_word_is_a_direct_operation() {
    let cli = Cli::try_parse_from(["xqr", "a.svg//text[@id='t']", "Hi"]).unwrap();
    let Verb::Direct(args) = &cli.verb else { panic!("expected direct form, got {:?}", cli.verb) };
    assert_eq!(args, &["a.svg//text[@id='t']", "Hi"]);
    assert_eq!(cli.verb.to_command().unwrap(), None);
}

#[test]
fn direct_locator_splits_on_first_double_slash() {
    let operation = direct(&["dir/a.svg//g//text", "Hi"]).unwrap();
    assert_eq!(operation.path, PathBuf::from("dir/a.svg"));
    assert_eq!(operation.expression, Expression::xpath("//g//text"));
    assert_eq!(
        operation.commands(),
        [
            Command::Load { path: PathBuf::from("dir/a.svg") },
            Command::Set {
                expression: Expression::xpath("//g//text"),
                target: WriteTarget::Text,
                value: "Hi".to_owned(),
            },
        ]
    );

    let read = direct(&["a.svg//rect"]).unwrap();
    assert_eq!(read.commands()[1], Command::List { expression: Some(Expression::xpath("//rect")) });
}

#[test]
fn direct_locator_without_xpath_needs_an_existing_file() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("a.svg");
    std::fs::write(&file, "<svg/>").unwrap();

    let operation = direct(&[file.to_str().unwrap()]).unwrap();
    assert_eq!(operation.expression, Expression::xpath("//*"));
    assert!(direct(&["frobnicate"]).unwrap_err().contains("unrecognized"));
    assert!(direct(&["//text"]).is_err());
    assert!(direct(&["a.svg//x", "1", "2"]).is_err());
}

#[test]
fn ls_alias_takes_file_and_with_ids() {
    let args = ["xqr", "ls", "a.svg", "--pattern", "//g", "--with-ids"];
    let cli = Cli::try_parse_from(args).unwrap();
    let Verb::List { file, with_ids, .. } = &cli.verb else { panic!("expected list") };
    assert_eq!(file.as_deref(), Some(std::path::Path::new("a.svg")));
    assert!(*with_ids);
    assert_eq!(
        cli.verb.to_command().unwrap(),
        Some(Command::List { expression: Some(Expression::xpath("//g")) })
    );
}

#[test]
fn examples_defaults_to_working_directory() {
    let cli = Cli::try_parse_from(["xqr", "examples"]).unwrap();
    let Verb::Examples { dir, force } = &cli.verb else { panic!("expected examples") };
    assert_eq!(dir, &PathBuf::from("."));
    assert!(!*force);
    assert_eq!(cli.verb.to_command().unwrap(), None);
}
