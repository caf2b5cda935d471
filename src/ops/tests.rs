// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;

use rstest::{fixture, rstest};

use super::{Command, DispatchError, Outcome, ReadTarget, SlotMode, Workspace, WriteTarget};
use crate::model::{DocumentError, DocumentKind, Saved};
use crate::query::Expression;
use crate::store::SessionStore;

const SVG: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg">"#,
    r#"<text id="text1">Hello World</text></svg>"#,
);

struct OpsCtx {
    tmp: tempfile::TempDir,
}

impl OpsCtx {
    fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.tmp.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn session(&self) -> SessionStore {
        SessionStore::new(self.tmp.path().join("state"))
    }

    fn workspace(&self) -> Workspace {
        Workspace::new(SlotMode::Single).with_session(self.session())
    }
}

#[fixture]
fn ctx() -> OpsCtx {
    OpsCtx { tmp: tempfile::tempdir().unwrap() }
}

fn load(path: &std::path::Path) -> Command {
    Command::Load { path: path.to_path_buf() }
}

fn read_text(xpath: &str) -> Command {
    Command::Query { expression: Expression::xpath(xpath), target: ReadTarget::Text }
}

fn set_text(xpath: &str, value: &str) -> Command {
    Command::Set {
        expression: Expression::xpath(xpath),
        target: WriteTarget::Text,
        value: value.to_owned(),
    }
}

#[rstest]
fn commands_need_a_document(ctx: OpsCtx) {
    let mut ws = ctx.workspace();
    let err = ws.execute(read_text("//text")).unwrap_err();
    assert!(matches!(err, DispatchError::NoDocumentLoaded));
    let files = ws.execute(Command::Files).unwrap();
    assert!(matches!(files, Outcome::Files(files) if files.is_empty()));
}

#[rstest]
fn load_query_set_save(ctx: OpsCtx) {
    let path = ctx.file("example.svg", SVG);
    let mut ws = ctx.workspace();

    let Outcome::Loaded(info) = ws.execute(load(&path)).unwrap() else {
        panic!("expected load outcome");
    };
    assert_eq!(info.file_type, DocumentKind::Svg);
    assert_eq!(info.elements_count, 2);

    assert_eq!(
        ws.execute(read_text("//text[@id='text1']")).unwrap(),
        Outcome::Value("Hello World".to_owned())
    );
    assert_eq!(ws.execute(set_text("//text[@id='text1']", "Bye")).unwrap(), Outcome::Changed(true));
    assert!(ws.has_unsaved_changes());

    let saved = ws.execute(Command::Save { output: None }).unwrap();
    let Outcome::Saved(Saved::Written(_)) = saved else {
        panic!("expected a write, got {saved:?}");
    };
    assert!(!ws.has_unsaved_changes());
    assert!(std::fs::read_to_string(&path).unwrap().contains(">Bye</text>"));
}

#[rstest]
fn failed_load_keeps_previous_document(ctx: OpsCtx) {
    let path = ctx.file("example.svg", SVG);
    let mut ws = ctx.workspace();
    ws.execute(load(&path)).unwrap();

    let err = ws.execute(load(&ctx.tmp.path().join("missing.svg"))).unwrap_err();
    assert!(matches!(err, DispatchError::Document(DocumentError::NotFound { .. })));

    let broken = ctx.file("broken.xml", "no markup at all");
    let err = ws.execute(load(&broken)).unwrap_err();
    assert!(matches!(err, DispatchError::Document(DocumentError::Parse { .. })));

    assert_eq!(
        ws.execute(read_text("//text")).unwrap(),
        Outcome::Value("Hello World".to_owned())
    );
    assert_eq!(ctx.session().current_path(), Some(std::fs::canonicalize(&path).unwrap()));
}

#[rstest]
fn stdin_load_is_refused_unless_enabled(ctx: OpsCtx) {
    let path = ctx.file("example.svg", SVG);
    let mut ws = ctx.workspace();
    ws.execute(load(&path)).unwrap();

    let err = ws.execute(load(std::path::Path::new("-"))).unwrap_err();
    assert!(matches!(err, DispatchError::StdinUnavailable));
    assert_eq!(
        ws.execute(read_text("//text")).unwrap(),
        Outcome::Value("Hello World".to_owned())
    );
}

#[rstest]
fn single_slot_replaces_and_keyed_slots_accumulate(ctx: OpsCtx) {
    let svg = ctx.file("a.svg", SVG);
    let xml = ctx.file("b.xml", "<root><v>1</v></root>");

    let mut single = Workspace::new(SlotMode::Single);
    single.execute(load(&svg)).unwrap();
    single.execute(load(&xml)).unwrap();
    let Outcome::Files(files) = single.execute(Command::Files).unwrap() else { panic!() };
    assert_eq!(files.len(), 1);

    let mut keyed = Workspace::new(SlotMode::Keyed);
    keyed.execute(load(&svg)).unwrap();
    keyed.execute(load(&xml)).unwrap();
    let Outcome::Files(files) = keyed.execute(Command::Files).unwrap() else { panic!() };
    assert_eq!(files.len(), 2);

    assert_eq!(keyed.execute(read_text("//v")).unwrap(), Outcome::Value("1".to_owned()));
    let svg_key = svg.to_str().unwrap();
    assert_eq!(
        keyed.execute_on(Some(svg_key), read_text("//text")).unwrap(),
        Outcome::Value("Hello World".to_owned())
    );
    let err = keyed.execute_on(Some("/nowhere/c.svg"), read_text("//x")).unwrap_err();
    assert!(matches!(err, DispatchError::UnknownDocument { .. }));
}

#[rstest]
fn new_workspace_resumes_from_session(ctx: OpsCtx) {
    let path = ctx.file("example.svg", SVG);
    ctx.workspace().execute(load(&path)).unwrap();

    let mut resumed = ctx.workspace();
    assert_eq!(
        resumed.execute(read_text("//text")).unwrap(),
        Outcome::Value("Hello World".to_owned())
    );
}

#[rstest]
fn missing_remembered_file_requires_reload(ctx: OpsCtx) {
    let path = ctx.file("example.svg", SVG);
    ctx.workspace().execute(load(&path)).unwrap();
    std::fs::remove_file(&path).unwrap();

    let mut resumed = ctx.workspace();
    let err = resumed.execute(read_text("//text")).unwrap_err();
    assert!(matches!(err, DispatchError::ReloadRequired { .. }), "{err}");
    assert_eq!(ctx.session().current(), None);
}

#[rstest]
fn externally_changed_file_requires_reload(ctx: OpsCtx) {
    let path = ctx.file("example.svg", SVG);
    ctx.workspace().execute(load(&path)).unwrap();
    std::fs::write(&path, SVG.replace("Hello", "Changed")).unwrap();

    let mut resumed = ctx.workspace();
    let err = resumed.execute(read_text("//text")).unwrap_err();
    assert!(matches!(err, DispatchError::ReloadRequired { .. }));

    resumed.execute(load(&path)).unwrap();
    assert_eq!(
        resumed.execute(read_text("//text")).unwrap(),
        Outcome::Value("Changed World".to_owned())
    );
}

#[rstest]
fn saving_refreshes_session_fingerprint(ctx: OpsCtx) {
    let path = ctx.file("example.svg", SVG);
    let mut ws = ctx.workspace();
    ws.execute(load(&path)).unwrap();
    ws.execute(set_text("//text", "Bye")).unwrap();
    ws.execute(Command::Save { output: None }).unwrap();

    let mut resumed = ctx.workspace();
    assert_eq!(resumed.execute(read_text("//text")).unwrap(), Outcome::Value("Bye".to_owned()));
}

#[rstest]
fn autosave_persists_only_real_changes(ctx: OpsCtx) {
    let path = ctx.file("example.svg", SVG);
    let mut ws = Workspace::new(SlotMode::Single).with_session(ctx.session()).with_autosave(true);
    ws.execute(load(&path)).unwrap();

    assert_eq!(ws.execute(set_text("//circle", "x")).unwrap(), Outcome::Changed(false));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), SVG);

    ws.execute(Command::Add {
        parent: Expression::xpath("/svg"),
        tag: "title".to_owned(),
        text: Some("Caption".to_owned()),
        attributes: Vec::new(),
    })
    .unwrap();
    assert!(!ws.has_unsaved_changes());

    let mut resumed = ctx.workspace();
    assert_eq!(
        resumed.execute(read_text("//title")).unwrap(),
        Outcome::Value("Caption".to_owned())
    );
}

#[rstest]
#[case("starter.svg", None, DocumentKind::Svg)]
#[case("starter.html", None, DocumentKind::Html)]
#[case("starter.data", None, DocumentKind::Xml)]
#[case("starter.data", Some(DocumentKind::Svg), DocumentKind::Svg)]
fn create_writes_and_loads_starter(
    ctx: OpsCtx,
    #[case] name: &str,
    #[case] kind: Option<DocumentKind>,
    #[case] expected: DocumentKind,
) {
    let path = ctx.tmp.path().join(name);
    let mut ws = ctx.workspace();

    let Outcome::Created(info) =
        ws.execute(Command::Create { path: path.clone(), kind, force: false }).unwrap()
    else {
        panic!("expected create outcome");
    };
    assert_eq!(info.file_type, expected);
    assert!(info.elements_count > 1);
    assert!(path.exists());

    let err = ws.execute(Command::Create { path: path.clone(), kind, force: false }).unwrap_err();
    assert!(matches!(err, DispatchError::AlreadyExists { .. }));
    ws.execute(Command::Create { path, kind, force: true }).unwrap();
}

#[rstest]
fn describe_and_backup(ctx: OpsCtx) {
    let path = ctx.file("example.svg", SVG);
    let mut ws = ctx.workspace();
    ws.execute(load(&path)).unwrap();
    ws.execute(set_text("//text", "Bye")).unwrap();

    let Outcome::Described(info) = ws.execute(Command::Describe).unwrap() else { panic!() };
    assert!(info.modified);
    assert!(!info.lenient);

    let Outcome::BackedUp(backup) = ws.execute(Command::Backup).unwrap() else { panic!() };
    assert_eq!(std::fs::read_to_string(backup).unwrap(), SVG);
}
