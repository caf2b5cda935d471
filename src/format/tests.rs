// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;
use sxd_document::dom::ChildOfRoot;

use super::{element_markup, parse, serialize, xml, ParseBackend, Prolog};
use crate::model::DocumentKind;

fn root_name(package: &sxd_document::Package) -> String {
    let doc = package.as_document();
    doc.root()
        .children()
        .into_iter()
        .find_map(|child| match child {
            ChildOfRoot::Element(element) => Some(element.name().local_part().to_owned()),
            _ => None,
        })
        .unwrap_or_default()
}

#[test]
fn html_round_trip_keeps_doctype_void_and_raw_text() {
    let source = concat!(
        "<!DOCTYPE html><html><head><script>if (a < b) {}</script></head>",
        "<body><br><p id=\"a\">x &amp; y</p></body></html>"
    );
    let parsed = parse(DocumentKind::Html, source).unwrap();
    assert_eq!(parsed.backend, ParseBackend::Html);
    assert_eq!(parsed.prolog.doctype.as_deref(), Some("<!DOCTYPE html>"));

    let out =
        serialize(&parsed.package.as_document(), DocumentKind::Html, &parsed.prolog).unwrap();
    assert_eq!(
        out,
        concat!(
            "<!DOCTYPE html>\n<html><head><script>if (a < b) {}</script></head>",
            "<body><br><p id=\"a\">x &amp; y</p></body></html>\n"
        )
    );
}

#[test]
fn html_without_doctype_does_not_gain_one() {
    let parsed = parse(DocumentKind::Html, "<p>hi</p>").unwrap();
    assert_eq!(parsed.prolog, Prolog::default());
    let out =
        serialize(&parsed.package.as_document(), DocumentKind::Html, &parsed.prolog).unwrap();
    assert!(out.starts_with("<html>"));
    assert!(out.contains("<p>hi</p>"));
}

#[test]
fn xml_output_starts_with_declaration() {
    let parsed = parse(DocumentKind::Xml, "<root><a>t</a></root>").unwrap();
    assert_eq!(parsed.backend, ParseBackend::Xml);

    let out =
        serialize(&parsed.package.as_document(), DocumentKind::Xml, &parsed.prolog).unwrap();
    assert!(out.starts_with(&format!("{}\n<root>", xml::DECLARATION)), "{out}");
    assert!(out.contains("<a>t</a>"));
    assert_eq!(out.matches("<?xml").count(), 1);
}

#[test]
fn existing_declaration_is_not_duplicated() {
    let source = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
        "<svg xmlns=\"http://www.w3.org/2000/svg\"/>"
    );
    let parsed = parse(DocumentKind::Svg, source).unwrap();
    let out =
        serialize(&parsed.package.as_document(), DocumentKind::Svg, &parsed.prolog).unwrap();
    assert_eq!(out.matches("<?xml").count(), 1);
    assert!(
        out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n<svg"),
        "{out}"
    );
    assert!(out.contains("http://www.w3.org/2000/svg"));
}

#[test]
fn svg_doctype_parses_strictly_and_is_written_back() {
    let doctype = concat!(
        "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" ",
        "\"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">"
    );
    let source = format!(
        "<?xml version=\"1.0\" standalone=\"no\"?>\n{doctype}\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\"><title>T</title></svg>"
    );
    let parsed = parse(DocumentKind::Svg, &source).unwrap();
    assert_eq!(parsed.backend, ParseBackend::Xml);
    assert_eq!(parsed.prolog.doctype.as_deref(), Some(doctype));

    let out =
        serialize(&parsed.package.as_document(), DocumentKind::Svg, &parsed.prolog).unwrap();
    assert!(
        out.starts_with(&format!("<?xml version=\"1.0\" standalone=\"no\"?>\n{doctype}\n<svg")),
        "{out}"
    );
}

#[rstest]
#[case("<root/>", None)]
#[case("<!DOCTYPE root>\n<root/>", Some(0..15))]
#[case("<?xml version=\"1.0\"?><!-- c --><!DOCTYPE r SYSTEM \"r>.dtd\"><r/>", Some(31..59))]
#[case("<!DOCTYPE r [<!ENTITY e \"x\">]><r/>", None)]
#[case("<r><!DOCTYPE r></r>", None)]
fn doctype_is_located_in_prolog_only(
    #[case] source: &str,
    #[case] expected: Option<std::ops::Range<usize>>,
) {
    assert_eq!(xml::find_doctype(source), expected);
}

#[test]
fn byte_order_mark_is_ignored() {
    let parsed = parse(DocumentKind::Xml, "\u{feff}<root/>").unwrap();
    assert_eq!(parsed.backend, ParseBackend::Xml);
    assert_eq!(root_name(&parsed.package), "root");
}

#[test]
fn malformed_xml_falls_back_to_lenient_parser() {
    let parsed = parse(DocumentKind::Xml, "<root><item>one<item>two</root>").unwrap();
    assert_eq!(parsed.backend, ParseBackend::Lenient);
    assert_eq!(root_name(&parsed.package), "root");
}

#[rstest]
#[case("")]
#[case("just some text")]
#[case("<!-- only a comment")]
fn markup_without_any_element_is_rejected(#[case] source: &str) {
    parse(DocumentKind::Xml, source).unwrap_err();
}

#[test]
fn element_markup_uses_kind_flavor() {
    let parsed = parse(DocumentKind::Xml, "<root><empty/><t a=\"&quot;\">x</t></root>").unwrap();
    let doc = parsed.package.as_document();
    let Some(ChildOfRoot::Element(root)) = doc.root().children().into_iter().next() else {
        panic!("no root element");
    };
    assert_eq!(
        element_markup(root, DocumentKind::Xml),
        "<root><empty/><t a=\"&quot;\">x</t></root>"
    );
    assert_eq!(
        element_markup(root, DocumentKind::Html),
        "<root><empty></empty><t a=\"&quot;\">x</t></root>"
    );
}
