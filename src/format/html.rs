// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! html5ever (via `scraper`) on the way in, a small HTML writer on the way out.

use scraper::{ElementRef, Html, Node};
use sxd_document::dom::{self, ChildOfRoot};
use sxd_document::Package;

use super::{write_element, Flavor};

pub const DOCTYPE: &str = "<!DOCTYPE html>";

pub struct HtmlTree {
    pub package: Package,
    pub has_doctype: bool,
}

pub fn parse_document(content: &str) -> HtmlTree {
    let html = Html::parse_document(content);
    let package = Package::new();
    let mut has_doctype = false;
    {
        let doc = package.as_document();
        for child in html.tree.root().children() {
            match child.value() {
                Node::Doctype(_) => has_doctype = true,
                Node::Comment(comment) => doc.root().append_child(doc.create_comment(comment)),
                Node::Element(_) => {
                    if let Some(element) = ElementRef::wrap(child) {
                        doc.root().append_child(copy_element(&doc, element));
                    }
                }
                _ => {}
            }
        }
    }
    HtmlTree { package, has_doctype }
}

/// Recovers a tree from markup the XML parser rejected. Keeps the first top-level element,
/// returns `None` when there is none.
pub fn parse_lenient(content: &str) -> Option<Package> {
    let html = Html::parse_fragment(content);
    let first = html.root_element().children().find_map(ElementRef::wrap)?;
    let package = Package::new();
    {
        let doc = package.as_document();
        doc.root().append_child(copy_element(&doc, first));
    }
    Some(package)
}

pub fn serialize(doc: &dom::Document<'_>, doctype: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(doctype) = doctype {
        out.push_str(doctype);
        out.push('\n');
    }
    for child in doc.root().children() {
        match child {
            ChildOfRoot::Element(element) => write_element(&mut out, element, Flavor::Html),
            ChildOfRoot::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment.text());
                out.push_str("-->");
            }
            ChildOfRoot::ProcessingInstruction(_) => {}
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn copy_element<'d>(doc: &dom::Document<'d>, source: ElementRef<'_>) -> dom::Element<'d> {
    let element = doc.create_element(source.value().name());
    for (name, value) in source.value().attrs() {
        element.set_attribute_value(name, value);
    }
    for child in source.children() {
        match child.value() {
            Node::Text(text) => element.append_child(doc.create_text(text)),
            Node::Comment(comment) => element.append_child(doc.create_comment(comment)),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    element.append_child(copy_element(doc, child));
                }
            }
            _ => {}
        }
    }
    element
}
