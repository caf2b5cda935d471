// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Markup codecs.
//!
//! Every document, whatever its kind, ends up as one `sxd_document` tree: strict XML goes
//! through the `sxd-document` parser, HTML (and broken XML as a fallback) through html5ever
//! and is copied over. Serialization goes back out through the matching writer.

pub mod html;
pub mod xml;

use std::fmt;
use std::io;

use sxd_document::dom::{self, ChildOfElement};
use sxd_document::Package;

use crate::model::DocumentKind;

/// Which parser produced a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseBackend {
    /// Namespace-aware XML parser.
    Xml,
    /// HTML5 document parser.
    Html,
    /// HTML5 fragment parser used when strict XML parsing fails. Names are lower-cased and
    /// namespaces are dropped.
    Lenient,
}

impl fmt::Display for ParseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xml => "xml",
            Self::Html => "html5",
            Self::Lenient => "lenient",
        })
    }
}

/// Lines ahead of the root element that are written back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prolog {
    /// Source `<?xml ...?>` declaration; XML output falls back to a UTF-8 one.
    pub declaration: Option<String>,
    pub doctype: Option<String>,
}

pub struct ParsedMarkup {
    pub package: Package,
    pub backend: ParseBackend,
    pub prolog: Prolog,
}

impl fmt::Debug for ParsedMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedMarkup")
            .field("backend", &self.backend)
            .field("prolog", &self.prolog)
            .finish_non_exhaustive()
    }
}

pub fn parse(kind: DocumentKind, content: &str) -> Result<ParsedMarkup, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    if kind == DocumentKind::Html {
        let tree = html::parse_document(content);
        return Ok(ParsedMarkup {
            package: tree.package,
            backend: ParseBackend::Html,
            prolog: Prolog {
                declaration: None,
                doctype: tree.has_doctype.then(|| html::DOCTYPE.to_owned()),
            },
        });
    }

    match xml::parse(content) {
        Ok((package, prolog)) => Ok(ParsedMarkup { package, backend: ParseBackend::Xml, prolog }),
        Err(strict_err) => {
            let Some(package) = html::parse_lenient(content) else {
                return Err(format!("{strict_err}; lenient parser found no element either"));
            };
            let doctype = content
                .find("<!DOCTYPE")
                .map(|start| &content[start..])
                .and_then(|rest| rest.find('>').map(|end| rest[..=end].to_owned()));
            tracing::warn!(
                error = %strict_err,
                has_doctype = doctype.is_some(),
                "strict XML parse failed; using lenient parser (namespaces, name case and \
                 DOCTYPE internal subsets are lost)"
            );
            let prolog = Prolog {
                declaration: xml::leading_declaration(content).map(str::to_owned),
                doctype: doctype.filter(|doctype| !doctype.contains('[')),
            };
            Ok(ParsedMarkup { package, backend: ParseBackend::Lenient, prolog })
        }
    }
}

pub fn serialize(
    doc: &dom::Document<'_>,
    kind: DocumentKind,
    prolog: &Prolog,
) -> io::Result<String> {
    match kind {
        DocumentKind::Html => Ok(html::serialize(doc, prolog.doctype.as_deref())),
        DocumentKind::Svg | DocumentKind::Xml => xml::serialize(doc, prolog),
    }
}

/// Markup of a single element (no namespace declarations), used for `query --type markup`.
pub fn element_markup(element: dom::Element<'_>, kind: DocumentKind) -> String {
    let flavor = if kind == DocumentKind::Html { Flavor::Html } else { Flavor::Xml };
    let mut out = String::new();
    write_element(&mut out, element, flavor);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flavor {
    Html,
    Xml,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub(crate) fn write_element(out: &mut String, element: dom::Element<'_>, flavor: Flavor) {
    let name = element.name();
    let tag = match (flavor, element.preferred_prefix()) {
        (Flavor::Xml, Some(prefix)) => format!("{prefix}:{}", name.local_part()),
        _ => name.local_part().to_owned(),
    };

    out.push('<');
    out.push_str(&tag);
    for attribute in element.attributes() {
        out.push(' ');
        out.push_str(attribute.name().local_part());
        out.push_str("=\"");
        escape_into(out, attribute.value(), true);
        out.push('"');
    }

    let children = element.children();
    match flavor {
        Flavor::Html if VOID_ELEMENTS.contains(&tag.as_str()) => {
            out.push('>');
            return;
        }
        Flavor::Xml if children.is_empty() => {
            out.push_str("/>");
            return;
        }
        _ => out.push('>'),
    }

    let raw_text = flavor == Flavor::Html && RAW_TEXT_ELEMENTS.contains(&tag.as_str());
    for child in children {
        match child {
            ChildOfElement::Element(child) => write_element(out, child, flavor),
            ChildOfElement::Text(text) if raw_text => out.push_str(text.text()),
            ChildOfElement::Text(text) => escape_into(out, text.text(), false),
            ChildOfElement::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment.text());
                out.push_str("-->");
            }
            ChildOfElement::ProcessingInstruction(pi) => {
                if flavor == Flavor::Xml {
                    out.push_str("<?");
                    out.push_str(pi.target());
                    if let Some(value) = pi.value() {
                        out.push(' ');
                        out.push_str(value);
                    }
                    out.push_str("?>");
                }
            }
        }
    }

    out.push_str("</");
    out.push_str(&tag);
    out.push('>');
}

fn escape_into(out: &mut String, raw: &str, attribute: bool) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests;
