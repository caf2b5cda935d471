// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use sxd_document::dom::{self, ChildOfRoot};
use sxd_xpath::nodeset::Node;
use sxd_xpath::Value;

use super::Hit;
use crate::model::DocumentError;

/// Prefix accepted (and dropped) in element name tests of namespaced documents.
const SVG_PREFIX: &str = "svg";

pub fn select<'d>(
    doc: &'d dom::Document<'d>,
    expression: &str,
) -> Result<Vec<Hit<'d>>, DocumentError> {
    let trimmed = expression.trim();
    let effective = if root_is_namespaced(doc) {
        localize(trimmed)
    } else {
        trimmed.to_owned()
    };
    if effective != trimmed {
        tracing::trace!(original = trimmed, rewritten = %effective, "xpath localized");
    }

    let value = sxd_xpath::evaluate_xpath(doc, &effective)
        .map_err(|err| DocumentError::invalid_expression(expression, format!("{err:?}")))?;

    match value {
        Value::Nodeset(nodes) => Ok(nodes
            .document_order()
            .into_iter()
            .filter_map(|node| match node {
                Node::Element(element) => Some(Hit::Element(element)),
                Node::Attribute(attribute) => Some(Hit::Attribute(attribute)),
                Node::Text(text) => Some(Hit::Text(text)),
                _ => None,
            })
            .collect()),
        Value::Boolean(_) | Value::Number(_) | Value::String(_) => Err(
            DocumentError::invalid_expression(expression, "expression does not select nodes"),
        ),
    }
}

fn root_is_namespaced(doc: &dom::Document<'_>) -> bool {
    doc.root().children().into_iter().any(|child| match child {
        ChildOfRoot::Element(element) => element.name().namespace_uri().is_some(),
        _ => false,
    })
}

/// Rewrites element name tests so they match by local name only.
///
/// `//text[@id='a']` becomes `//*[local-name()='text'][@id='a']` and `svg:rect` becomes
/// `*[local-name()='rect']`. Attribute names, function names, string literals and
/// operators are copied through. Expressions that already call `local-name()` are
/// returned unchanged.
pub fn localize(expression: &str) -> String {
    if expression.contains("local-name(") {
        return expression.to_owned();
    }

    let chars: Vec<char> = expression.chars().collect();
    let mut out = String::with_capacity(expression.len() + 32);
    // True where the grammar expects a location step (or any operand) next.
    let mut expect_step = true;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\'' | '"' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&c| c == ch)
                    .map_or(chars.len(), |offset| i + offset + 2);
                out.extend(&chars[i..end]);
                i = end;
                expect_step = false;
            }
            '@' => {
                let end = if chars.get(i + 1) == Some(&'*') {
                    i + 2
                } else {
                    scan_while(&chars, i + 1, |c| is_name_char(c) || c == ':')
                };
                out.extend(&chars[i..end]);
                i = end;
                expect_step = false;
            }
            '$' => {
                let end = scan_while(&chars, i + 1, is_name_char);
                out.extend(&chars[i..end]);
                i = end;
                expect_step = false;
            }
            c if is_name_start(c) => {
                let name_end = scan_while(&chars, i, is_name_char);
                let name: String = chars[i..name_end].iter().collect();

                if chars.get(name_end) == Some(&':') && chars.get(name_end + 1) == Some(&':') {
                    out.push_str(&name);
                    out.push_str("::");
                    i = name_end + 2;
                    expect_step = name != "attribute";
                    continue;
                }

                if !expect_step {
                    out.push_str(&name);
                    i = name_end;
                    expect_step = matches!(name.as_str(), "and" | "or" | "div" | "mod");
                    continue;
                }

                // Prefixed name test: `p:local` or `p:*`.
                let (prefix, local, end) = if chars.get(name_end) == Some(&':') {
                    match chars.get(name_end + 1) {
                        Some('*') => (Some(name.clone()), "*".to_owned(), name_end + 2),
                        Some(&c) if is_name_start(c) => {
                            let local_end = scan_while(&chars, name_end + 1, is_name_char);
                            let local: String = chars[name_end + 1..local_end].iter().collect();
                            (Some(name.clone()), local, local_end)
                        }
                        _ => (None, name.clone(), name_end),
                    }
                } else {
                    (None, name.clone(), name_end)
                };

                let next = chars[end..].iter().find(|c| !c.is_whitespace());
                if prefix.is_none() && next == Some(&'(') {
                    // Function call or node type test such as `text()`.
                    out.push_str(&name);
                    i = name_end;
                    continue;
                }

                match prefix.as_deref() {
                    None | Some(SVG_PREFIX) if local == "*" => out.push('*'),
                    None | Some(SVG_PREFIX) => {
                        out.push_str("*[local-name()='");
                        out.push_str(&local);
                        out.push_str("']");
                    }
                    Some(_) => out.extend(&chars[i..end]),
                }
                i = end;
                expect_step = false;
            }
            '*' => {
                out.push('*');
                i += 1;
                expect_step = !expect_step;
            }
            ']' | ')' | '.' => {
                out.push(ch);
                i += 1;
                expect_step = false;
            }
            c if c.is_ascii_digit() => {
                out.push(c);
                i += 1;
                expect_step = false;
            }
            c if c.is_whitespace() => {
                out.push(c);
                i += 1;
            }
            _ => {
                // `/`, `[`, `(`, `|`, `,`, comparison and arithmetic operators.
                out.push(ch);
                i += 1;
                expect_step = true;
            }
        }
    }

    out
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn scan_while(chars: &[char], start: usize, keep: impl Fn(char) -> bool) -> usize {
    let mut end = start;
    while end < chars.len() && keep(chars[end]) {
        end += 1;
    }
    end
}
