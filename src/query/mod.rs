// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Addressing expressions over a document tree.
//!
//! XPath goes through `sxd-xpath`, CSS through `scraper`. Both engines hand back [`Hit`]s
//! pointing into the same `sxd_document` tree, so every read and write works the same way
//! whichever language selected the node.

pub mod css;
pub mod xpath;

use std::fmt;

use sxd_document::dom::{self, ChildOfElement, ParentOfChild};

use crate::model::{DocumentError, DocumentKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    XPath(String),
    Css(String),
}

impl Expression {
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// `css` selects the CSS engine; anything else is XPath.
    pub fn with_language(expression: impl Into<String>, css: bool) -> Self {
        if css {
            Self::Css(expression.into())
        } else {
            Self::XPath(expression.into())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::XPath(text) | Self::Css(text) => text,
        }
    }

    pub fn language(&self) -> &'static str {
        match self {
            Self::XPath(_) => "xpath",
            Self::Css(_) => "css",
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.language(), self.as_str())
    }
}

/// A node selected by a query.
#[derive(Debug, Clone, Copy)]
pub enum Hit<'d> {
    Element(dom::Element<'d>),
    Attribute(dom::Attribute<'d>),
    Text(dom::Text<'d>),
}

impl<'d> Hit<'d> {
    /// Element itself, or the element owning the attribute/text.
    pub fn element(self) -> Option<dom::Element<'d>> {
        match self {
            Self::Element(element) => Some(element),
            Self::Attribute(attribute) => attribute.parent(),
            Self::Text(text) => text.parent(),
        }
    }

    /// Element: its leading text run. Attribute: its value. Text node: its content.
    pub fn text(self) -> String {
        match self {
            Self::Element(element) => leading_text(element),
            Self::Attribute(attribute) => attribute.value().to_owned(),
            Self::Text(text) => text.text().to_owned(),
        }
    }

    pub fn set_text(self, value: &str) {
        match self {
            Self::Element(element) => set_leading_text(element, value),
            Self::Attribute(attribute) => {
                if let Some(owner) = attribute.parent() {
                    owner.set_attribute_value(attribute.name(), value);
                }
            }
            Self::Text(text) => text.set_text(value),
        }
    }

    /// Detaches the node. The document element cannot be removed.
    pub fn remove(self) -> bool {
        match self {
            Self::Element(element) => match element.parent() {
                Some(ParentOfChild::Element(_)) => {
                    element.remove_from_parent();
                    true
                }
                Some(ParentOfChild::Root(_)) | None => false,
            },
            Self::Attribute(attribute) => match attribute.parent() {
                Some(owner) => {
                    owner.remove_attribute(attribute.name());
                    true
                }
                None => false,
            },
            Self::Text(text) => {
                let attached = text.parent().is_some();
                text.remove_from_parent();
                attached
            }
        }
    }
}

/// Runs `expression` against `doc`; results come back in document order.
pub fn select<'d>(
    doc: &'d dom::Document<'d>,
    kind: DocumentKind,
    expression: &Expression,
) -> Result<Vec<Hit<'d>>, DocumentError> {
    let text = expression.as_str();
    if text.trim().is_empty() {
        return Err(DocumentError::invalid_expression(text, "empty expression"));
    }
    let hits = match expression {
        Expression::XPath(xpath) => xpath::select(doc, xpath)?,
        Expression::Css(_) if kind != DocumentKind::Html => {
            return Err(DocumentError::UnsupportedQuery { kind })
        }
        Expression::Css(selector) => css::select(doc, selector)?,
    };
    tracing::debug!(%expression, matches = hits.len(), "query evaluated");
    Ok(hits)
}

pub fn leading_text(element: dom::Element<'_>) -> String {
    let mut out = String::new();
    for child in element.children() {
        match child {
            ChildOfElement::Text(text) => out.push_str(text.text()),
            _ => break,
        }
    }
    out
}

fn set_leading_text(element: dom::Element<'_>, value: &str) {
    let rest: Vec<ChildOfElement<'_>> = element
        .children()
        .into_iter()
        .skip_while(|child| matches!(child, ChildOfElement::Text(_)))
        .collect();
    element.set_text(value);
    for child in rest {
        element.append_child(child);
    }
}
