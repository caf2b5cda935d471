// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use indexmap::IndexMap;
use serde::Serialize;
use sxd_document::dom::{self, ChildOfElement, ParentOfChild};

use crate::query::Hit;

/// One query match, detached from the tree.
///
/// Equality ignores attribute order; iteration keeps document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub path: String,
    pub tag: String,
    pub text: String,
    pub attributes: IndexMap<String, String>,
}

impl MatchResult {
    pub fn from_hit(hit: Hit<'_>) -> Self {
        match hit {
            Hit::Element(element) => Self {
                path: element_path(element),
                tag: element_tag(element),
                text: hit.text(),
                attributes: element
                    .attributes()
                    .into_iter()
                    .map(|attribute| (attribute_name(attribute), attribute.value().to_owned()))
                    .collect(),
            },
            Hit::Attribute(attribute) => {
                let name = attribute_name(attribute);
                let owner = attribute.parent().map(element_path).unwrap_or_default();
                Self {
                    path: format!("{owner}/@{name}"),
                    tag: format!("@{name}"),
                    text: hit.text(),
                    attributes: IndexMap::new(),
                }
            }
            Hit::Text(text) => {
                let owner = text.parent().map(element_path).unwrap_or_default();
                Self {
                    path: format!("{owner}/text()"),
                    tag: "#text".to_owned(),
                    text: hit.text(),
                    attributes: IndexMap::new(),
                }
            }
        }
    }

    /// `name="value"` pairs in document order.
    pub fn attributes_inline(&self) -> String {
        self.attributes
            .iter()
            .map(|(name, value)| format!("{name}={value:?}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn element_tag(element: dom::Element<'_>) -> String {
    element.name().local_part().to_owned()
}

/// Qualified attribute name as written in the source (`xlink:href`, `id`).
pub fn attribute_name(attribute: dom::Attribute<'_>) -> String {
    let local = attribute.name().local_part();
    match attribute.preferred_prefix() {
        Some(prefix) => format!("{prefix}:{local}"),
        None if attribute.name().namespace_uri() == Some(XML_NAMESPACE) => format!("xml:{local}"),
        None => local.to_owned(),
    }
}

pub(crate) const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub(crate) const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Absolute locator such as `/svg/g/text[2]`; the index appears only when the element has
/// same-named siblings.
pub fn element_path(element: dom::Element<'_>) -> String {
    let mut steps = Vec::new();
    let mut current = Some(element);
    while let Some(element) = current {
        let tag = element_tag(element);
        current = match element.parent() {
            Some(ParentOfChild::Element(parent)) => {
                let same: Vec<_> = parent
                    .children()
                    .into_iter()
                    .filter_map(|child| match child {
                        ChildOfElement::Element(sibling) if element_tag(sibling) == tag => {
                            Some(sibling)
                        }
                        _ => None,
                    })
                    .collect();
                if same.len() > 1 {
                    let position = same.iter().position(|sibling| *sibling == element).unwrap_or(0);
                    steps.push(format!("{tag}[{}]", position + 1));
                } else {
                    steps.push(tag);
                }
                Some(parent)
            }
            _ => {
                steps.push(tag);
                None
            }
        };
    }
    steps.reverse();
    format!("/{}", steps.join("/"))
}
