// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! CSS selectors through `scraper`.
//!
//! The live tree is rendered to HTML and reparsed; each match is located by its chain of
//! element-child indexes and resolved back into the live tree.

use scraper::{ElementRef, Html, Selector};
use sxd_document::dom::{self, ChildOfElement, ChildOfRoot};

use super::Hit;
use crate::format;
use crate::model::DocumentError;

pub fn select<'d>(
    doc: &'d dom::Document<'d>,
    selector_text: &str,
) -> Result<Vec<Hit<'d>>, DocumentError> {
    let selector = Selector::parse(selector_text.trim())
        .map_err(|err| DocumentError::invalid_expression(selector_text, err.to_string()))?;

    let html = Html::parse_document(&format::html::serialize(doc, None));
    let mut hits = Vec::new();
    for matched in html.select(&selector) {
        let path = element_path(matched);
        match resolve(doc, &path) {
            Some(element) if element.name().local_part() == matched.value().name() => {
                hits.push(Hit::Element(element));
            }
            _ => tracing::debug!(
                ?path,
                tag = matched.value().name(),
                "css match has no live counterpart"
            ),
        }
    }
    Ok(hits)
}

/// Element-child index at each level, from the top-level element down to `element`.
fn element_path(element: ElementRef<'_>) -> Vec<usize> {
    let mut path = Vec::new();
    let mut node = *element;
    loop {
        path.push(node.prev_siblings().filter(|sibling| sibling.value().is_element()).count());
        match node.parent() {
            Some(parent) if parent.value().is_element() => node = parent,
            _ => break,
        }
    }
    path.reverse();
    path
}

fn resolve<'d>(doc: &dom::Document<'d>, path: &[usize]) -> Option<dom::Element<'d>> {
    let (&first, rest) = path.split_first()?;
    let mut current = doc
        .root()
        .children()
        .into_iter()
        .filter_map(|child| match child {
            ChildOfRoot::Element(element) => Some(element),
            _ => None,
        })
        .nth(first)?;
    for &index in rest {
        current = child_elements(current).nth(index)?;
    }
    Some(current)
}

fn child_elements<'d>(element: dom::Element<'d>) -> impl Iterator<Item = dom::Element<'d>> {
    element.children().into_iter().filter_map(|child| match child {
        ChildOfElement::Element(element) => Some(element),
        _ => None,
    })
}
