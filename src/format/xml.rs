// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;
use std::io;
use std::ops::Range;

use memchr::memmem;
use sxd_document::dom;
use sxd_document::Package;

use super::Prolog;

pub const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Strict parse. The source declaration and a DOCTYPE without internal subset are kept
/// verbatim in the returned [`Prolog`]; the DOCTYPE is cut out before parsing.
pub fn parse(content: &str) -> Result<(Package, Prolog), String> {
    let doctype = find_doctype(content);
    let body = match &doctype {
        Some(range) => Cow::Owned(format!("{}{}", &content[..range.start], &content[range.end..])),
        None => Cow::Borrowed(content),
    };
    let package = sxd_document::parser::parse(&body).map_err(|err| format!("{err:?}"))?;
    let prolog = Prolog {
        declaration: leading_declaration(content).map(str::to_owned),
        doctype: doctype.map(|range| content[range].to_owned()),
    };
    Ok((package, prolog))
}

/// Serializes the whole tree behind the source declaration (or a UTF-8 one) and DOCTYPE.
pub fn serialize(doc: &dom::Document<'_>, prolog: &Prolog) -> io::Result<String> {
    let mut buffer = Vec::new();
    sxd_document::writer::format_document(doc, &mut buffer)?;
    let body = String::from_utf8(buffer).map_err(io::Error::other)?;

    let mut out = String::with_capacity(DECLARATION.len() + body.len() + 2);
    out.push_str(prolog.declaration.as_deref().unwrap_or(DECLARATION));
    out.push('\n');
    if let Some(doctype) = &prolog.doctype {
        out.push_str(doctype);
        out.push('\n');
    }
    out.push_str(strip_declaration(&body).trim_start());
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// `<?xml ...?>` at the very start of `content`.
pub(crate) fn leading_declaration(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("<?xml")?;
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let end = content.find("?>")?;
    Some(&content[..end + 2])
}

/// Byte range of a `<!DOCTYPE ...>` in the prolog. Declarations with an internal subset are
/// left to the parser.
pub(crate) fn find_doctype(content: &str) -> Option<Range<usize>> {
    let start = memmem::find(content.as_bytes(), b"<!DOCTYPE")?;
    let before = &content[..start];
    // Only declarations, processing instructions and comments may precede it.
    let in_prolog = before
        .match_indices('<')
        .all(|(at, _)| matches!(before.as_bytes().get(at + 1), Some(b'?' | b'!')));
    if !in_prolog {
        return None;
    }

    let mut quote = None;
    for (offset, ch) in content[start..].char_indices() {
        match (quote, ch) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[') => return None,
            (None, '>') => return Some(start..start + offset + 1),
            (None, _) => {}
        }
    }
    None
}

fn strip_declaration(body: &str) -> &str {
    if !body.starts_with("<?xml") {
        return body;
    }
    match body.find("?>") {
        Some(end) => &body[end + 2..],
        None => body,
    }
}
