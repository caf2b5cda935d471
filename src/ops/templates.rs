// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::DocumentKind;

const SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg width="200" height="100" xmlns="http://www.w3.org/2000/svg">
  <rect width="200" height="100" fill="#f0f0f0"/>
  <text id="text1" x="100" y="50" font-family="Arial" font-size="16"
        text-anchor="middle">Hello SVG</text>
  <text id="text2" x="100" y="80" font-family="Arial" font-size="12"
        text-anchor="middle">Edit me!</text>
</svg>
"##;

const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<root>
  <greeting>Hello World</greeting>
  <items>
    <item id="1">First item</item>
    <item id="2">Second item</item>
  </items>
</root>
"#;

const HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Example</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 20px; }
    .highlight { color: blue; }
  </style>
</head>
<body>
  <h1>Example HTML</h1>
  <p class="highlight">This is a sample HTML file.</p>
  <ul id="items">
    <li>Item 1</li>
    <li>Item 2</li>
  </ul>
</body>
</html>
"#;

/// Starter content written by `create`.
pub fn starter(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Svg => SVG,
        DocumentKind::Html => HTML,
        DocumentKind::Xml => XML,
    }
}
