// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub const ADMIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>xqr</title>
  <style>
    body { font-family: sans-serif; margin: 2em; max-width: 60em; }
    input, select, button { margin: 0.2em; }
    pre { background: #f4f4f4; padding: 1em; overflow: auto; }
  </style>
</head>
<body>
  <h1>xqr</h1>
  <section>
    <input id="file" placeholder="/path/to/file.svg" size="50">
    <button onclick="call('/api/load', {file_path: val('file')})">Load</button>
    <button onclick="get('/api/files')">Files</button>
  </section>
  <section>
    <input id="query" placeholder="//text[@id='title']" size="50">
    <select id="qtype"><option>xpath</option><option>css</option></select>
    <button onclick="call('/api/query', {query: val('query'), type: val('qtype')})">Query</button>
  </section>
  <section>
    <input id="xpath" placeholder="XPath" size="30">
    <select id="utype"><option>text</option><option>attribute</option></select>
    <input id="attribute" placeholder="attribute" size="12">
    <input id="value" placeholder="value" size="20">
    <button onclick="update()">Update</button>
  </section>
  <section>
    <input id="output" placeholder="output path (optional)" size="50">
    <button onclick="save()">Save</button>
  </section>
  <pre id="result"></pre>
  <script>
    function val(id) { return document.getElementById(id).value; }
    function show(data) {
      document.getElementById('result').textContent = JSON.stringify(data, null, 2);
    }
    function get(url) { fetch(url).then(r => r.json()).then(show); }
    function call(url, body) {
      const headers = {'Content-Type': 'application/json'};
      fetch(url, {method: 'POST', headers, body: JSON.stringify(body)})
        .then(r => r.json()).then(show);
    }
    function update() {
      const body = {xpath: val('xpath'), type: val('utype'), value: val('value')};
      if (body.type === 'attribute') body.attribute = val('attribute');
      call('/api/update', body);
    }
    function save() {
      const output = val('output');
      call('/api/save', output ? {output_path: output} : {});
    }
  </script>
</body>
</html>
"#;
