//! Document mode assembly
//!
//! The user's markup is wrapped in a full document with the stylesheets in a
//! `<style>` block and one trailing `<script>` block holding the bootstrap
//! followed by the user's scripts. The bootstrap swaps the guest's console
//! for proxies that post `{type, method, args}` to the parent window and
//! routes uncaught errors through `window.onerror` into the same channel.
//!
//! Outside a browser, [`host_program`] runs the trailing block under a small
//! shim that provides `window.parent.postMessage` (one JSON line per message
//! on stdout) and feeds uncaught errors to `window.onerror`.

use super::envelope::GUEST_CHANNEL;
use crate::error::ClassroomResult;

/// Runs first inside the isolated context
const BOOTSTRAP: &str = r#"(function() {
    var send = function(method, args) {
        var safe = Array.prototype.map.call(args, function(arg) {
            try {
                var text = JSON.stringify(arg);
                return text === undefined ? String(arg) : JSON.parse(text);
            } catch (e) {
                return String(arg);
            }
        });
        window.parent.postMessage({type: 'console', method: method, args: safe}, '*');
    };
    window.console = {
        log: function() { send('log', arguments); },
        error: function() { send('error', arguments); },
        warn: function() { send('warn', arguments); },
        info: function() { send('info', arguments); }
    };
    window.onerror = function(message, source, lineno, colno) {
        window.parent.postMessage({
            type: 'console',
            method: 'error',
            args: ['Error: ' + message + ' at line ' + lineno + ':' + colno]
        }, '*');
        return true;
    };
})();"#;

/// Script file name reported in guest stack traces
const SCRIPT_NAME: &str = "preview.html";

/// An assembled preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Complete markup, ready to be written to a file or frame
    pub markup: String,

    /// Body of the trailing script block
    pub script: String,
}

/// Build the preview document
pub fn assemble(markup: &str, styles: &str, scripts: &str) -> Document {
    let script = format!("{BOOTSTRAP}\n\n{scripts}");
    let markup = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        html, body {{ margin: 0; padding: 0; width: 100%; height: 100%; }}
        {styles}
    </style>
</head>
<body>
    {markup}
    <script>
{script}
    </script>
</body>
</html>"#
    );
    Document { markup, script }
}

/// Inert DOM built from the document's markup
///
/// Elements are found by a single pass over the opening tags. Each one
/// carries its id, classes and inner markup, and accepts writes to
/// `innerHTML`, `textContent` and `style` without rendering anything.
const DOM_SHIM: &str = r#"var makeElement = function(tag, attrs, inner) {
    var classes = (/(?:^|\s)class\s*=\s*["']([^"']*)["']/i.exec(attrs || '') || [])[1] || '';
    var element = {
        tagName: tag.toUpperCase(),
        id: (/(?:^|\s)id\s*=\s*["']([^"']*)["']/i.exec(attrs || '') || [])[1] || '',
        className: classes,
        innerHTML: inner || '',
        textContent: (inner || '').replace(/<[^>]*>/g, ''),
        style: {},
        dataset: {},
        children: [],
        attributes: {},
        appendChild: function(child) { element.children.push(child); return child; },
        removeChild: function(child) {
            element.children = element.children.filter(function(c) { return c !== child; });
            return child;
        },
        setAttribute: function(name, value) { element.attributes[name] = String(value); },
        getAttribute: function(name) {
            return name in element.attributes ? element.attributes[name] : null;
        },
        addEventListener: function() {},
        removeEventListener: function() {},
        querySelector: function() { return null; },
        querySelectorAll: function() { return []; }
    };
    element.classList = {
        add: function(name) { element.className = (element.className + ' ' + name).trim(); },
        remove: function(name) {
            element.className = element.className.split(/\s+/).filter(function(c) {
                return c !== name;
            }).join(' ');
        },
        contains: function(name) { return element.className.split(/\s+/).indexOf(name) >= 0; }
    };
    return element;
};
var buildDocument = function(markup) {
    var elements = [];
    var open = /<([a-zA-Z][\w-]*)\b([^>]*)>/g;
    var match;
    while ((match = open.exec(markup)) !== null) {
        var tag = match[1].toLowerCase();
        var rest = markup.slice(open.lastIndex);
        var close = rest.search(new RegExp('</' + tag + '\\s*>', 'i'));
        elements.push(makeElement(tag, match[2], close >= 0 ? rest.slice(0, close) : ''));
    }
    var byTag = function(tag) {
        return elements.filter(function(e) { return e.tagName === tag.toUpperCase(); });
    };
    var matches = function(selector) {
        selector = String(selector).trim();
        if (selector.charAt(0) === '#') {
            return elements.filter(function(e) { return e.id === selector.slice(1); });
        }
        if (selector.charAt(0) === '.') {
            return elements.filter(function(e) { return e.classList.contains(selector.slice(1)); });
        }
        return byTag(selector);
    };
    var doc = {
        title: '',
        body: byTag('body')[0] || makeElement('body', '', markup),
        head: byTag('head')[0] || makeElement('head', '', ''),
        getElementById: function(id) {
            return elements.filter(function(e) { return e.id === id; })[0] || null;
        },
        getElementsByTagName: byTag,
        getElementsByClassName: function(name) { return matches('.' + name); },
        querySelector: function(selector) { return matches(selector)[0] || null; },
        querySelectorAll: function(selector) { return matches(selector); },
        createElement: function(tag) { return makeElement(String(tag), '', ''); },
        createTextNode: function(text) { return {textContent: String(text)}; },
        addEventListener: function() {},
        removeEventListener: function() {}
    };
    doc.documentElement = byTag('html')[0] || makeElement('html', '', markup);
    return doc;
};"#;

/// Program that evaluates a document's script block outside a browser
///
/// Line numbers handed to `window.onerror` are relative to the user's
/// scripts, not to the bootstrap in front of them.
pub fn host_program(document: &Document) -> ClassroomResult<String> {
    let block = serde_json::to_string(&document.script)?;
    let markup = serde_json::to_string(&document.markup)?;
    let name = serde_json::to_string(SCRIPT_NAME)?;
    let offset = BOOTSTRAP.lines().count() + 1;
    Ok(format!(
        r#"(function() {{
    var vm = require('vm');
{GUEST_CHANNEL}
{DOM_SHIM}
    globalThis.window = globalThis;
    window.parent = {{ postMessage: function(data) {{ emit(data); }} }};
    window.addEventListener = function() {{}};
    window.removeEventListener = function() {{}};
    globalThis.document = buildDocument({markup});
    var report = function(err) {{
        var stack = err && err.stack ? String(err.stack) : '';
        var at = /preview\.html:(\d+):(\d+)/.exec(stack);
        var line = at ? Math.max(Number(at[1]) - {offset}, 0) : 0;
        var message = err && err.message !== undefined ? err.message : String(err);
        if (typeof window.onerror === 'function') {{
            window.onerror(message, {name}, line, at ? Number(at[2]) : 0, err);
        }} else {{
            emit({{type: 'exception', message: String(message)}});
        }}
    }};
    process.on('uncaughtException', report);
    try {{
        vm.runInThisContext({block}, {{ filename: {name} }});
    }} catch (err) {{
        report(err);
    }}
}})();
"#
    ))
}
