//! Script-only mode program
//!
//! The user source is compiled with `new Function('console', source)` and
//! called once with a four-verb console proxy. The wrapper reports either
//! one `exception` envelope or one `done` envelope, never both.

use super::envelope::GUEST_CHANNEL;
use crate::error::ClassroomResult;

/// Wrap `source` into a guest program
pub fn program(source: &str) -> ClassroomResult<String> {
    let source = serde_json::to_string(source)?;
    Ok(format!(
        r#"(function() {{
{GUEST_CHANNEL}
    var clean = function(arg) {{
        try {{
            var text = JSON.stringify(arg);
            return text === undefined ? String(arg) : JSON.parse(text);
        }} catch (e) {{
            return String(arg);
        }}
    }};
    var verb = function(method) {{
        return function() {{
            emit({{type: 'console', method: method, args: Array.prototype.map.call(arguments, clean)}});
        }};
    }};
    var proxy = {{ log: verb('log'), info: verb('info'), warn: verb('warn'), error: verb('error') }};
    try {{
        var run = new Function('console', {source});
        run(proxy);
    }} catch (err) {{
        var message = err && err.message !== undefined ? err.message : err;
        emit({{type: 'exception', message: String(message)}});
        return;
    }}
    emit({{type: 'done'}});
}})();
"#
    ))
}
