//! Messages sent from a guest to the host
//!
//! A guest writes one JSON envelope per line:
//!
//! ```text
//! {"type":"console","method":"log","args":["hi",{"a":1}]}
//! {"type":"exception","message":"x is not defined"}
//! {"type":"done"}
//! ```
//!
//! Lines that are not envelopes are kept as plain output. Guest programs
//! start with `GUEST_CHANNEL`, so stray writes to `process.stdout` arrive
//! as `log` envelopes instead of being glued onto the next envelope.

use super::log::LogLevel;
use super::runtime::GuestMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Guest prelude defining `emit(envelope)`
///
/// `emit` keeps the original stdout writer. Afterwards `process.stdout.write`
/// is replaced, and every later chunk becomes one `log` envelope with a
/// single trailing newline removed.
pub(crate) const GUEST_CHANNEL: &str = r#"var rawWrite = process.stdout.write.bind(process.stdout);
var emit = function(data) { rawWrite(JSON.stringify(data) + '\n'); };
process.stdout.write = function(chunk, encoding, callback) {
    var text = typeof chunk === 'string' ? chunk : Buffer.from(chunk).toString();
    text = text.replace(/\r?\n$/, '');
    if (text.length > 0) {
        emit({type: 'console', method: 'log', args: [text]});
    }
    var done = typeof encoding === 'function' ? encoding : callback;
    if (typeof done === 'function') {
        done();
    }
    return true;
};"#;

/// Output verb used by the guest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleMethod {
    Log,
    Info,
    Warn,
    Error,
}

impl From<ConsoleMethod> for LogLevel {
    fn from(method: ConsoleMethod) -> Self {
        match method {
            ConsoleMethod::Log => LogLevel::Log,
            ConsoleMethod::Info => LogLevel::Info,
            ConsoleMethod::Warn => LogLevel::Warn,
            ConsoleMethod::Error => LogLevel::Error,
        }
    }
}

/// Wire form of a guest message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    Console {
        method: ConsoleMethod,
        #[serde(default)]
        args: Vec<Value>,
    },
    Exception {
        message: String,
    },
    Done,
}

/// Interpret one line of guest stdout
pub fn parse_line(line: &str) -> GuestMessage {
    match serde_json::from_str::<Envelope>(line) {
        Ok(Envelope::Console { method, args }) => GuestMessage::Console {
            level: method.into(),
            text: render_args(&args),
        },
        Ok(Envelope::Exception { message }) => GuestMessage::Exception { message },
        Ok(Envelope::Done) => GuestMessage::Done,
        Err(_) => GuestMessage::Output(line.to_string()),
    }
}

/// Join console arguments into one display line
///
/// Strings are shown as-is, everything else as compact JSON.
pub fn render_args(args: &[Value]) -> String {
    args.iter().map(render_value).collect::<Vec<_>>().join(" ")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_json::to_string(other).unwrap_or_else(|_| other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn console_envelope() {
        let msg = parse_line(r#"{"type":"console","method":"warn","args":["n =",3,{"a":[1,2]}]}"#);
        assert_eq!(
            msg,
            GuestMessage::Console {
                level: LogLevel::Warn,
                text: r#"n = 3 {"a":[1,2]}"#.to_string(),
            }
        );
    }

    #[test]
    fn exception_and_done() {
        assert_eq!(
            parse_line(r#"{"type":"exception","message":"boom"}"#),
            GuestMessage::Exception {
                message: "boom".to_string()
            }
        );
        assert_eq!(parse_line(r#"{"type":"done"}"#), GuestMessage::Done);
    }

    #[test]
    fn non_envelope_lines_are_plain_output() {
        assert_eq!(
            parse_line("hello"),
            GuestMessage::Output("hello".to_string())
        );
        assert_eq!(
            parse_line(r#"{"type":"console","method":"shout"}"#),
            GuestMessage::Output(r#"{"type":"console","method":"shout"}"#.to_string())
        );
    }

    #[test]
    fn renders_primitives_and_objects() {
        assert_eq!(
            render_args(&[json!(null), json!(true), json!(1.5), json!("s"), json!([])]),
            "null true 1.5 s []"
        );
        assert_eq!(render_args(&[]), "");
    }
}
