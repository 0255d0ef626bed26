//! Replay scripts.
//!
//! A script is newline-delimited JSON, one step per line. Blank lines and
//! lines starting with `#` are skipped.
//!
//! ```text
//! {"input": "/join random"}
//! {"server": ["user_joined", {"room": "random", "user_id": 2, "username": "bob"}]}
//! {"drop": {"refused_reconnects": 2}}
//! ```

use roomlink_proto::Envelope;
use serde::Deserialize;
use serde_json::Value;

use crate::ReplayError;

/// One step of a replayed session.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A line typed by the user, parsed as a command when consumed.
    Input(String),
    /// An event delivered by the server.
    Server(Envelope),
    /// The connection drops. The next `refused_reconnects` attempts fail.
    Drop {
        /// Reconnect attempts refused before the server comes back.
        refused_reconnects: u32,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum Line {
    Input(String),
    Server(Value),
    Drop(DropLine),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DropLine {
    #[serde(default)]
    refused_reconnects: u32,
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns [`ReplayError::Script`] naming the first line that is not a
/// valid step. Server envelopes are checked for shape only; whether they
/// decode to a known event is left to the runtime.
pub fn parse(text: &str) -> Result<Vec<Step>, ReplayError> {
    let mut steps = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let line = index + 1;
        let parsed: Line = serde_json::from_str(trimmed)
            .map_err(|e| ReplayError::Script { line, reason: e.to_string() })?;

        let step = match parsed {
            Line::Input(input) => Step::Input(input),
            Line::Server(value) => Envelope::from_value(value)
                .map(Step::Server)
                .map_err(|e| ReplayError::Script { line, reason: e.to_string() })?,
            Line::Drop(drop) => Step::Drop { refused_reconnects: drop.refused_reconnects },
        };
        steps.push(step);
    }

    Ok(steps)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_every_step_kind() {
        let script = r#"
# comment
{"input": "/join random"}

{"server": ["room_list", {"rooms": ["general_chat"]}]}
{"drop": {"refused_reconnects": 2}}
{"drop": {}}
"#;

        let steps = parse(script).unwrap();

        assert_eq!(steps, vec![
            Step::Input("/join random".into()),
            Step::Server(Envelope::new("room_list", json!({"rooms": ["general_chat"]}))),
            Step::Drop { refused_reconnects: 2 },
            Step::Drop { refused_reconnects: 0 },
        ]);
    }

    #[test]
    fn reports_line_of_bad_step() {
        let script = "{\"input\": \"hi\"}\n{\"teleport\": 1}\n";

        let err = parse(script).unwrap_err();

        assert!(matches!(err, ReplayError::Script { line: 2, .. }));
    }

    #[test]
    fn rejects_malformed_envelope() {
        let err = parse(r#"{"server": {"event": "room_list"}}"#).unwrap_err();

        assert!(matches!(err, ReplayError::Script { line: 1, .. }));
    }

    #[test]
    fn unknown_event_names_are_left_to_runtime() {
        let steps = parse(r#"{"server": ["mystery", {}]}"#).unwrap();

        assert_eq!(steps.len(), 1);
    }
}
