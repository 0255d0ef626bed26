//! Fuzz target for UserCommand::parse
//!
//! Arbitrary input lines must parse to a command or a `CommandError`, never
//! panic. Plain text is sent trimmed and can never be mistaken for a command.

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomlink_app::UserCommand;

fuzz_target!(|line: &str| {
    if let Ok(UserCommand::Send { text }) = UserCommand::parse(line) {
        assert!(!text.trim().is_empty());
        assert!(!text.trim_start().starts_with('/'));
    }
});
