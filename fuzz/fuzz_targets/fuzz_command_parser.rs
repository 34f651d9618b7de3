//! Fuzz target: `Command::parse`
//!
//! Feeds arbitrary UTF-8 to the parser and checks:
//! - No panics under any input
//! - Every accepted line has exactly two whitespace-separated tokens
//! - An accepted command prints back to a line that parses to itself
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use gpiod::app::commands::Command;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(cmd) = Command::parse(line) {
        assert_eq!(line.split_whitespace().count(), 2);
        let printed = cmd.to_string();
        assert_eq!(Command::parse(&printed), Ok(cmd));
    }
});
