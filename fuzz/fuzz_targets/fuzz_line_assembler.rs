//! Fuzz target: `LineAssembler`
//!
//! Splits the input into chunks at arbitrary points and verifies:
//! - No panics under arbitrary bytes (including invalid UTF-8)
//! - No delivered line exceeds `MAX_LINE_LEN` bytes of input
//! - No delivered line contains a newline
//! - Every line can be handed to the command parser without panicking
//!
//! cargo fuzz run fuzz_line_assembler

#![no_main]

use gpiod::app::commands::{Command, LineAssembler, MAX_LINE_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&stride, rest)) = data.split_first() else {
        return;
    };
    let stride = usize::from(stride.max(1));

    let mut lines = LineAssembler::new();
    for chunk in rest.chunks(stride) {
        lines.push(chunk);
    }
    lines.flush();

    while let Some(line) = lines.next_line() {
        assert!(!line.contains('\n'));
        // lossy decoding may widen invalid bytes to U+FFFD (3 bytes each)
        assert!(line.chars().count() <= MAX_LINE_LEN);
        let _ = Command::parse(&line);
    }
});
