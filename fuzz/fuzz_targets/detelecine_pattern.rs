#![no_main]

//! Fuzz target for cadence pattern compilation.
//!
//! Any string and start frame must either compile or be rejected with an
//! error; a compiled pattern must drive the cursor without panicking.

use arbitrary::Arbitrary;
use detelecine::{CadencePattern, CursorState};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct PatternInput {
    pattern: String,
    start_frame: u16,
    steps: u8,
}

fuzz_target!(|input: PatternInput| {
    let Ok(pattern) = CadencePattern::compile(&input.pattern, input.start_frame as usize) else {
        return;
    };

    assert!(pattern.start_pos() <= pattern.len());
    let mut cursor = CursorState::new(&pattern);
    for _ in 0..input.steps {
        let schedule = cursor.step(&pattern);
        assert!(schedule.outputs() <= 2);
        assert!(cursor.pattern_pos < pattern.len());
    }
});
