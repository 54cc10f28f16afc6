#![no_main]

//! Fuzz target for the frame processing loop.
//!
//! Feeds a configured filter with frames of arbitrary content, timestamps
//! and occasionally mismatched geometry.

use arbitrary::Arbitrary;
use detelecine::{create_detelecine, DetelecineConfig, FieldOrder};
use detelecine_core::{Frame, PixelFormat, Rational, TimeBase, Timestamp};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct StreamInput {
    pattern: String,
    start_frame: u8,
    bottom_first: bool,
    width: u8,
    height: u8,
    rate_num: u16,
    rate_den: u16,
    frames: Vec<FrameInput>,
}

#[derive(Arbitrary, Debug)]
struct FrameInput {
    fill: u8,
    pts: Option<i64>,
    wrong_size: bool,
}

fuzz_target!(|input: StreamInput| {
    let width = u32::from(input.width % 64) + 1;
    let height = u32::from(input.height % 64) + 1;
    let order = if input.bottom_first {
        FieldOrder::BottomFieldFirst
    } else {
        FieldOrder::TopFieldFirst
    };
    let config = DetelecineConfig::new(input.pattern)
        .with_first_field(order)
        .with_start_frame(input.start_frame as usize);
    let time_base = TimeBase::new(1, 90000);
    let Ok(mut filter) = create_detelecine(
        config,
        width,
        height,
        PixelFormat::Yuv420p,
        Rational::new(i64::from(input.rate_num), i64::from(input.rate_den.max(1))),
        time_base,
    ) else {
        return;
    };

    for frame_input in input.frames.iter().take(64) {
        let w = if frame_input.wrong_size { width + 1 } else { width };
        let mut frame = Frame::new(w, height, PixelFormat::Yuv420p, time_base);
        frame.buffer_mut().fill(frame_input.fill);
        if let Some(pts) = frame_input.pts {
            frame.pts = Timestamp::new(pts, time_base);
        }
        if let Ok(out) = filter.process(frame) {
            assert!(out.len() <= 2);
        }
    }
    filter.uninit();
});
