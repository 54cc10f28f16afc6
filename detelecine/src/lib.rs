//! # Detelecine
//!
//! Pattern-driven inverse telecine for the Transcode project.
//!
//! Telecine spreads film frames over video fields following a fixed cadence;
//! 3:2 pulldown shows one film frame for two fields and the next for three.
//! Given that cadence, this crate reassembles the original progressive frames
//! from the field stream:
//!
//! - **Pattern compilation**: a cadence string such as `"23"` or `"2332"`,
//!   with an optional start frame for streams cut mid-cycle
//! - **Field reassembly**: frames are passed through, parked, skipped or
//!   woven from two inputs, producing zero, one or two outputs per input
//! - **Exact timing**: output rate, time base and timestamps follow from the
//!   pattern's field ratio with no floating point involved
//!
//! The cadence is supplied by the caller. Nothing here detects patterns,
//! deinterlaces, or looks at pixel values.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use detelecine::{Detelecine, DetelecineConfig, FieldOrder};
//! use detelecine_core::{PixelFormat, Rational, TimeBase};
//!
//! let mut filter = Detelecine::new(
//!     DetelecineConfig::new("23").with_first_field(FieldOrder::TopFieldFirst),
//! )?;
//! filter.configure_input(720, 480, PixelFormat::Yuv420p)?;
//! filter.configure_output(Rational::new(30000, 1001), TimeBase::new(1001, 30000))?;
//!
//! for frame in input_frames {
//!     for film_frame in filter.process(frame)? {
//!         // 24000/1001 fps output
//!     }
//! }
//! ```
//!
//! ## Delivering frames one at a time
//!
//! ```rust,ignore
//! use detelecine::FnSink;
//!
//! filter.filter_frame(frame, FnSink(|out| encoder.send(out)))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod pattern;
pub mod rate;
pub mod sink;

// Re-export main types
pub use config::{DetelecineConfig, FieldOrder};
pub use cursor::{CursorState, FieldOp, Schedule, StepKind};
pub use engine::Detelecine;
pub use error::{DetelecineError, Result};
pub use geometry::StreamGeometry;
pub use pattern::CadencePattern;
pub use rate::OutputTiming;
pub use sink::{FnSink, FrameSink, OutputFrames};

/// Convenience function to create a fully configured filter.
pub fn create_detelecine(
    config: DetelecineConfig,
    width: u32,
    height: u32,
    format: detelecine_core::PixelFormat,
    frame_rate: detelecine_core::Rational,
    time_base: detelecine_core::TimeBase,
) -> Result<Detelecine> {
    let mut filter = Detelecine::new(config)?;
    filter.configure_input(width, height, format)?;
    filter.configure_output(frame_rate, time_base)?;
    Ok(filter)
}
