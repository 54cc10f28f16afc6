//! # Detelecine Core
//!
//! Core media types shared by the detelecine crates.
//!
//! This crate provides the fundamental building blocks the field reassembly
//! engine is written against:
//! - Error handling types
//! - Exact rationals for frame rates and time bases
//! - Frame buffer abstractions with fallible allocation
//! - Timestamp management
//! - Row and field plane copies

pub mod error;
pub mod frame;
pub mod plane;
pub mod rational;
pub mod timestamp;

pub use error::{Error, Result};
pub use frame::{Frame, FrameBuffer, FrameFlags, PixelFormat};
pub use rational::Rational;
pub use timestamp::{Duration, TimeBase, Timestamp};
