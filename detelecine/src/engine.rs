//! Field reassembly engine.
//!
//! Drives the [`CursorState`] once per input frame and carries out the
//! resulting buffer operations on real pixel data: one carry-over buffer
//! holds a frame whose second field belongs to the next output frame, and
//! two output slots are filled before being duplicated and handed downstream.

use crate::config::{DetelecineConfig, FieldOrder};
use crate::cursor::{CursorState, FieldOp, StepKind, MAX_OUTPUTS};
use crate::error::{DetelecineError, Result};
use crate::geometry::StreamGeometry;
use crate::pattern::CadencePattern;
use crate::rate::OutputTiming;
use crate::sink::{FrameSink, OutputFrames};
use detelecine_core::plane::{copy_field, copy_plane};
use detelecine_core::{Frame, FrameBuffer, PixelFormat, Rational, TimeBase, Timestamp};
use tracing::{debug, trace};

/// Video parameters the work buffers were allocated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VideoParams {
    width: u32,
    height: u32,
    format: PixelFormat,
}

/// Carry-over buffer and output slots, reused across input frames.
struct WorkBuffers {
    temp: FrameBuffer,
    slots: [FrameBuffer; MAX_OUTPUTS],
}

impl WorkBuffers {
    fn allocate(params: VideoParams) -> Result<Self> {
        let alloc = || FrameBuffer::try_new(params.width, params.height, params.format);
        Ok(Self {
            temp: alloc()?,
            slots: [alloc()?, alloc()?],
        })
    }
}

/// Pattern-driven inverse telecine filter.
pub struct Detelecine {
    config: DetelecineConfig,
    pattern: CadencePattern,
    cursor: CursorState,
    video: Option<VideoParams>,
    geometry: Option<StreamGeometry>,
    buffers: Option<WorkBuffers>,
    timing: Option<OutputTiming>,
    /// Timestamp of the first input frame that carried one.
    start_time: Option<i64>,
    /// Frames handed downstream so far.
    frames_emitted: u64,
}

impl Detelecine {
    /// Create a filter, compiling and validating the configured pattern.
    pub fn new(config: DetelecineConfig) -> Result<Self> {
        let pattern = CadencePattern::compile(&config.pattern, config.start_frame)?;
        let cursor = CursorState::new(&pattern);
        Ok(Self {
            config,
            pattern,
            cursor,
            video: None,
            geometry: None,
            buffers: None,
            timing: None,
            start_time: None,
            frames_emitted: 0,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &DetelecineConfig {
        &self.config
    }

    /// Get the compiled pattern.
    pub fn pattern(&self) -> &CadencePattern {
        &self.pattern
    }

    /// Get the current cursor state.
    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    /// Get the configured stream geometry.
    pub fn geometry(&self) -> Option<&StreamGeometry> {
        self.geometry.as_ref()
    }

    /// Get the negotiated output timing.
    pub fn timing(&self) -> Option<&OutputTiming> {
        self.timing.as_ref()
    }

    /// Number of frames handed downstream so far.
    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }

    /// Configure the input video geometry and allocate the work buffers.
    ///
    /// Reconfiguring with the same parameters keeps the existing buffers and
    /// their contents. Any other allocation restarts the pattern from the
    /// configured start frame.
    pub fn configure_input(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<StreamGeometry> {
        let params = VideoParams {
            width,
            height,
            format,
        };
        if let (Some(video), Some(geometry), Some(_)) = (self.video, self.geometry, &self.buffers)
        {
            if video == params {
                return Ok(geometry);
            }
        }

        let buffers = WorkBuffers::allocate(params)?;
        let geometry = StreamGeometry::for_video(width, height, format);

        // Fresh buffers hold no parked field.
        if self.cursor.occupied {
            debug!("Dropping parked field held in the old work buffers");
        }
        self.cursor = CursorState::new(&self.pattern);
        self.buffers = Some(buffers);
        self.geometry = Some(geometry);
        self.video = Some(params);
        Ok(geometry)
    }

    /// Negotiate the output frame rate and time base.
    pub fn configure_output(
        &mut self,
        frame_rate: Rational,
        time_base: TimeBase,
    ) -> Result<OutputTiming> {
        let timing = OutputTiming::negotiate(frame_rate, time_base, self.pattern.field_ratio())?;
        self.timing = Some(timing);
        Ok(timing)
    }

    /// Release the carry-over buffer and the output slots.
    ///
    /// Safe to call any number of times, including on a filter that was never
    /// configured.
    pub fn uninit(&mut self) {
        if self.buffers.take().is_some() {
            debug!("Released detelecine work buffers");
        }
        self.geometry = None;
        self.video = None;
    }

    /// Process one input frame, delivering any completed frames to `sink`.
    ///
    /// Every completed frame is built, duplicated and delivered before the
    /// next one is started. A delivery error does not stop the remaining
    /// frame of the same input from being delivered; the result of the last
    /// delivery is returned. An allocation failure while duplicating a frame
    /// aborts the call; frames already delivered stay delivered.
    pub fn filter_frame<S>(&mut self, input: Frame, mut sink: S) -> Result<()>
    where
        S: FrameSink,
    {
        let video = self
            .video
            .ok_or(DetelecineError::NotConfigured("input geometry"))?;
        let geometry = self
            .geometry
            .ok_or(DetelecineError::NotConfigured("input geometry"))?;
        let timing = self
            .timing
            .ok_or(DetelecineError::NotConfigured("output timing"))?;
        let buffers = self
            .buffers
            .as_mut()
            .ok_or(DetelecineError::NotConfigured("work buffers"))?;

        if input.width() != video.width
            || input.height() != video.height
            || input.format() != video.format
            || !geometry.fits(&input)
        {
            return Err(DetelecineError::GeometryMismatch {
                expected_width: video.width,
                expected_height: video.height,
                expected_format: video.format.to_string(),
                actual_width: input.width(),
                actual_height: input.height(),
                actual_format: input.format().to_string(),
            });
        }

        if self.start_time.is_none() {
            self.start_time = input.pts.get();
        }

        let schedule = self.cursor.step(&self.pattern);
        trace!(
            "{:?}: {} output(s), pattern_pos {}, skip_fields {}, occupied {}",
            schedule.kind(),
            schedule.outputs(),
            self.cursor.pattern_pos,
            self.cursor.skip_fields,
            self.cursor.occupied
        );
        if matches!(schedule.kind(), StepKind::Stall) {
            return Ok(());
        }

        let WorkBuffers { temp, slots } = buffers;
        let order = self.config.first_field;
        let mut out = 0;
        for op in schedule.ops() {
            match op {
                FieldOp::Buffer => copy_frame(temp, input.buffer(), &geometry)?,
                FieldOp::EmitBuffered => {
                    copy_frame(&mut slots[out], temp, &geometry)?;
                    out += 1;
                }
                FieldOp::Weave => {
                    weave_frame(&mut slots[out], input.buffer(), temp, &geometry, order)?;
                    out += 1;
                }
                FieldOp::EmitInput => {
                    copy_frame(&mut slots[out], input.buffer(), &geometry)?;
                    out += 1;
                }
            }
        }

        let mut result = Ok(());
        for slot in &slots[..out] {
            let mut frame = Frame::from_buffer(duplicate(slot)?);
            frame.copy_props_from(&input);
            frame.pts = Timestamp::new(
                timing.pts_for(self.start_time, self.frames_emitted),
                timing.time_base,
            );
            self.frames_emitted += 1;
            result = sink.push(frame);
            if let Err(err) = &result {
                debug!("Downstream rejected frame {}: {}", self.frames_emitted - 1, err);
            }
        }

        result
    }

    /// Process one input frame and collect the completed frames.
    pub fn process(&mut self, input: Frame) -> Result<OutputFrames> {
        let mut out = OutputFrames::new();
        self.filter_frame(input, &mut out)?;
        Ok(out)
    }
}

/// Copy an output slot into storage of its own.
fn duplicate(slot: &FrameBuffer) -> Result<FrameBuffer> {
    #[cfg(test)]
    tests::duplicate_fail_point()?;
    Ok(slot.try_clone()?)
}

/// Copy every plane of `src` into `dst`.
fn copy_frame(dst: &mut FrameBuffer, src: &FrameBuffer, geometry: &StreamGeometry) -> Result<()> {
    for i in 0..geometry.nb_planes {
        let dst_linesize = dst.stride(i);
        let src_linesize = src.stride(i);
        let (Some(d), Some(s)) = (dst.plane_mut(i), src.plane(i)) else {
            continue;
        };
        copy_plane(
            d,
            dst_linesize,
            s,
            src_linesize,
            geometry.stride[i],
            geometry.plane_height[i],
        )?;
    }
    Ok(())
}

/// Build a frame whose earlier field comes from `earlier` and whose later
/// field comes from `later`.
fn weave_frame(
    dst: &mut FrameBuffer,
    earlier: &FrameBuffer,
    later: &FrameBuffer,
    geometry: &StreamGeometry,
    order: FieldOrder,
) -> Result<()> {
    for i in 0..geometry.nb_planes {
        let dst_linesize = dst.stride(i);
        let Some(d) = dst.plane_mut(i) else {
            continue;
        };
        if let Some(s) = earlier.plane(i) {
            copy_field(
                d,
                dst_linesize,
                s,
                earlier.stride(i),
                geometry.stride[i],
                geometry.plane_height[i],
                order.first_row(),
            )?;
        }
        if let Some(s) = later.plane(i) {
            copy_field(
                d,
                dst_linesize,
                s,
                later.stride(i),
                geometry.stride[i],
                geometry.plane_height[i],
                order.second_row(),
            )?;
        }
    }
    Ok(())
}
