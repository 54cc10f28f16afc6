//! Downstream delivery of reconstructed frames.

use crate::cursor::MAX_OUTPUTS;
use crate::error::{DetelecineError, Result};
use detelecine_core::Frame;

/// Consumer of output frames.
///
/// `push` is called once per output frame, in emission order, and must
/// finish before the next output frame of the same input is built.
pub trait FrameSink {
    /// Deliver one output frame downstream.
    fn push(&mut self, frame: Frame) -> Result<()>;
}

impl FrameSink for Vec<Frame> {
    fn push(&mut self, frame: Frame) -> Result<()> {
        Vec::push(self, frame);
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn push(&mut self, frame: Frame) -> Result<()> {
        (**self).push(frame)
    }
}

/// Adapts a closure into a [`FrameSink`].
pub struct FnSink<F>(pub F);

impl<F> FrameSink for FnSink<F>
where
    F: FnMut(Frame) -> Result<()>,
{
    fn push(&mut self, frame: Frame) -> Result<()> {
        (self.0)(frame)
    }
}

/// The zero to two frames produced by one input frame.
#[derive(Debug, Default)]
pub struct OutputFrames {
    frames: [Option<Frame>; MAX_OUTPUTS],
    len: usize,
}

impl OutputFrames {
    /// Create an empty output set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no frame was produced.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get a frame by emission index.
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index).and_then(Option::as_ref)
    }

    /// Iterate over the frames in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().flatten()
    }

    /// Move the frames into a vector.
    pub fn into_vec(self) -> Vec<Frame> {
        self.into_iter().collect()
    }
}

impl FrameSink for OutputFrames {
    fn push(&mut self, frame: Frame) -> Result<()> {
        let slot = self.frames.get_mut(self.len).ok_or_else(|| {
            DetelecineError::downstream(format!(
                "more than {} frames produced by one input",
                MAX_OUTPUTS
            ))
        })?;
        *slot = Some(frame);
        self.len += 1;
        Ok(())
    }
}

impl IntoIterator for OutputFrames {
    type Item = Frame;
    type IntoIter = std::iter::Flatten<std::array::IntoIter<Option<Frame>, MAX_OUTPUTS>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use detelecine_core::{PixelFormat, TimeBase};

    fn frame(poc: i32) -> Frame {
        let mut f = Frame::new(4, 2, PixelFormat::Gray8, TimeBase::MPEG);
        f.poc = poc;
        f
    }

    #[test]
    fn test_output_frames_capacity() {
        let mut out = OutputFrames::new();
        assert!(out.is_empty());
        out.push(frame(1)).unwrap();
        out.push(frame(2)).unwrap();
        assert_eq!(out.len(), 2);
        assert!(matches!(
            out.push(frame(3)),
            Err(DetelecineError::Downstream(_))
        ));
        assert_eq!(out.get(1).map(|f| f.poc), Some(2));
        assert!(out.get(2).is_none());

        let pocs: Vec<i32> = out.iter().map(|f| f.poc).collect();
        assert_eq!(pocs, vec![1, 2]);
        let pocs: Vec<i32> = out.into_iter().map(|f| f.poc).collect();
        assert_eq!(pocs, vec![1, 2]);
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<Frame> = Vec::new();
        FrameSink::push(&mut sink, frame(5)).unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_fn_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = FnSink(|f: Frame| {
                seen.push(f.poc);
                if f.poc < 0 {
                    Err(DetelecineError::downstream("negative"))
                } else {
                    Ok(())
                }
            });
            assert!(sink.push(frame(1)).is_ok());
            assert!(sink.push(frame(-1)).is_err());
        }
        assert_eq!(seen, vec![1, -1]);
    }
}
