//! Video frame buffer abstractions.
//!
//! Provides types for representing decoded video frames in various pixel formats.

use crate::error::{Error, Result};
use crate::timestamp::{Duration, TimeBase, Timestamp};
use bitflags::bitflags;
use std::collections::BTreeMap;
use std::fmt;

/// Pixel format for video frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// Planar YUV 4:2:0, 12bpp (1 Cr & Cb sample per 2x2 Y samples).
    Yuv420p,
    /// Planar YUV 4:2:2, 16bpp (1 Cr & Cb sample per 2x1 Y samples).
    Yuv422p,
    /// Planar YUV 4:4:4, 24bpp (no subsampling).
    Yuv444p,
    /// Planar YUV 4:2:0 with alpha plane, 20bpp.
    Yuva420p,
    /// Planar YUV 4:2:0, 15bpp, 10-bit.
    Yuv420p10le,
    /// Planar YUV 4:2:2, 20bpp, 10-bit.
    Yuv422p10le,
    /// Planar YUV 4:4:4, 30bpp, 10-bit.
    Yuv444p10le,
    /// Packed NV12 (Y plane, interleaved UV plane).
    Nv12,
    /// Packed NV21 (Y plane, interleaved VU plane).
    Nv21,
    /// Packed RGB24, 24bpp.
    Rgb24,
    /// Packed BGR24, 24bpp.
    Bgr24,
    /// Packed RGBA, 32bpp.
    Rgba,
    /// Packed BGRA, 32bpp.
    Bgra,
    /// Grayscale, 8bpp.
    Gray8,
    /// Grayscale, 16bpp.
    Gray16,
}

impl PixelFormat {
    /// Get the number of planes for this pixel format.
    pub fn num_planes(&self) -> usize {
        match self {
            Self::Yuva420p => 4,
            Self::Yuv420p
            | Self::Yuv422p
            | Self::Yuv444p
            | Self::Yuv420p10le
            | Self::Yuv422p10le
            | Self::Yuv444p10le => 3,
            Self::Nv12 | Self::Nv21 => 2,
            Self::Rgb24 | Self::Bgr24 | Self::Rgba | Self::Bgra | Self::Gray8 | Self::Gray16 => 1,
        }
    }

    /// Check if this is a planar YUV format.
    pub fn is_planar(&self) -> bool {
        matches!(
            self,
            Self::Yuv420p
                | Self::Yuv422p
                | Self::Yuv444p
                | Self::Yuva420p
                | Self::Yuv420p10le
                | Self::Yuv422p10le
                | Self::Yuv444p10le
        )
    }

    /// Check if samples are stored in two bytes.
    pub fn is_high_bit_depth(&self) -> bool {
        matches!(
            self,
            Self::Yuv420p10le | Self::Yuv422p10le | Self::Yuv444p10le | Self::Gray16
        )
    }

    /// Bytes used by one sample of a single component.
    pub fn bytes_per_sample(&self) -> usize {
        if self.is_high_bit_depth() {
            2
        } else {
            1
        }
    }

    /// Get chroma subsampling factors (horizontal, vertical).
    pub fn chroma_subsampling(&self) -> (u32, u32) {
        match self {
            Self::Yuv420p | Self::Yuva420p | Self::Yuv420p10le | Self::Nv12 | Self::Nv21 => {
                (2, 2)
            }
            Self::Yuv422p | Self::Yuv422p10le => (2, 1),
            _ => (1, 1),
        }
    }

    /// Whether a plane carries chroma samples (and is therefore subsampled).
    fn is_chroma_plane(&self, plane: usize) -> bool {
        match self {
            Self::Nv12 | Self::Nv21 => plane == 1,
            _ if self.is_planar() => plane == 1 || plane == 2,
            _ => false,
        }
    }

    /// Number of bytes holding pixel data in one row of a plane.
    ///
    /// Subsampled widths are rounded up so odd dimensions keep their last
    /// column. Returns 0 for planes the format does not have.
    pub fn row_bytes(&self, plane: usize, width: u32) -> usize {
        if plane >= self.num_planes() {
            return 0;
        }
        let width = width as usize;
        let (hsub, _) = self.chroma_subsampling();
        match self {
            Self::Nv12 | Self::Nv21 if plane == 1 => width.div_ceil(2) * 2,
            Self::Rgb24 | Self::Bgr24 => width * 3,
            Self::Rgba | Self::Bgra => width * 4,
            _ if self.is_chroma_plane(plane) => {
                width.div_ceil(hsub as usize) * self.bytes_per_sample()
            }
            _ => width * self.bytes_per_sample(),
        }
    }

    /// Number of rows in a plane, rounding subsampled heights up.
    pub fn plane_height(&self, plane: usize, height: u32) -> usize {
        if plane >= self.num_planes() {
            return 0;
        }
        let (_, vsub) = self.chroma_subsampling();
        if self.is_chroma_plane(plane) {
            (height as usize).div_ceil(vsub as usize)
        } else {
            height as usize
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Yuv420p => "yuv420p",
            Self::Yuv422p => "yuv422p",
            Self::Yuv444p => "yuv444p",
            Self::Yuva420p => "yuva420p",
            Self::Yuv420p10le => "yuv420p10le",
            Self::Yuv422p10le => "yuv422p10le",
            Self::Yuv444p10le => "yuv444p10le",
            Self::Nv12 => "nv12",
            Self::Nv21 => "nv21",
            Self::Rgb24 => "rgb24",
            Self::Bgr24 => "bgr24",
            Self::Rgba => "rgba",
            Self::Bgra => "bgra",
            Self::Gray8 => "gray8",
            Self::Gray16 => "gray16",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Frame flags indicating frame properties.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FrameFlags: u32 {
        /// This is a keyframe (I-frame).
        const KEYFRAME = 0x0001;
        /// Frame is corrupted or incomplete.
        const CORRUPT = 0x0002;
        /// Interlaced frame.
        const INTERLACED = 0x0008;
        /// Top field first (for interlaced content).
        const TOP_FIELD_FIRST = 0x0010;
    }
}

impl Default for FrameFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// A decoded video frame.
pub struct Frame {
    /// Frame data buffer.
    buffer: FrameBuffer,
    /// Presentation timestamp.
    pub pts: Timestamp,
    /// Decode timestamp.
    pub dts: Timestamp,
    /// Frame duration.
    pub duration: Duration,
    /// Frame flags.
    pub flags: FrameFlags,
    /// Picture order count.
    pub poc: i32,
    /// Opaque key/value metadata carried along with the frame.
    pub metadata: BTreeMap<String, String>,
}

impl Frame {
    /// Create a new frame with the specified parameters.
    pub fn new(width: u32, height: u32, format: PixelFormat, time_base: TimeBase) -> Self {
        Self {
            buffer: FrameBuffer::new(width, height, format),
            pts: Timestamp::new(Timestamp::NONE, time_base),
            dts: Timestamp::new(Timestamp::NONE, time_base),
            duration: Duration::new(0, time_base),
            flags: FrameFlags::empty(),
            poc: 0,
            metadata: BTreeMap::new(),
        }
    }

    /// Create a frame from an existing buffer.
    pub fn from_buffer(buffer: FrameBuffer) -> Self {
        Self {
            buffer,
            pts: Timestamp::none(),
            dts: Timestamp::none(),
            duration: Duration::zero(),
            flags: FrameFlags::empty(),
            poc: 0,
            metadata: BTreeMap::new(),
        }
    }

    /// Get the frame width.
    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    /// Get the frame height.
    pub fn height(&self) -> u32 {
        self.buffer.height
    }

    /// Get the pixel format.
    pub fn format(&self) -> PixelFormat {
        self.buffer.format
    }

    /// Get the frame buffer.
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Get a mutable reference to the frame buffer.
    pub fn buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    /// Get a plane's data.
    pub fn plane(&self, index: usize) -> Option<&[u8]> {
        self.buffer.plane(index)
    }

    /// Get a mutable reference to a plane's data.
    pub fn plane_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        self.buffer.plane_mut(index)
    }

    /// Get the stride (bytes per row) for a plane.
    pub fn stride(&self, plane: usize) -> usize {
        self.buffer.stride(plane)
    }

    /// Copy every non-pixel property (timestamps, flags, metadata) from `src`.
    pub fn copy_props_from(&mut self, src: &Frame) {
        self.pts = src.pts;
        self.dts = src.dts;
        self.duration = src.duration;
        self.flags = src.flags;
        self.poc = src.poc;
        self.metadata.clone_from(&src.metadata);
    }

    /// Duplicate the frame into freshly allocated storage.
    ///
    /// Reports an allocation failure instead of aborting the process.
    pub fn try_clone(&self) -> Result<Self> {
        let mut frame = Self::from_buffer(self.buffer.try_clone()?);
        frame.copy_props_from(self);
        Ok(frame)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("format", &self.format())
            .field("pts", &self.pts)
            .field("flags", &self.flags)
            .finish()
    }
}

/// A buffer for storing frame pixel data.
pub struct FrameBuffer {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: PixelFormat,
    /// Plane data.
    planes: Vec<PlaneData>,
}

struct PlaneData {
    data: Vec<u8>,
    stride: usize,
}

/// Allocate a zeroed byte vector without aborting on failure.
fn try_zeroed(size: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(size)
        .map_err(|e| Error::exhausted(format!("{} byte plane: {}", size, e)))?;
    data.resize(size, 0);
    Ok(data)
}

impl FrameBuffer {
    /// Create a new frame buffer.
    ///
    /// # Panics
    ///
    /// Aborts like any `Vec` allocation if memory is exhausted; use
    /// [`FrameBuffer::try_new`] where that must be reported instead.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let planes = (0..format.num_planes())
            .map(|plane| {
                let stride = Self::aligned_stride(format, plane, width);
                PlaneData {
                    data: vec![0u8; stride * format.plane_height(plane, height)],
                    stride,
                }
            })
            .collect();

        Self {
            width,
            height,
            format,
            planes,
        }
    }

    /// Create a new frame buffer, reporting allocation failure.
    pub fn try_new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        let mut planes = Vec::with_capacity(format.num_planes());
        for plane in 0..format.num_planes() {
            let stride = Self::aligned_stride(format, plane, width);
            planes.push(PlaneData {
                data: try_zeroed(stride * format.plane_height(plane, height))?,
                stride,
            });
        }

        Ok(Self {
            width,
            height,
            format,
            planes,
        })
    }

    /// Deep copy into independent storage, reporting allocation failure.
    pub fn try_clone(&self) -> Result<Self> {
        let mut planes = Vec::with_capacity(self.planes.len());
        for plane in &self.planes {
            let mut data = Vec::new();
            data.try_reserve_exact(plane.data.len()).map_err(|e| {
                Error::exhausted(format!("{} byte plane: {}", plane.data.len(), e))
            })?;
            data.extend_from_slice(&plane.data);
            planes.push(PlaneData {
                data,
                stride: plane.stride,
            });
        }

        Ok(Self {
            width: self.width,
            height: self.height,
            format: self.format,
            planes,
        })
    }

    // Align stride to 32 bytes for SIMD friendly rows.
    fn aligned_stride(format: PixelFormat, plane: usize, width: u32) -> usize {
        (format.row_bytes(plane, width) + 31) & !31
    }

    /// Get the number of planes.
    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    /// Get a plane's data.
    pub fn plane(&self, index: usize) -> Option<&[u8]> {
        self.planes.get(index).map(|p| p.data.as_slice())
    }

    /// Get a mutable reference to a plane's data.
    pub fn plane_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        self.planes.get_mut(index).map(|p| p.data.as_mut_slice())
    }

    /// Get the stride for a plane.
    pub fn stride(&self, plane: usize) -> usize {
        self.planes.get(plane).map(|p| p.stride).unwrap_or(0)
    }

    /// Get the total size of all planes in bytes.
    pub fn total_size(&self) -> usize {
        self.planes.iter().map(|p| p.data.len()).sum()
    }

    /// Fill all planes with a value.
    pub fn fill(&mut self, value: u8) {
        for plane in &mut self.planes {
            plane.data.fill(value);
        }
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("planes", &self.planes.len())
            .finish()
    }
}
