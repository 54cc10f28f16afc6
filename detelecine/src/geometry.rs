//! Stream geometry: how many bytes and rows of each plane get copied.

use detelecine_core::{Frame, PixelFormat};
use tracing::debug;

/// Maximum number of planes any supported pixel format has.
pub const MAX_PLANES: usize = 4;

/// Per-plane copy geometry, fixed for the life of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamGeometry {
    /// Number of planes in the video format.
    pub nb_planes: usize,
    /// Bytes of pixel data in one row of each plane.
    pub stride: [usize; MAX_PLANES],
    /// Number of rows in each plane.
    pub plane_height: [usize; MAX_PLANES],
}

impl StreamGeometry {
    /// Create geometry from explicit per-plane row sizes and heights.
    ///
    /// The plane count is the shorter of the two slices, capped at
    /// [`MAX_PLANES`].
    pub fn new(strides: &[usize], heights: &[usize]) -> Self {
        let nb_planes = strides.len().min(heights.len()).min(MAX_PLANES);
        let mut stride = [0; MAX_PLANES];
        let mut plane_height = [0; MAX_PLANES];
        stride[..nb_planes].copy_from_slice(&strides[..nb_planes]);
        plane_height[..nb_planes].copy_from_slice(&heights[..nb_planes]);
        Self {
            nb_planes,
            stride,
            plane_height,
        }
    }

    /// Derive geometry for a video of the given size and format.
    ///
    /// Luma and alpha planes keep the full height, chroma planes get the
    /// subsampled height rounded up.
    pub fn for_video(width: u32, height: u32, format: PixelFormat) -> Self {
        let nb_planes = format.num_planes().min(MAX_PLANES);
        let mut stride = [0; MAX_PLANES];
        let mut plane_height = [0; MAX_PLANES];
        for plane in 0..nb_planes {
            stride[plane] = format.row_bytes(plane, width);
            plane_height[plane] = format.plane_height(plane, height);
        }
        let geometry = Self {
            nb_planes,
            stride,
            plane_height,
        };
        debug!(
            "Geometry {}x{} {}: {} planes, strides {:?}, heights {:?}",
            width,
            height,
            format,
            nb_planes,
            geometry.strides(),
            geometry.heights()
        );
        geometry
    }

    /// Row sizes of the planes in use.
    pub fn strides(&self) -> &[usize] {
        &self.stride[..self.nb_planes]
    }

    /// Heights of the planes in use.
    pub fn heights(&self) -> &[usize] {
        &self.plane_height[..self.nb_planes]
    }

    /// Check that every plane of `frame` can serve as source or destination
    /// for a full-plane copy.
    pub fn fits(&self, frame: &Frame) -> bool {
        (0..self.nb_planes).all(|i| {
            let rows = self.plane_height[i];
            let linesize = frame.stride(i);
            match frame.plane(i) {
                Some(data) => {
                    rows == 0
                        || (linesize >= self.stride[i]
                            && data.len() >= (rows - 1) * linesize + self.stride[i])
                }
                None => rows == 0 || self.stride[i] == 0,
            }
        })
    }
}
