//! Plane copy helpers.
//!
//! Rows are addressed through a line size that may differ between source and
//! destination. A single field of an interlaced plane is reached by starting
//! one line in and doubling the line size.

use crate::error::{Error, Result};

/// Copy `height` rows of `bytewidth` bytes from `src` to `dst`.
///
/// Row `y` starts at `y * src_linesize` in the source and at
/// `y * dst_linesize` in the destination. Fails without copying anything if
/// either buffer is too short for the requested rows.
pub fn copy_plane(
    dst: &mut [u8],
    dst_linesize: usize,
    src: &[u8],
    src_linesize: usize,
    bytewidth: usize,
    height: usize,
) -> Result<()> {
    if height == 0 || bytewidth == 0 {
        return Ok(());
    }
    if bytewidth > dst_linesize || bytewidth > src_linesize {
        return Err(Error::invalid_param(format!(
            "row of {} bytes exceeds line size (src {}, dst {})",
            bytewidth, src_linesize, dst_linesize
        )));
    }

    let needed_src = (height - 1) * src_linesize + bytewidth;
    if src.len() < needed_src {
        return Err(Error::BufferTooSmall {
            needed: needed_src,
            available: src.len(),
        });
    }
    let needed_dst = (height - 1) * dst_linesize + bytewidth;
    if dst.len() < needed_dst {
        return Err(Error::BufferTooSmall {
            needed: needed_dst,
            available: dst.len(),
        });
    }

    if dst_linesize == bytewidth && src_linesize == bytewidth {
        dst[..needed_dst].copy_from_slice(&src[..needed_src]);
        return Ok(());
    }

    for y in 0..height {
        let s = y * src_linesize;
        let d = y * dst_linesize;
        dst[d..d + bytewidth].copy_from_slice(&src[s..s + bytewidth]);
    }
    Ok(())
}

/// Number of rows belonging to the field that starts at row `parity`.
///
/// `parity` 0 selects rows 0, 2, 4, ... and 1 selects rows 1, 3, 5, ...
pub fn field_rows(height: usize, parity: usize) -> usize {
    (height + 1).saturating_sub(parity) / 2
}

/// Copy one field (every second row, starting at row `parity`) of a plane.
pub fn copy_field(
    dst: &mut [u8],
    dst_linesize: usize,
    src: &[u8],
    src_linesize: usize,
    bytewidth: usize,
    height: usize,
    parity: usize,
) -> Result<()> {
    let rows = field_rows(height, parity);
    if rows == 0 {
        return Ok(());
    }
    let dst_off = dst_linesize * parity;
    let src_off = src_linesize * parity;
    let dst = dst.get_mut(dst_off..).ok_or(Error::BufferTooSmall {
        needed: dst_off,
        available: 0,
    })?;
    let src = src.get(src_off..).ok_or(Error::BufferTooSmall {
        needed: src_off,
        available: 0,
    })?;
    copy_plane(
        dst,
        dst_linesize * 2,
        src,
        src_linesize * 2,
        bytewidth,
        rows,
    )
}
