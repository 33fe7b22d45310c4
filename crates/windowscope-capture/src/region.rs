//! Region clamping and cropping.
//!
//! The region is re-derived against the window size on every tick since the
//! window may have been resized after the region was chosen. Clamping never
//! fails; it moves toward the nearest valid sub-rectangle instead.

use bytes::BytesMut;
use windowscope_ipc::{Frame, Rect, BYTES_PER_PIXEL};

use crate::error::CaptureError;
use crate::CaptureResult;

/// Clamp `region` so that it lies within `[0, window_width) x [0, window_height)`.
pub fn clamp_region(region: Rect, window_width: i32, window_height: i32) -> Rect {
    if window_width <= 0 || window_height <= 0 {
        return Rect::default();
    }

    let x = region.x.min(window_width - 1).max(0);
    let y = region.y.min(window_height - 1).max(0);
    let width = region.width.min(window_width - x).max(0);
    let height = region.height.min(window_height - y).max(0);

    Rect::new(x, y, width, height)
}

/// Copy the pixels of `rect` out of `frame`.
///
/// `rect` must already be clamped to the frame bounds.
pub fn crop_frame(frame: &Frame, rect: Rect) -> CaptureResult<Frame> {
    if !frame.is_valid() {
        return Err(CaptureError::FrameConversion(format!(
            "{} bytes do not form a {}x{} frame",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let within = rect.x >= 0
        && rect.y >= 0
        && rect.width > 0
        && rect.height > 0
        && rect.right() as i64 <= frame.width as i64
        && rect.bottom() as i64 <= frame.height as i64;
    if !within {
        return Err(CaptureError::FrameConversion(format!(
            "crop {rect} outside {}x{} frame",
            frame.width, frame.height
        )));
    }

    let (x, y) = (rect.x as usize, rect.y as usize);
    let (width, height) = (rect.width as u32, rect.height as u32);

    // Full-frame crops share the buffer.
    if x == 0 && y == 0 && width == frame.width && height == frame.height {
        return Ok(frame.clone());
    }

    let src_stride = frame.stride();
    let row_len = width as usize * BYTES_PER_PIXEL;
    let mut out = BytesMut::with_capacity(row_len * height as usize);
    for row in y..y + height as usize {
        let start = row * src_stride + x * BYTES_PER_PIXEL;
        out.extend_from_slice(&frame.data[start..start + row_len]);
    }

    Ok(Frame::new(out.freeze(), width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    /// Frame whose pixel at (x, y) is `[x, y, 0, 255]`.
    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity(Frame::buffer_size(width, height));
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        Frame::new(Bytes::from(data), width, height)
    }

    #[test]
    fn test_clamp_inside_is_unchanged() {
        let region = Rect::new(10, 20, 100, 50);
        assert_eq!(clamp_region(region, 800, 600), region);
    }

    #[test]
    fn test_clamp_after_shrink() {
        // 800x600 window shrank to 400x300 with region (700, 500, 50, 50).
        let region = Rect::new(700, 500, 50, 50);
        assert_eq!(clamp_region(region, 400, 300), Rect::new(399, 299, 1, 1));
    }

    #[test]
    fn test_clamp_negative_origin() {
        let region = Rect::new(-20, -5, 100, 100);
        assert_eq!(clamp_region(region, 50, 60), Rect::new(0, 0, 50, 60));
    }

    #[test]
    fn test_clamp_stays_within_window() {
        let sizes = [(1, 1), (7, 3), (400, 300), (1920, 1080)];
        let coords = [-500, -1, 0, 1, 6, 299, 399, 1079, 5000];
        let extents = [1, 2, 10, 50, 300, 4000];

        for &(w, h) in &sizes {
            for &x in &coords {
                for &y in &coords {
                    for &rw in &extents {
                        for &rh in &extents {
                            let out = clamp_region(Rect::new(x, y, rw, rh), w, h);
                            assert!(out.x >= 0 && out.right() <= w, "{out} in {w}x{h}");
                            assert!(out.y >= 0 && out.bottom() <= h, "{out} in {w}x{h}");
                            assert!(out.width > 0 && out.height > 0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_clamp_degenerate_window() {
        assert_eq!(clamp_region(Rect::new(5, 5, 10, 10), 0, 100), Rect::default());
        assert_eq!(clamp_region(Rect::new(5, 5, 10, 10), 100, -3), Rect::default());
    }

    #[test]
    fn test_crop_copies_rows() {
        let frame = gradient_frame(8, 6);
        let cropped = crop_frame(&frame, Rect::new(2, 3, 3, 2)).unwrap();

        assert_eq!((cropped.width, cropped.height), (3, 2));
        assert!(cropped.is_valid());
        assert_eq!(&cropped.data[0..4], &[2, 3, 0, 255]);
        assert_eq!(&cropped.data[8..12], &[4, 3, 0, 255]);
        assert_eq!(&cropped.data[12..16], &[2, 4, 0, 255]);
    }

    #[test]
    fn test_crop_full_frame_shares_buffer() {
        let frame = gradient_frame(4, 4);
        let cropped = crop_frame(&frame, Rect::new(0, 0, 4, 4)).unwrap();
        assert_eq!(cropped.data.as_ptr(), frame.data.as_ptr());
    }

    #[test]
    fn test_crop_rejects_out_of_bounds() {
        let frame = gradient_frame(4, 4);
        assert!(crop_frame(&frame, Rect::new(2, 2, 3, 1)).is_err());
        assert!(crop_frame(&frame, Rect::new(0, 0, 0, 1)).is_err());
    }

    #[test]
    fn test_crop_rejects_malformed_frame() {
        let frame = Frame::new(Bytes::from(vec![0u8; 7]), 2, 2);
        assert!(crop_frame(&frame, Rect::new(0, 0, 1, 1)).is_err());
    }
}
