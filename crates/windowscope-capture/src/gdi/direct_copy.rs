//! Copy from the window's own device context.

use bytes::Bytes;
use tracing::trace;
use windows::Win32::Graphics::Gdi::{BitBlt, GetBitmapBits, SRCCOPY};
use windows::Win32::Storage::Xps::{PrintWindow, PRINT_WINDOW_FLAGS};
use windowscope_ipc::{CaptureMethod, Frame, WindowHandle};

use super::dc::{Bitmap, MemoryDc, Selection, WindowDc};
use super::{force_opaque, gdi_size, hwnd, PW_CLIENTONLY, PW_RENDERFULLCONTENT};
use crate::error::CaptureError;
use crate::strategy::CaptureStrategy;
use crate::CaptureResult;

/// Render the window into a compatible bitmap, falling back to a raw
/// `BitBlt` from the window DC when the compositor-aware path is refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectCopy;

impl CaptureStrategy for DirectCopy {
    fn method(&self) -> CaptureMethod {
        CaptureMethod::DirectCopy
    }

    fn capture(&self, window: WindowHandle, width: u32, height: u32) -> CaptureResult<Frame> {
        let (w, h) = gdi_size(width, height)?;
        let hwnd = hwnd(window);

        let window_dc = WindowDc::acquire(hwnd)?;
        let mem_dc = MemoryDc::compatible_with(window_dc.hdc())?;
        let bitmap = Bitmap::compatible(window_dc.hdc(), w, h)?;
        let _selection = Selection::select(&mem_dc, &bitmap)?;

        let flags = PRINT_WINDOW_FLAGS(PW_CLIENTONLY | PW_RENDERFULLCONTENT);
        let printed = unsafe { PrintWindow(hwnd, mem_dc.hdc(), flags) }.as_bool();
        if !printed {
            trace!("PrintWindow refused, falling back to BitBlt");
            unsafe { BitBlt(mem_dc.hdc(), 0, 0, w, h, window_dc.hdc(), 0, 0, SRCCOPY) }.map_err(
                |e| CaptureError::StrategyFailed {
                    method: CaptureMethod::DirectCopy,
                    reason: format!("PrintWindow refused and BitBlt failed: {}", e.message()),
                },
            )?;
        }

        let len = Frame::buffer_size(width, height);
        let mut pixels = vec![0u8; len];
        let copied = unsafe {
            GetBitmapBits(
                bitmap.handle(),
                len as i32,
                pixels.as_mut_ptr().cast(),
            )
        };
        if copied as usize != len {
            return Err(CaptureError::StrategyFailed {
                method: CaptureMethod::DirectCopy,
                reason: format!("GetBitmapBits copied {copied} of {len} bytes"),
            });
        }

        force_opaque(&mut pixels);
        Ok(Frame::new(Bytes::from(pixels), width, height))
    }
}
