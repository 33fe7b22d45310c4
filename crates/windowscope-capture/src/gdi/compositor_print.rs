//! Ask the compositor to render the window, then read back DIB bits.

use std::mem::size_of;

use bytes::Bytes;
use windows::Win32::Graphics::Gdi::{
    GetDIBits, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS,
};
use windows::Win32::Storage::Xps::{PrintWindow, PRINT_WINDOW_FLAGS};
use windowscope_ipc::{CaptureMethod, Frame, WindowHandle};

use super::dc::{Bitmap, MemoryDc, Selection, WindowDc};
use super::{force_opaque, gdi_size, hwnd, PW_RENDERFULLCONTENT};
use crate::error::CaptureError;
use crate::strategy::CaptureStrategy;
use crate::CaptureResult;

/// `PrintWindow` into a compatible bitmap, read back through a top-down
/// 32-bit `BITMAPINFO` descriptor.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompositorPrint;

impl CompositorPrint {
    fn failed(reason: impl Into<String>) -> CaptureError {
        CaptureError::StrategyFailed {
            method: CaptureMethod::CompositorPrint,
            reason: reason.into(),
        }
    }
}

impl CaptureStrategy for CompositorPrint {
    fn method(&self) -> CaptureMethod {
        CaptureMethod::CompositorPrint
    }

    fn capture(&self, window: WindowHandle, width: u32, height: u32) -> CaptureResult<Frame> {
        let (w, h) = gdi_size(width, height)?;
        let hwnd = hwnd(window);

        let window_dc = WindowDc::acquire(hwnd)?;
        let mem_dc = MemoryDc::compatible_with(window_dc.hdc())?;
        let bitmap = Bitmap::compatible(window_dc.hdc(), w, h)?;

        // GetDIBits requires the bitmap to be deselected, so the selection
        // only lives for the PrintWindow call.
        {
            let _selection = Selection::select(&mem_dc, &bitmap)?;
            let flags = PRINT_WINDOW_FLAGS(PW_RENDERFULLCONTENT);
            if !unsafe { PrintWindow(hwnd, mem_dc.hdc(), flags) }.as_bool() {
                return Err(Self::failed("PrintWindow refused"));
            }
        }

        let mut info = BITMAPINFO::default();
        info.bmiHeader.biSize = size_of::<BITMAPINFOHEADER>() as u32;
        info.bmiHeader.biWidth = w;
        // Negative height selects a top-down DIB.
        info.bmiHeader.biHeight = -h;
        info.bmiHeader.biPlanes = 1;
        info.bmiHeader.biBitCount = 32;
        info.bmiHeader.biCompression = BI_RGB.0;

        let mut pixels = vec![0u8; Frame::buffer_size(width, height)];
        let lines = unsafe {
            GetDIBits(
                mem_dc.hdc(),
                bitmap.handle(),
                0,
                height,
                Some(pixels.as_mut_ptr().cast()),
                &mut info,
                DIB_RGB_COLORS,
            )
        };
        if lines <= 0 {
            return Err(Self::failed("GetDIBits copied no scan lines"));
        }

        force_opaque(&mut pixels);
        Ok(Frame::new(Bytes::from(pixels), width, height))
    }
}
