//! Scoped GDI handles.
//!
//! Each guard releases its handle on drop, so every exit path of a capture
//! attempt (early return, `?`, panic) gives the handles back to the OS.
//! Declare guards in acquisition order; locals drop in reverse.

use tracing::trace;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetWindowDC, ReleaseDC,
    SelectObject, HBITMAP, HDC, HGDIOBJ,
};

use crate::error::CaptureError;
use crate::CaptureResult;

/// Device context of a whole window, from `GetWindowDC`.
pub(crate) struct WindowDc {
    hwnd: HWND,
    hdc: HDC,
}

impl WindowDc {
    pub(crate) fn acquire(hwnd: HWND) -> CaptureResult<Self> {
        let hdc = unsafe { GetWindowDC(hwnd) };
        if hdc.0.is_null() {
            return Err(CaptureError::windows_api("GetWindowDC returned null"));
        }
        Ok(Self { hwnd, hdc })
    }

    pub(crate) fn hdc(&self) -> HDC {
        self.hdc
    }
}

impl Drop for WindowDc {
    fn drop(&mut self) {
        unsafe {
            let _ = ReleaseDC(self.hwnd, self.hdc);
        }
        trace!("Released window DC");
    }
}

/// Off-screen memory DC compatible with another DC.
pub(crate) struct MemoryDc {
    hdc: HDC,
}

impl MemoryDc {
    pub(crate) fn compatible_with(hdc: HDC) -> CaptureResult<Self> {
        let mem_dc = unsafe { CreateCompatibleDC(hdc) };
        if mem_dc.0.is_null() {
            return Err(CaptureError::windows_api("CreateCompatibleDC failed"));
        }
        Ok(Self { hdc: mem_dc })
    }

    pub(crate) fn hdc(&self) -> HDC {
        self.hdc
    }
}

impl Drop for MemoryDc {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteDC(self.hdc);
        }
    }
}

/// Device-dependent bitmap sized to the capture.
pub(crate) struct Bitmap {
    handle: HBITMAP,
}

impl Bitmap {
    pub(crate) fn compatible(hdc: HDC, width: i32, height: i32) -> CaptureResult<Self> {
        let handle = unsafe { CreateCompatibleBitmap(hdc, width, height) };
        if handle.0.is_null() {
            return Err(CaptureError::windows_api(format!(
                "CreateCompatibleBitmap failed for {width}x{height}"
            )));
        }
        Ok(Self { handle })
    }

    pub(crate) fn handle(&self) -> HBITMAP {
        self.handle
    }
}

impl Drop for Bitmap {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteObject(self.handle);
        }
    }
}

/// A bitmap selected into a memory DC; restores the previous object on drop.
pub(crate) struct Selection {
    hdc: HDC,
    previous: HGDIOBJ,
}

impl Selection {
    pub(crate) fn select(dc: &MemoryDc, bitmap: &Bitmap) -> CaptureResult<Self> {
        let previous = unsafe { SelectObject(dc.hdc(), bitmap.handle()) };
        if previous.0.is_null() {
            return Err(CaptureError::windows_api("SelectObject failed"));
        }
        Ok(Self {
            hdc: dc.hdc(),
            previous,
        })
    }
}

impl Drop for Selection {
    fn drop(&mut self) {
        unsafe {
            let _ = SelectObject(self.hdc, self.previous);
        }
    }
}
