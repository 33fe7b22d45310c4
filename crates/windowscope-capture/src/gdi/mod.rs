//! GDI-based window capture for Windows.

mod compositor_print;
mod dc;
mod direct_copy;
pub mod window;

pub use compositor_print::CompositorPrint;
pub use direct_copy::DirectCopy;
pub use window::{enumerate_windows, window_exists, Win32Geometry};

use windows::Win32::Foundation::HWND;
use windowscope_ipc::WindowHandle;

use crate::error::CaptureError;
use crate::strategy::StrategyChain;
use crate::CaptureResult;

/// `PrintWindow` flag: render only the client area.
const PW_CLIENTONLY: u32 = 0x1;

/// `PrintWindow` flag: render DirectComposition and hardware-accelerated content.
const PW_RENDERFULLCONTENT: u32 = 0x2;

/// The default chain: direct copy first, compositor print as fallback.
pub fn default_chain() -> StrategyChain {
    StrategyChain::new(vec![Box::new(DirectCopy), Box::new(CompositorPrint)])
}

pub(crate) fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.raw() as *mut std::ffi::c_void)
}

/// Convert requested dimensions to GDI's signed sizes.
pub(crate) fn gdi_size(width: u32, height: u32) -> CaptureResult<(i32, i32)> {
    match (i32::try_from(width), i32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(CaptureError::GeometryInvalid {
            width: width.min(i32::MAX as u32) as i32,
            height: height.min(i32::MAX as u32) as i32,
        }),
    }
}

/// GDI leaves the alpha byte undefined; force it opaque.
pub(crate) fn force_opaque(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(4) {
        pixel[3] = 0xFF;
    }
}
