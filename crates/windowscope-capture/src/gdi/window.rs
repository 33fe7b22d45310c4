//! Window enumeration and geometry lookup.

use tracing::{debug, instrument, trace};
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowRect, GetWindowTextLengthW, GetWindowTextW, IsIconic, IsWindow,
    IsWindowVisible,
};
use windowscope_ipc::{Rect, WindowHandle, WindowInfo};

use super::hwnd;
use crate::error::CaptureError;
use crate::geometry::WindowGeometryProvider;
use crate::CaptureResult;

/// Geometry provider backed by `GetWindowRect` and `IsIconic`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Geometry;

impl WindowGeometryProvider for Win32Geometry {
    fn window_rect(&self, window: WindowHandle) -> Rect {
        if !window_exists(window) {
            trace!(%window, "Window no longer exists");
            return Rect::default();
        }
        window_bounds(hwnd(window)).unwrap_or_else(|| {
            trace!(%window, "GetWindowRect failed");
            Rect::default()
        })
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        unsafe { IsIconic(hwnd(window)) }.as_bool()
    }

    fn enumerate_windows(&self) -> CaptureResult<Vec<WindowInfo>> {
        enumerate_windows()
    }
}

/// Whether `window` names a live window, titled or not, visible or not.
pub fn window_exists(window: WindowHandle) -> bool {
    unsafe { IsWindow(hwnd(window)) }.as_bool()
}

/// Enumerate all visible windows that have a title.
#[instrument(name = "enumerate_windows")]
pub fn enumerate_windows() -> CaptureResult<Vec<WindowInfo>> {
    let mut windows: Vec<WindowInfo> = Vec::new();

    unsafe {
        EnumWindows(
            Some(collect_window),
            LPARAM(&mut windows as *mut Vec<WindowInfo> as isize),
        )
        .map_err(|_| CaptureError::windows_api("Failed to enumerate windows"))?;
    }

    debug!(count = windows.len(), "Enumerated windows");
    Ok(windows)
}

unsafe extern "system" fn collect_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let windows = &mut *(lparam.0 as *mut Vec<WindowInfo>);
    windows.extend(listed_window(hwnd));
    BOOL::from(true)
}

/// A window worth offering for monitoring: visible, titled and measurable.
fn listed_window(hwnd: HWND) -> Option<WindowInfo> {
    if !unsafe { IsWindowVisible(hwnd) }.as_bool() {
        return None;
    }
    let title = window_title(hwnd)?;
    let bounds = window_bounds(hwnd)?;
    Some(WindowInfo::new(WindowHandle(hwnd.0 as isize), title, bounds))
}

/// Non-blank window title.
fn window_title(hwnd: HWND) -> Option<String> {
    let capacity = usize::try_from(unsafe { GetWindowTextLengthW(hwnd) }).ok()?;
    if capacity == 0 {
        return None;
    }

    let mut buffer = vec![0u16; capacity + 1];
    let copied = usize::try_from(unsafe { GetWindowTextW(hwnd, &mut buffer) }).ok()?;
    let title = String::from_utf16_lossy(&buffer[..copied.min(capacity)]);
    (!title.trim().is_empty()).then_some(title)
}

/// Screen bounds of a window, frame included.
fn window_bounds(hwnd: HWND) -> Option<Rect> {
    let mut rect = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut rect) }.ok()?;
    Some(Rect::from_edges(rect.left, rect.top, rect.right, rect.bottom))
}
