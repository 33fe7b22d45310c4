//! Window geometry lookup.

use windowscope_ipc::{Rect, WindowHandle, WindowInfo};

use crate::CaptureResult;

/// Resolves a window's current on-screen state.
///
/// Implementations must not cache: the engine asks on every tick because the
/// window may move, resize, minimize or disappear between ticks.
pub trait WindowGeometryProvider: Send + Sync {
    /// Current screen bounds. A window that no longer exists yields a
    /// degenerate rectangle rather than an error.
    fn window_rect(&self, window: WindowHandle) -> Rect;

    /// Whether the window is currently minimized.
    fn is_minimized(&self, window: WindowHandle) -> bool;

    /// Visible, titled windows that can be offered for monitoring.
    fn enumerate_windows(&self) -> CaptureResult<Vec<WindowInfo>>;
}
