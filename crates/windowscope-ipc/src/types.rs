//! Common types used across engine messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a target window.
///
/// On Windows this is the raw `HWND` value. The engine never caches
/// anything about the window beyond the handle itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    /// Raw platform value.
    pub fn raw(self) -> isize {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// An axis-aligned rectangle in integer pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a rectangle from origin and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from edge coordinates, as returned by `GetWindowRect`.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            width: right.saturating_sub(left),
            height: bottom.saturating_sub(top),
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// A window that has collapsed to zero or negative size.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// A window offered for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowInfo {
    /// Window handle.
    pub handle: WindowHandle,

    /// Window title.
    pub title: String,

    /// Window dimensions.
    pub width: u32,
    pub height: u32,
}

impl WindowInfo {
    /// Describe a window from its screen bounds. Inverted bounds read as zero.
    pub fn new(handle: WindowHandle, title: impl Into<String>, bounds: Rect) -> Self {
        Self {
            handle,
            title: title.into(),
            width: bounds.width.max(0) as u32,
            height: bounds.height.max(0) as u32,
        }
    }
}

/// Which capture strategy produced a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureMethod {
    /// Copy from the window's own device context.
    DirectCopy,

    /// Ask the compositor to render the window into an off-screen surface.
    CompositorPrint,
}

impl CaptureMethod {
    /// Stable tag shown in the viewer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectCopy => "direct-copy",
            Self::CompositorPrint => "compositor-print",
        }
    }
}

impl fmt::Display for CaptureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a persistent capture failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The target window is minimized and has no content to capture.
    TargetMinimized,

    /// Capture keeps failing for some other reason.
    RepeatedFailure,
}

impl FailureKind {
    /// User-facing diagnostic for this failure.
    pub fn message(self) -> &'static str {
        match self {
            Self::TargetMinimized => {
                "Target window is minimized and cannot be captured. Restore the window to resume."
            }
            Self::RepeatedFailure => "Capture failed repeatedly. Check the target window state.",
        }
    }
}
