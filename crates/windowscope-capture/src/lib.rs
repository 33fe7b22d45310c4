//! Window capture for windowscope.
//!
//! This crate resolves window geometry, captures window content through an
//! ordered chain of strategies, and crops the result to a region. The GDI
//! backend is only compiled on Windows; the traits and geometry math are
//! platform independent.

mod error;
mod geometry;
mod region;
mod strategy;

#[cfg(windows)]
mod gdi;

pub use error::CaptureError;
pub use geometry::WindowGeometryProvider;
pub use region::{clamp_region, crop_frame};
pub use strategy::{CaptureStrategy, ChainCapture, StrategyChain};

#[cfg(windows)]
pub use gdi::{
    default_chain, enumerate_windows, window_exists, CompositorPrint, DirectCopy, Win32Geometry,
};

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;
