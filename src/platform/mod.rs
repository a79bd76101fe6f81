// src/platform/mod.rs

//! Windowing session: compositor connection and the full-screen window.
//!
//! The `WindowSystem` trait is the seam between the presentation core and the
//! windowing toolkit. `WaylandSession` drives a real compositor. The mock
//! implementation stands in for it in tests.

use crate::config::WindowConfig;
use crate::error::PresentError;
use std::ffi::c_void;
use std::time::Duration;

#[cfg(test)]
pub mod mock;
#[cfg(feature = "native")]
pub mod wayland;

#[cfg(feature = "native")]
pub use wayland::WaylandSession;

/// Window size in pixels, fixed when the window is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width as the signed integer the GL and EGL entry points take.
    pub fn width_i32(&self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    /// Height as the signed integer the GL and EGL entry points take.
    pub fn height_i32(&self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }
}

/// Opaque compositor display handle (`wl_display*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeDisplay(*mut c_void);

impl NativeDisplay {
    pub fn new(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

/// Opaque compositor surface handle (`wl_surface*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeSurface(*mut c_void);

impl NativeSurface {
    pub fn new(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

/// Opaque handle to a producer-owned native buffer (`ANativeWindowBuffer*`).
///
/// The core never inspects, retains or frees the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeBuffer(*mut c_void);

impl NativeBuffer {
    /// Wraps a raw native buffer pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live native buffer that the GPU driver can
    /// import, and must stay valid for the duration of every `present` call
    /// it is passed to.
    pub unsafe fn from_raw(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

/// Handles and metadata of an open window, as consumed by the graphics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeWindow {
    pub display: NativeDisplay,
    pub surface: NativeSurface,
    pub dimensions: Dimensions,
}

/// A windowing toolkit able to produce one full-screen window.
pub trait WindowSystem {
    /// Initializes the toolkit and creates the full-screen window.
    ///
    /// Returns `ToolkitInitFailed` or `WindowCreateFailed`. Whatever was
    /// acquired before the failure stays held until `close`.
    fn open(&mut self, config: &WindowConfig) -> Result<NativeWindow, PresentError>;

    /// Pumps compositor events for up to `timeout`.
    ///
    /// Returns `true` once the compositor has asked the window to close.
    fn dispatch_events(&mut self, timeout: Duration) -> Result<bool, PresentError>;

    /// Destroys the window, then the toolkit session. Releases only what is
    /// held and may be called any number of times.
    fn close(&mut self);
}
