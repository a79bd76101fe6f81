// src/egl/mod.rs

//! EGL layer: driver seam, graphics context state machine and extension
//! entry point resolution.
//!
//! All driver calls go through [`EglDriver`]. The native implementation
//! (`KhronosEgl`) talks to libEGL and wayland-egl. Tests use a
//! fault-injecting mock.

use crate::platform::{NativeBuffer, NativeDisplay, NativeSurface};
use std::fmt;

pub mod context;
pub mod extensions;
#[cfg(feature = "native")]
pub mod khronos;
#[cfg(test)]
pub mod mock;

pub use context::{GraphicsContext, Stage};
pub use extensions::ExtensionTable;
#[cfg(feature = "native")]
pub use khronos::KhronosEgl;

/// Untyped extension entry point as returned by `eglGetProcAddress`.
pub type ProcAddress = extern "system" fn();

/// EGL attribute and enum values used by the core.
pub mod attrib {
    pub const NONE: i32 = 0x3038;
    pub const SURFACE_TYPE: i32 = 0x3033;
    pub const WINDOW_BIT: i32 = 0x0004;
    pub const RENDERABLE_TYPE: i32 = 0x3040;
    pub const OPENGL_ES_BIT: i32 = 0x0001;
    pub const OPENGL_ES2_BIT: i32 = 0x0004;
    pub const OPENGL_ES3_BIT: i32 = 0x0040;
    pub const CONTEXT_CLIENT_VERSION: i32 = 0x3098;
    pub const OPENGL_ES_API: u32 = 0x30A0;
}

/// Raw EGL error code, displayed by its symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EglError(pub i32);

impl EglError {
    pub const SUCCESS: EglError = EglError(0x3000);
    pub const NOT_INITIALIZED: EglError = EglError(0x3001);
    pub const BAD_ACCESS: EglError = EglError(0x3002);
    pub const BAD_ALLOC: EglError = EglError(0x3003);
    pub const BAD_ATTRIBUTE: EglError = EglError(0x3004);
    pub const BAD_CONFIG: EglError = EglError(0x3005);
    pub const BAD_CONTEXT: EglError = EglError(0x3006);
    pub const BAD_CURRENT_SURFACE: EglError = EglError(0x3007);
    pub const BAD_DISPLAY: EglError = EglError(0x3008);
    pub const BAD_MATCH: EglError = EglError(0x3009);
    pub const BAD_NATIVE_PIXMAP: EglError = EglError(0x300A);
    pub const BAD_NATIVE_WINDOW: EglError = EglError(0x300B);
    pub const BAD_PARAMETER: EglError = EglError(0x300C);
    pub const BAD_SURFACE: EglError = EglError(0x300D);
    pub const CONTEXT_LOST: EglError = EglError(0x300E);

    pub fn code(self) -> i32 {
        self.0
    }

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::SUCCESS => "EGL_SUCCESS",
            Self::NOT_INITIALIZED => "EGL_NOT_INITIALIZED",
            Self::BAD_ACCESS => "EGL_BAD_ACCESS",
            Self::BAD_ALLOC => "EGL_BAD_ALLOC",
            Self::BAD_ATTRIBUTE => "EGL_BAD_ATTRIBUTE",
            Self::BAD_CONFIG => "EGL_BAD_CONFIG",
            Self::BAD_CONTEXT => "EGL_BAD_CONTEXT",
            Self::BAD_CURRENT_SURFACE => "EGL_BAD_CURRENT_SURFACE",
            Self::BAD_DISPLAY => "EGL_BAD_DISPLAY",
            Self::BAD_MATCH => "EGL_BAD_MATCH",
            Self::BAD_NATIVE_PIXMAP => "EGL_BAD_NATIVE_PIXMAP",
            Self::BAD_NATIVE_WINDOW => "EGL_BAD_NATIVE_WINDOW",
            Self::BAD_PARAMETER => "EGL_BAD_PARAMETER",
            Self::BAD_SURFACE => "EGL_BAD_SURFACE",
            Self::CONTEXT_LOST => "EGL_CONTEXT_LOST",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for EglError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "unknown EGL error {:#06x}", self.0),
        }
    }
}

/// Driver-level EGL operations the core depends on.
///
/// Handles are associated types so the state machine owns typed values, and
/// the mock can hand out plain integers. Every method maps onto one native
/// call. Methods that can fail return the driver's error code.
pub trait EglDriver {
    type Display: Copy + fmt::Debug;
    type Config: Copy + fmt::Debug;
    /// Compositor-protocol drawable wrapping the native surface (`wl_egl_window`).
    type Drawable;
    type Surface: Copy + fmt::Debug;
    type Context: Copy + fmt::Debug;

    /// `eglGetDisplay`. `None` stands for `EGL_NO_DISPLAY`.
    fn get_display(&mut self, native: NativeDisplay) -> Option<Self::Display>;

    /// `eglInitialize`, returning the negotiated `(major, minor)` version.
    fn initialize(&mut self, display: Self::Display) -> Result<(i32, i32), EglError>;

    /// `eglQueryString(EGL_EXTENSIONS)`.
    fn query_extensions(&mut self, display: Self::Display) -> Option<String>;

    /// `eglChooseConfig`, keeping the first match.
    fn choose_config(
        &mut self,
        display: Self::Display,
        attribs: &[i32],
    ) -> Result<Option<Self::Config>, EglError>;

    /// `wl_egl_window_create`.
    fn create_drawable(
        &mut self,
        surface: NativeSurface,
        width: i32,
        height: i32,
    ) -> Result<Self::Drawable, String>;

    /// `eglCreateWindowSurface` over the drawable.
    fn create_window_surface(
        &mut self,
        display: Self::Display,
        config: Self::Config,
        drawable: &Self::Drawable,
    ) -> Result<Self::Surface, EglError>;

    /// `eglBindAPI`.
    fn bind_api(&mut self, api: u32) -> Result<(), EglError>;

    /// `eglCreateContext` without a share context.
    fn create_context(
        &mut self,
        display: Self::Display,
        config: Self::Config,
        attribs: &[i32],
    ) -> Result<Self::Context, EglError>;

    /// `eglMakeCurrent` with `surface` as both draw and read surface.
    fn make_current(
        &mut self,
        display: Self::Display,
        surface: Self::Surface,
        context: Self::Context,
    ) -> Result<(), EglError>;

    /// `eglMakeCurrent` with no surfaces and no context.
    fn release_current(&mut self, display: Self::Display) -> Result<(), EglError>;

    /// `eglQueryContext(EGL_CONTEXT_CLIENT_VERSION)`.
    fn context_client_version(
        &mut self,
        display: Self::Display,
        context: Self::Context,
    ) -> Option<i32>;

    /// `eglGetProcAddress`.
    fn get_proc_address(&mut self, name: &str) -> Option<ProcAddress>;

    /// Calls the resolved `eglHybrisWaylandPostBuffer` entry point and
    /// returns its raw status.
    ///
    /// # Safety
    ///
    /// `entry` must be the address resolved for `eglHybrisWaylandPostBuffer`
    /// by this driver, and `buffer` must be a live native buffer.
    unsafe fn post_buffer(
        &mut self,
        entry: ProcAddress,
        drawable: &Self::Drawable,
        buffer: NativeBuffer,
    ) -> i32;

    /// `eglGetError`. `None` stands for `EGL_SUCCESS`.
    fn last_error(&mut self) -> Option<EglError>;

    fn destroy_surface(
        &mut self,
        display: Self::Display,
        surface: Self::Surface,
    ) -> Result<(), EglError>;

    /// `wl_egl_window_destroy`.
    fn destroy_drawable(&mut self, drawable: Self::Drawable);

    fn destroy_context(
        &mut self,
        display: Self::Display,
        context: Self::Context,
    ) -> Result<(), EglError>;

    /// `eglTerminate`.
    fn terminate(&mut self, display: Self::Display) -> Result<(), EglError>;
}
