// src/egl/khronos.rs

//! Native [`EglDriver`] backed by libEGL (`khronos-egl`, statically linked)
//! and libwayland-egl (`wayland-egl`).

use crate::egl::{EglDriver, EglError, ProcAddress};
use crate::platform::{NativeBuffer, NativeDisplay, NativeSurface};
use khronos_egl as egl;
use log::{debug, trace};
use std::ffi::c_void;
use std::marker::PhantomData;
use wayland_egl::WlEglSurface;
use wayland_sys::client::wl_proxy;

/// `int eglHybrisWaylandPostBuffer(EGLNativeWindowType win, void *buffer)`.
type PostBufferFn = unsafe extern "C" fn(*mut c_void, *mut c_void) -> libc::c_int;

fn egl_error(err: egl::Error) -> EglError {
    EglError(err.native())
}

/// libEGL driver for Wayland window surfaces.
///
/// EGL keeps the current context per thread, so this type is neither `Send`
/// nor `Sync`.
pub struct KhronosEgl {
    egl: egl::Instance<egl::Static>,
    _thread_bound: PhantomData<*const ()>,
}

impl KhronosEgl {
    pub fn new() -> Self {
        Self {
            egl: egl::Instance::new(egl::Static),
            _thread_bound: PhantomData,
        }
    }
}

impl Default for KhronosEgl {
    fn default() -> Self {
        Self::new()
    }
}

impl EglDriver for KhronosEgl {
    type Display = egl::Display;
    type Config = egl::Config;
    type Drawable = WlEglSurface;
    type Surface = egl::Surface;
    type Context = egl::Context;

    fn get_display(&mut self, native: NativeDisplay) -> Option<egl::Display> {
        // SAFETY: the pointer comes from a live wl_display owned by the
        // windowing session, which outlives the EGL display.
        unsafe { self.egl.get_display(native.as_ptr() as egl::NativeDisplayType) }
    }

    fn initialize(&mut self, display: egl::Display) -> Result<(i32, i32), EglError> {
        self.egl.initialize(display).map_err(egl_error)
    }

    fn query_extensions(&mut self, display: egl::Display) -> Option<String> {
        self.egl
            .query_string(Some(display), egl::EXTENSIONS)
            .ok()
            .map(|s| s.to_string_lossy().into_owned())
    }

    fn choose_config(
        &mut self,
        display: egl::Display,
        attribs: &[i32],
    ) -> Result<Option<egl::Config>, EglError> {
        self.egl
            .choose_first_config(display, attribs)
            .map_err(egl_error)
    }

    fn create_drawable(
        &mut self,
        surface: NativeSurface,
        width: i32,
        height: i32,
    ) -> Result<WlEglSurface, String> {
        // SAFETY: the pointer is the wl_surface proxy of the session's
        // toplevel, which is destroyed only after this drawable.
        let drawable = unsafe {
            WlEglSurface::new_from_raw(surface.as_ptr() as *mut wl_proxy, width, height)
        }
        .map_err(|e| format!("{:?}", e))?;
        debug!("wl_egl_window created: {}x{}", width, height);
        Ok(drawable)
    }

    fn create_window_surface(
        &mut self,
        display: egl::Display,
        config: egl::Config,
        drawable: &WlEglSurface,
    ) -> Result<egl::Surface, EglError> {
        // SAFETY: the drawable is a live wl_egl_window held by the caller.
        unsafe {
            self.egl.create_window_surface(
                display,
                config,
                drawable.ptr() as egl::NativeWindowType,
                None,
            )
        }
        .map_err(egl_error)
    }

    fn bind_api(&mut self, api: u32) -> Result<(), EglError> {
        self.egl.bind_api(api).map_err(egl_error)
    }

    fn create_context(
        &mut self,
        display: egl::Display,
        config: egl::Config,
        attribs: &[i32],
    ) -> Result<egl::Context, EglError> {
        self.egl
            .create_context(display, config, None, attribs)
            .map_err(egl_error)
    }

    fn make_current(
        &mut self,
        display: egl::Display,
        surface: egl::Surface,
        context: egl::Context,
    ) -> Result<(), EglError> {
        self.egl
            .make_current(display, Some(surface), Some(surface), Some(context))
            .map_err(egl_error)
    }

    fn release_current(&mut self, display: egl::Display) -> Result<(), EglError> {
        self.egl
            .make_current(display, None, None, None)
            .map_err(egl_error)
    }

    fn context_client_version(
        &mut self,
        display: egl::Display,
        context: egl::Context,
    ) -> Option<i32> {
        self.egl
            .query_context(display, context, egl::CONTEXT_CLIENT_VERSION)
            .ok()
    }

    fn get_proc_address(&mut self, name: &str) -> Option<ProcAddress> {
        self.egl.get_proc_address(name)
    }

    unsafe fn post_buffer(
        &mut self,
        entry: ProcAddress,
        drawable: &WlEglSurface,
        buffer: NativeBuffer,
    ) -> i32 {
        let post: PostBufferFn = std::mem::transmute(entry);
        let status = post(drawable.ptr() as *mut c_void, buffer.as_ptr());
        trace!("eglHybrisWaylandPostBuffer({:p}) -> {}", buffer.as_ptr(), status);
        status
    }

    fn last_error(&mut self) -> Option<EglError> {
        self.egl.get_error().map(egl_error)
    }

    fn destroy_surface(
        &mut self,
        display: egl::Display,
        surface: egl::Surface,
    ) -> Result<(), EglError> {
        self.egl.destroy_surface(display, surface).map_err(egl_error)
    }

    fn destroy_drawable(&mut self, drawable: WlEglSurface) {
        // WlEglSurface calls wl_egl_window_destroy on drop.
        drop(drawable);
        debug!("wl_egl_window destroyed");
    }

    fn destroy_context(
        &mut self,
        display: egl::Display,
        context: egl::Context,
    ) -> Result<(), EglError> {
        self.egl.destroy_context(display, context).map_err(egl_error)
    }

    fn terminate(&mut self, display: egl::Display) -> Result<(), EglError> {
        self.egl.terminate(display).map_err(egl_error)
    }
}
