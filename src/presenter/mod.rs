// src/presenter/mod.rs

//! The presentation context: one full-screen window, its EGL context, the
//! resolved extension entry points and the fixed-function baseline, driven
//! as a unit.
//!
//! Lifecycle: `new` → `initialize` → any number of `present` calls →
//! `shutdown`. A failed `initialize` leaves nothing held, and the context can
//! be initialized again.

use crate::config::Config;
use crate::egl::{EglDriver, ExtensionTable, GraphicsContext};
use crate::error::PresentError;
use crate::gl::{FixedFunction, SurfaceState};
use crate::platform::{Dimensions, NativeBuffer, NativeWindow, WindowSystem};
use log::{debug, error, info, trace, warn};
use std::marker::PhantomData;
use std::time::Duration;

#[cfg(feature = "native")]
use crate::egl::KhronosEgl;
#[cfg(feature = "native")]
use crate::gl::Gles1;
#[cfg(feature = "native")]
use crate::platform::WaylandSession;

/// Presentation context over real Wayland, libEGL and libGLESv1_CM.
#[cfg(feature = "native")]
pub type NativePresenter = PresentationContext<WaylandSession, KhronosEgl, Gles1>;

#[cfg(feature = "native")]
impl NativePresenter {
    pub fn native(config: Config) -> Self {
        PresentationContext::new(WaylandSession::new(), KhronosEgl::new(), Gles1::new(), config)
    }
}

/// Posts externally produced native buffers to a full-screen window.
///
/// The EGL context is current on the thread that ran `initialize`, so the
/// type is neither `Send` nor `Sync`. Only one presentation context per
/// process is supported, and the display connection is never shared.
pub struct PresentationContext<W: WindowSystem, E: EglDriver, G: FixedFunction> {
    windowing: W,
    driver: E,
    gl: G,
    config: Config,
    window: Option<NativeWindow>,
    graphics: Option<GraphicsContext<E>>,
    extensions: Option<ExtensionTable>,
    surface_state: Option<SurfaceState>,
    _thread_bound: PhantomData<*const ()>,
}

impl<W: WindowSystem, E: EglDriver, G: FixedFunction> PresentationContext<W, E, G> {
    /// Creates an uninitialized context. Nothing native is touched yet.
    pub fn new(windowing: W, driver: E, gl: G, config: Config) -> Self {
        Self {
            windowing,
            driver,
            gl,
            config,
            window: None,
            graphics: None,
            extensions: None,
            surface_state: None,
            _thread_bound: PhantomData,
        }
    }

    /// Opens the window, brings up EGL, resolves the extension entry points
    /// and applies the surface state.
    ///
    /// Returns the window dimensions. On failure everything acquired along
    /// the way is released before the error is returned.
    pub fn initialize(&mut self) -> Result<Dimensions, PresentError> {
        if self.is_ready() {
            return Err(PresentError::AlreadyInitialized);
        }

        match self.bring_up() {
            Ok(dimensions) => {
                info!(
                    "Presentation context ready: {}x{}",
                    dimensions.width, dimensions.height
                );
                Ok(dimensions)
            }
            Err(err) => {
                error!("Presentation context initialization failed: {}", err);
                self.shutdown();
                Err(err)
            }
        }
    }

    fn bring_up(&mut self) -> Result<Dimensions, PresentError> {
        let verbose = self.config.diagnostics.verbose;

        stage_log!(verbose, "opening full-screen window");
        let window = self.windowing.open(&self.config.window)?;
        self.window = Some(window);

        let graphics =
            GraphicsContext::initialize(&mut self.driver, &window, &self.config.context, verbose)?;
        self.graphics = Some(graphics);

        self.extensions = Some(ExtensionTable::resolve(&mut self.driver, verbose)?);

        stage_log!(verbose, "setting up surface state");
        let fixed_function = self.config.context.client_version == 1;
        self.surface_state = Some(SurfaceState::configure(
            &mut self.gl,
            window.dimensions,
            fixed_function,
        ));

        Ok(window.dimensions)
    }

    /// Posts one native buffer to the window.
    ///
    /// The buffer is only borrowed for the duration of the call. A failed
    /// post is reported but leaves the context ready for the next frame.
    pub fn present(&mut self, buffer: NativeBuffer) -> Result<(), PresentError> {
        if !self.is_ready() {
            return Err(PresentError::NotReady);
        }
        let (Some(graphics), Some(extensions)) = (self.graphics.as_ref(), self.extensions.as_ref())
        else {
            return Err(PresentError::NotReady);
        };
        let Some(drawable) = graphics.drawable() else {
            return Err(PresentError::NotReady);
        };

        // SAFETY: the entry point was resolved by this driver and the caller
        // vouched for the buffer when constructing the NativeBuffer.
        let status = unsafe {
            self.driver
                .post_buffer(extensions.post_buffer(), drawable, buffer)
        };
        trace!("Posted buffer {:p} (status {})", buffer.as_ptr(), status);

        match self.driver.last_error() {
            None => Ok(()),
            Some(err) => {
                warn!("eglHybrisWaylandPostBuffer failed: {}", err);
                Err(PresentError::PresentationFailed(err))
            }
        }
    }

    /// Pumps compositor events for up to `timeout`. Returns `true` once the
    /// compositor asked the window to close.
    pub fn dispatch_events(&mut self, timeout: Duration) -> Result<bool, PresentError> {
        if self.window.is_none() {
            return Err(PresentError::NotReady);
        }
        self.windowing.dispatch_events(timeout)
    }

    pub fn is_ready(&self) -> bool {
        self.window.is_some()
            && self.graphics.as_ref().is_some_and(GraphicsContext::is_ready)
            && self.extensions.is_some()
            && self.surface_state.is_some()
    }

    /// Window dimensions, `None` unless the context is ready.
    pub fn dimensions(&self) -> Option<Dimensions> {
        if !self.is_ready() {
            return None;
        }
        self.window.map(|window| window.dimensions)
    }

    pub fn width(&self) -> Option<u32> {
        self.dimensions().map(|d| d.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.dimensions().map(|d| d.height)
    }

    /// Resolved buffer-import entry points, for producers that bind buffers
    /// as textures themselves.
    pub fn extensions(&self) -> Option<&ExtensionTable> {
        if !self.is_ready() {
            return None;
        }
        self.extensions.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Releases everything held, newest first: the placeholder texture, the
    /// EGL state, then the window and the compositor connection. Safe to call
    /// any number of times.
    pub fn shutdown(&mut self) {
        let was_ready = self.is_ready();

        if let Some(mut state) = self.surface_state.take() {
            state.release(&mut self.gl);
        }
        if let Some(mut graphics) = self.graphics.take() {
            graphics.release(&mut self.driver);
        }
        self.extensions = None;
        self.window = None;
        self.windowing.close();

        if was_ready {
            info!("Presentation context shut down");
        } else {
            debug!("Presentation context shutdown with nothing ready");
        }
    }

    #[cfg(test)]
    pub(crate) fn windowing(&self) -> &W {
        &self.windowing
    }

    #[cfg(test)]
    pub(crate) fn windowing_mut(&mut self) -> &mut W {
        &mut self.windowing
    }

    #[cfg(test)]
    pub(crate) fn driver(&self) -> &E {
        &self.driver
    }

    #[cfg(test)]
    pub(crate) fn driver_mut(&mut self) -> &mut E {
        &mut self.driver
    }

    #[cfg(test)]
    pub(crate) fn gl(&self) -> &G {
        &self.gl
    }
}

impl<W: WindowSystem, E: EglDriver, G: FixedFunction> Drop for PresentationContext<W, E, G> {
    fn drop(&mut self) {
        if self.window.is_some() || self.graphics.is_some() || self.surface_state.is_some() {
            warn!("PresentationContext dropped without shutdown(). Native resources leak.");
        }
    }
}
