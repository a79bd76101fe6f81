// src/egl/context.rs

//! Graphics context manager.
//!
//! Brings up EGL on top of an open native window as an explicit sequence of
//! stages. Each stage stores the handle it acquired in its own slot. On
//! failure, `release` walks the slots in reverse, so only handles that exist
//! are released, and each of them exactly once.

use crate::config::ContextConfig;
use crate::egl::{attrib, EglDriver};
use crate::error::PresentError;
use crate::platform::NativeWindow;
use log::{debug, info, warn};

/// Extension the buffer-import entry points belong to.
const IMAGE_BASE_EXTENSION: &str = "EGL_KHR_image_base";

/// Progress of context bring-up. Later variants imply all earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Start,
    DisplayAcquired,
    DisplayInitialized,
    ConfigSelected,
    DrawableCreated,
    SurfaceCreated,
    ContextCreated,
    /// The context is current on the calling thread. This is the ready state.
    ContextCurrent,
}

impl ContextConfig {
    /// `EGL_RENDERABLE_TYPE` bit matching the requested client version.
    pub fn renderable_bit(&self) -> i32 {
        match self.client_version {
            2 => attrib::OPENGL_ES2_BIT,
            3 => attrib::OPENGL_ES3_BIT,
            _ => attrib::OPENGL_ES_BIT,
        }
    }

    /// Attribute list for `eglChooseConfig`.
    pub fn config_attribs(&self) -> [i32; 5] {
        [
            attrib::SURFACE_TYPE,
            attrib::WINDOW_BIT,
            attrib::RENDERABLE_TYPE,
            self.renderable_bit(),
            attrib::NONE,
        ]
    }

    /// Attribute list for `eglCreateContext`.
    pub fn context_attribs(&self) -> [i32; 3] {
        [
            attrib::CONTEXT_CLIENT_VERSION,
            self.client_version,
            attrib::NONE,
        ]
    }
}

/// EGL display, config, drawable, surface and context for one window.
///
/// The context is bound to the thread that created it. Only one
/// `GraphicsContext` per native display is supported.
pub struct GraphicsContext<E: EglDriver> {
    stage: Stage,
    display: Option<E::Display>,
    initialized: bool,
    version: (i32, i32),
    config: Option<E::Config>,
    drawable: Option<E::Drawable>,
    surface: Option<E::Surface>,
    context: Option<E::Context>,
    current: bool,
}

impl<E: EglDriver> GraphicsContext<E> {
    fn empty() -> Self {
        Self {
            stage: Stage::Start,
            display: None,
            initialized: false,
            version: (0, 0),
            config: None,
            drawable: None,
            surface: None,
            context: None,
            current: false,
        }
    }

    /// Runs every stage up to `ContextCurrent`.
    ///
    /// On failure, everything acquired so far is released before the error is
    /// returned, so no context is left current.
    pub fn initialize(
        driver: &mut E,
        window: &NativeWindow,
        config: &ContextConfig,
        verbose: bool,
    ) -> Result<Self, PresentError> {
        let mut ctx = Self::empty();
        match ctx.advance(driver, window, config, verbose) {
            Ok(()) => {
                info!(
                    "EGL {}.{} context current on a {}x{} window surface",
                    ctx.version.0,
                    ctx.version.1,
                    window.dimensions.width,
                    window.dimensions.height
                );
                Ok(ctx)
            }
            Err(err) => {
                warn!(
                    "EGL bring-up failed after reaching {:?}: {}",
                    ctx.stage, err
                );
                ctx.release(driver);
                Err(err)
            }
        }
    }

    fn advance(
        &mut self,
        driver: &mut E,
        window: &NativeWindow,
        config: &ContextConfig,
        verbose: bool,
    ) -> Result<(), PresentError> {
        stage_log!(verbose, "getting egl display");
        let display = driver
            .get_display(window.display)
            .ok_or(PresentError::DisplayAcquireFailed)?;
        self.display = Some(display);
        self.stage = Stage::DisplayAcquired;

        stage_log!(verbose, "initializing egl display");
        self.version = driver
            .initialize(display)
            .map_err(PresentError::DisplayInitFailed)?;
        self.initialized = true;
        self.stage = Stage::DisplayInitialized;
        self.check_advertised_extensions(driver, display);

        stage_log!(verbose, "choosing egl config");
        let egl_config = match driver.choose_config(display, &config.config_attribs()) {
            Ok(Some(egl_config)) => egl_config,
            Ok(None) => {
                warn!(
                    "No EGL config matches window surfaces with renderable type {:#x}",
                    config.renderable_bit()
                );
                return Err(PresentError::ConfigSelectFailed);
            }
            Err(err) => {
                warn!("eglChooseConfig failed: {}", err);
                return Err(PresentError::ConfigSelectFailed);
            }
        };
        self.config = Some(egl_config);
        self.stage = Stage::ConfigSelected;

        stage_log!(verbose, "creating wl egl window");
        let (width, height) = (window.dimensions.width_i32(), window.dimensions.height_i32());
        let drawable = driver
            .create_drawable(window.surface, width, height)
            .map_err(PresentError::DrawableCreateFailed)?;
        let drawable = self.drawable.insert(drawable);
        self.stage = Stage::DrawableCreated;

        stage_log!(verbose, "creating egl window surface");
        let surface = driver
            .create_window_surface(display, egl_config, drawable)
            .map_err(PresentError::SurfaceCreateFailed)?;
        self.surface = Some(surface);
        self.stage = Stage::SurfaceCreated;

        stage_log!(verbose, "creating GLES context");
        driver
            .bind_api(attrib::OPENGL_ES_API)
            .map_err(PresentError::ContextCreateFailed)?;
        let context = driver
            .create_context(display, egl_config, &config.context_attribs())
            .map_err(PresentError::ContextCreateFailed)?;
        self.context = Some(context);
        self.stage = Stage::ContextCreated;

        stage_log!(verbose, "making GLES context current");
        driver
            .make_current(display, surface, context)
            .map_err(PresentError::ContextActivateFailed)?;
        self.current = true;
        self.stage = Stage::ContextCurrent;

        match driver.context_client_version(display, context) {
            Some(actual) if actual != config.client_version => warn!(
                "Requested a GLES {} context but the driver reports client version {}",
                config.client_version, actual
            ),
            Some(actual) => debug!("GLES context client version {}", actual),
            None => debug!("Driver did not report the context client version"),
        }
        Ok(())
    }

    fn check_advertised_extensions(&self, driver: &mut E, display: E::Display) {
        match driver.query_extensions(display) {
            Some(extensions) => {
                debug!("EGL extensions: {}", extensions);
                if !extensions.split_whitespace().any(|ext| ext == IMAGE_BASE_EXTENSION) {
                    warn!(
                        "{} is not advertised. Buffer import entry points may be unusable.",
                        IMAGE_BASE_EXTENSION
                    );
                }
            }
            None => debug!("EGL_EXTENSIONS query returned nothing"),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_ready(&self) -> bool {
        self.stage == Stage::ContextCurrent && self.current
    }

    /// Negotiated EGL `(major, minor)` version, `(0, 0)` before initialization.
    pub fn version(&self) -> (i32, i32) {
        self.version
    }

    pub fn drawable(&self) -> Option<&E::Drawable> {
        self.drawable.as_ref()
    }

    /// Releases the held handles in reverse acquisition order: currency,
    /// surface, drawable, context, display. Releasing an already released
    /// context does nothing.
    pub fn release(&mut self, driver: &mut E) {
        let Some(display) = self.display else {
            self.stage = Stage::Start;
            return;
        };

        if std::mem::take(&mut self.current) {
            if let Err(err) = driver.release_current(display) {
                warn!("Failed to release the current EGL context: {}", err);
            }
        }
        if let Some(surface) = self.surface.take() {
            if let Err(err) = driver.destroy_surface(display, surface) {
                warn!("Failed to destroy the EGL window surface: {}", err);
            }
        }
        if let Some(drawable) = self.drawable.take() {
            driver.destroy_drawable(drawable);
        }
        if let Some(context) = self.context.take() {
            if let Err(err) = driver.destroy_context(display, context) {
                warn!("Failed to destroy the EGL context: {}", err);
            }
        }
        self.config = None;
        if std::mem::take(&mut self.initialized) {
            if let Err(err) = driver.terminate(display) {
                warn!("Failed to terminate the EGL display: {}", err);
            }
        }
        self.display = None;
        self.stage = Stage::Start;
        debug!("EGL handles released");
    }
}

impl<E: EglDriver> Drop for GraphicsContext<E> {
    fn drop(&mut self) {
        if self.display.is_some() {
            warn!(
                "GraphicsContext dropped at stage {:?} without release(). EGL handles leak.",
                self.stage
            );
        }
    }
}
