// src/platform/mock.rs

use crate::config::WindowConfig;
use crate::error::PresentError;
use crate::platform::{Dimensions, NativeDisplay, NativeSurface, NativeWindow, WindowSystem};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Fake display and surface addresses handed to the graphics layer.
pub const MOCK_DISPLAY_ADDR: usize = 0xd15a_0000;
pub const MOCK_SURFACE_ADDR: usize = 0x5afa_0000;

/// In-memory window system that reports a fixed compositor size.
pub struct MockWindowSystem {
    dimensions: Dimensions,
    fail_toolkit: bool,
    fail_window: bool,
    close_requested: bool,
    toolkit_open: bool,
    window_open: bool,
    toolkit_inits: u32,
    toolkit_releases: u32,
    window_creates: u32,
    window_releases: u32,
    last_title: Option<String>,
    close_calls: Rc<Cell<u32>>,
}

impl MockWindowSystem {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: Dimensions::new(width, height),
            fail_toolkit: false,
            fail_window: false,
            close_requested: false,
            toolkit_open: false,
            window_open: false,
            toolkit_inits: 0,
            toolkit_releases: 0,
            window_creates: 0,
            window_releases: 0,
            last_title: None,
            close_calls: Rc::new(Cell::new(0)),
        }
    }

    /// Makes the next `open` fail while connecting to the compositor.
    pub fn fail_toolkit_init(mut self) -> Self {
        self.fail_toolkit = true;
        self
    }

    /// Makes the next `open` fail when the compositor is asked for a window.
    pub fn refuse_window(mut self) -> Self {
        self.fail_window = true;
        self
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn is_toolkit_open(&self) -> bool {
        self.toolkit_open
    }

    pub fn is_window_open(&self) -> bool {
        self.window_open
    }

    pub fn toolkit_inits(&self) -> u32 {
        self.toolkit_inits
    }

    pub fn toolkit_releases(&self) -> u32 {
        self.toolkit_releases
    }

    pub fn window_creates(&self) -> u32 {
        self.window_creates
    }

    pub fn window_releases(&self) -> u32 {
        self.window_releases
    }

    pub fn last_title(&self) -> Option<&str> {
        self.last_title.as_deref()
    }

    /// Shared count of `close` calls. Stays readable after the mock is
    /// dropped.
    pub fn close_counter(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.close_calls)
    }
}

impl WindowSystem for MockWindowSystem {
    fn open(&mut self, config: &WindowConfig) -> Result<NativeWindow, PresentError> {
        if self.fail_toolkit {
            return Err(PresentError::ToolkitInitFailed(
                "mock compositor unavailable".to_string(),
            ));
        }
        self.toolkit_open = true;
        self.toolkit_inits += 1;

        if self.fail_window {
            return Err(PresentError::WindowCreateFailed(
                "mock compositor refused the toplevel".to_string(),
            ));
        }
        self.window_open = true;
        self.window_creates += 1;
        self.last_title = Some(config.title.clone());

        Ok(NativeWindow {
            display: NativeDisplay::new(MOCK_DISPLAY_ADDR as *mut _),
            surface: NativeSurface::new(MOCK_SURFACE_ADDR as *mut _),
            dimensions: self.dimensions,
        })
    }

    fn dispatch_events(&mut self, _timeout: Duration) -> Result<bool, PresentError> {
        if !self.toolkit_open {
            return Err(PresentError::ConnectionLost("no session".to_string()));
        }
        Ok(self.close_requested)
    }

    fn close(&mut self) {
        self.close_calls.set(self.close_calls.get() + 1);
        if self.window_open {
            self.window_open = false;
            self.window_releases += 1;
        }
        if self.toolkit_open {
            self.toolkit_open = false;
            self.toolkit_releases += 1;
        }
    }
}
