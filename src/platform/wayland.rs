// src/platform/wayland.rs

//! Wayland windowing session.
//!
//! Uses `wayland-client` with the system libwayland backend, so the raw
//! `wl_display*` and `wl_surface*` pointers can be handed to EGL and
//! wayland-egl. The window is a single xdg-shell toplevel that asks the
//! compositor for fullscreen and takes whatever size the first configure
//! reports.

use crate::config::WindowConfig;
use crate::error::PresentError;
use crate::platform::{Dimensions, NativeDisplay, NativeSurface, NativeWindow, WindowSystem};
use log::{debug, info, trace, warn};
use std::ffi::c_void;
use std::os::fd::AsRawFd;
use std::time::Duration;
use wayland_client::backend::WaylandError;
use wayland_client::{
    protocol::{wl_compositor, wl_registry, wl_surface},
    Connection, Dispatch, EventQueue, Proxy, QueueHandle,
};
use wayland_protocols::xdg::shell::client::{xdg_surface, xdg_toplevel, xdg_wm_base};

const COMPOSITOR_MAX_VERSION: u32 = 4;
const WM_BASE_MAX_VERSION: u32 = 2;

// --- Session State ---

struct SessionState {
    compositor: Option<wl_compositor::WlCompositor>,
    wm_base: Option<xdg_wm_base::XdgWmBase>,
    configured: bool,
    width: i32,
    height: i32,
    close_requested: bool,
}

impl SessionState {
    fn new() -> Self {
        Self {
            compositor: None,
            wm_base: None,
            configured: false,
            width: 0,
            height: 0,
            close_requested: false,
        }
    }
}

struct Toplevel {
    surface: wl_surface::WlSurface,
    xdg_surface: xdg_surface::XdgSurface,
    toplevel: xdg_toplevel::XdgToplevel,
}

struct Session {
    conn: Connection,
    queue: EventQueue<SessionState>,
    state: SessionState,
    _registry: wl_registry::WlRegistry,
    window: Option<Toplevel>,
}

impl Session {
    fn connect() -> Result<Self, PresentError> {
        let conn = Connection::connect_to_env().map_err(|e| {
            PresentError::ToolkitInitFailed(format!("failed to connect to the compositor: {}", e))
        })?;
        info!("Connected to the Wayland compositor");

        let mut queue = conn.new_event_queue::<SessionState>();
        let qh = queue.handle();
        let registry = conn.display().get_registry(&qh, ());
        let mut state = SessionState::new();
        queue.roundtrip(&mut state).map_err(|e| {
            PresentError::ToolkitInitFailed(format!("registry roundtrip failed: {}", e))
        })?;

        Ok(Self {
            conn,
            queue,
            state,
            _registry: registry,
            window: None,
        })
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<NativeWindow, PresentError> {
        let qh = self.queue.handle();
        let compositor = self.state.compositor.clone().ok_or_else(|| {
            PresentError::WindowCreateFailed(
                "compositor does not advertise wl_compositor".to_string(),
            )
        })?;
        let wm_base = self.state.wm_base.clone().ok_or_else(|| {
            PresentError::WindowCreateFailed(
                "compositor does not advertise xdg_wm_base".to_string(),
            )
        })?;

        let surface = compositor.create_surface(&qh, ());
        let xdg_surface = wm_base.get_xdg_surface(&surface, &qh, ());
        let toplevel = xdg_surface.get_toplevel(&qh, ());
        toplevel.set_title(config.title.clone());
        toplevel.set_app_id(config.app_id.clone());
        toplevel.set_fullscreen(None);
        surface.commit();

        let surface_ptr = surface.id().as_ptr() as *mut c_void;
        self.window = Some(Toplevel {
            surface,
            xdg_surface,
            toplevel,
        });

        while !self.state.configured {
            self.queue.blocking_dispatch(&mut self.state).map_err(|e| {
                PresentError::WindowCreateFailed(format!(
                    "protocol error while waiting for the first configure: {}",
                    e
                ))
            })?;
            if self.state.close_requested && !self.state.configured {
                return Err(PresentError::WindowCreateFailed(
                    "compositor closed the window before configuring it".to_string(),
                ));
            }
        }

        let dimensions = if self.state.width > 0 && self.state.height > 0 {
            Dimensions::new(self.state.width as u32, self.state.height as u32)
        } else {
            warn!(
                "Compositor left the window size to the client, using {}x{}",
                config.fallback_width, config.fallback_height
            );
            Dimensions::new(config.fallback_width, config.fallback_height)
        };
        info!(
            "Wayland window configured: {}x{}",
            dimensions.width, dimensions.height
        );

        Ok(NativeWindow {
            display: NativeDisplay::new(self.conn.backend().display_ptr() as *mut c_void),
            surface: NativeSurface::new(surface_ptr),
            dimensions,
        })
    }

    fn dispatch(&mut self, timeout: Duration) -> Result<bool, PresentError> {
        let lost = |e: &dyn std::fmt::Display| PresentError::ConnectionLost(e.to_string());

        self.conn.flush().map_err(|e| lost(&e))?;
        self.queue
            .dispatch_pending(&mut self.state)
            .map_err(|e| lost(&e))?;

        if let Some(guard) = self.conn.prepare_read() {
            let mut poll_fd = libc::pollfd {
                fd: guard.connection_fd().as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            };
            let timeout_ms = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
            let ret = unsafe { libc::poll(&mut poll_fd, 1, timeout_ms) };
            if ret < 0 {
                let err = std::io::Error::last_os_error();
                if err.kind() != std::io::ErrorKind::Interrupted {
                    return Err(lost(&err));
                }
            } else if poll_fd.revents & libc::POLLIN != 0 {
                match guard.read() {
                    Ok(count) => trace!("Read {} Wayland events", count),
                    Err(WaylandError::Io(err)) if err.kind() == std::io::ErrorKind::WouldBlock => {}
                    Err(err) => return Err(lost(&err)),
                }
            }
            // A guard that was not read cancels the read on drop.
        }

        self.queue
            .dispatch_pending(&mut self.state)
            .map_err(|e| lost(&e))?;
        Ok(self.state.close_requested)
    }
}

// --- Public Session ---

/// Wayland implementation of [`WindowSystem`].
///
/// Only one window per session is supported.
pub struct WaylandSession {
    session: Option<Session>,
}

impl WaylandSession {
    pub fn new() -> Self {
        Self { session: None }
    }
}

impl Default for WaylandSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowSystem for WaylandSession {
    fn open(&mut self, config: &WindowConfig) -> Result<NativeWindow, PresentError> {
        if self.session.is_some() {
            return Err(PresentError::ToolkitInitFailed(
                "a Wayland session is already open".to_string(),
            ));
        }

        let session = self.session.insert(Session::connect()?);
        session.create_window(config)
    }

    fn dispatch_events(&mut self, timeout: Duration) -> Result<bool, PresentError> {
        match self.session.as_mut() {
            Some(session) => session.dispatch(timeout),
            None => Err(PresentError::ConnectionLost(
                "no Wayland session is open".to_string(),
            )),
        }
    }

    fn close(&mut self) {
        let Some(mut session) = self.session.take() else {
            debug!("Wayland session already closed. Close skipped.");
            return;
        };

        if let Some(window) = session.window.take() {
            window.toplevel.destroy();
            window.xdg_surface.destroy();
            window.surface.destroy();
            info!("Wayland window destroyed");
        }
        if let Some(wm_base) = session.state.wm_base.take() {
            wm_base.destroy();
        }
        if let Err(e) = session.conn.flush() {
            warn!("Failed to flush Wayland requests during close: {}", e);
        }
        info!("Closing Wayland compositor connection");
    }
}

impl Drop for WaylandSession {
    fn drop(&mut self) {
        if self.session.is_some() {
            warn!("WaylandSession dropped without close(). The connection closes with it.");
        }
    }
}

// --- Dispatch ---

impl Dispatch<wl_registry::WlRegistry, ()> for SessionState {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_registry::Event::Global {
            name,
            interface,
            version,
        } = event
        {
            match interface.as_str() {
                "wl_compositor" => {
                    let compositor = registry.bind::<wl_compositor::WlCompositor, _, _>(
                        name,
                        version.min(COMPOSITOR_MAX_VERSION),
                        qh,
                        (),
                    );
                    state.compositor = Some(compositor);
                }
                "xdg_wm_base" => {
                    let wm_base = registry.bind::<xdg_wm_base::XdgWmBase, _, _>(
                        name,
                        version.min(WM_BASE_MAX_VERSION),
                        qh,
                        (),
                    );
                    state.wm_base = Some(wm_base);
                }
                _ => {}
            }
        }
    }
}

wayland_client::delegate_noop!(SessionState: ignore wl_compositor::WlCompositor);
wayland_client::delegate_noop!(SessionState: ignore wl_surface::WlSurface);

impl Dispatch<xdg_wm_base::XdgWmBase, ()> for SessionState {
    fn event(
        _: &mut Self,
        wm_base: &xdg_wm_base::XdgWmBase,
        event: xdg_wm_base::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let xdg_wm_base::Event::Ping { serial } = event {
            wm_base.pong(serial);
        }
    }
}

impl Dispatch<xdg_surface::XdgSurface, ()> for SessionState {
    fn event(
        state: &mut Self,
        xdg_surface: &xdg_surface::XdgSurface,
        event: xdg_surface::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let xdg_surface::Event::Configure { serial } = event {
            xdg_surface.ack_configure(serial);
            state.configured = true;
        }
    }
}

impl Dispatch<xdg_toplevel::XdgToplevel, ()> for SessionState {
    fn event(
        state: &mut Self,
        _: &xdg_toplevel::XdgToplevel,
        event: xdg_toplevel::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            xdg_toplevel::Event::Configure { width, height, .. } => {
                debug!("xdg_toplevel configure: {}x{}", width, height);
                // Window dimensions are fixed after the first configure.
                if !state.configured && width > 0 && height > 0 {
                    state.width = width;
                    state.height = height;
                }
            }
            xdg_toplevel::Event::Close => {
                info!("Compositor requested window close");
                state.close_requested = true;
            }
            _ => {}
        }
    }
}
