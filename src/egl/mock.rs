// src/egl/mock.rs

//! In-memory EGL driver with fault injection and resource accounting.

use crate::egl::{EglDriver, EglError, ProcAddress};
use crate::platform::{NativeBuffer, NativeDisplay, NativeSurface};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Driver call to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    GetDisplay,
    Initialize,
    /// `eglChooseConfig` itself errors.
    ChooseConfig,
    /// `eglChooseConfig` succeeds with zero matches.
    NoMatchingConfig,
    CreateDrawable,
    CreateSurface,
    BindApi,
    CreateContext,
    MakeCurrent,
    MissingEntryPoint(&'static str),
    /// The post entry point returns 0 and leaves `EGL_BAD_SURFACE` pending.
    Present,
}

/// Kinds of handle the mock hands out and expects back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Display,
    Drawable,
    Surface,
    Context,
    Current,
}

/// Drawable handle. Deliberately not `Copy`, like `WlEglSurface`.
#[derive(Debug, PartialEq, Eq)]
pub struct MockDrawable(pub u32);

const DISPLAY_HANDLE: u32 = 1;
const CONFIG_HANDLE: u32 = 2;
const SURFACE_HANDLE: u32 = 3;
const CONTEXT_HANDLE: u32 = 4;
const DRAWABLE_HANDLE: u32 = 5;

pub const DEFAULT_EXTENSIONS: &str =
    "EGL_KHR_image_base EGL_KHR_image_pixmap EGL_WL_bind_wayland_display";

extern "system" fn stub_entry_point() {}

pub struct MockEglDriver {
    faults: Vec<Fault>,
    extensions: Option<String>,
    reported_client_version: Option<i32>,
    acquired: HashMap<Resource, u32>,
    released: HashMap<Resource, u32>,
    release_order: Vec<Resource>,
    pending_error: Option<EglError>,
    current: bool,
    config_attribs: Vec<i32>,
    context_attribs: Vec<i32>,
    bound_api: Option<u32>,
    drawable_size: Option<(i32, i32)>,
    lookups: Vec<String>,
    presented: Vec<usize>,
    release_calls: Rc<Cell<u32>>,
}

impl MockEglDriver {
    pub fn new() -> Self {
        Self {
            faults: Vec::new(),
            extensions: Some(DEFAULT_EXTENSIONS.to_string()),
            reported_client_version: None,
            acquired: HashMap::new(),
            released: HashMap::new(),
            release_order: Vec::new(),
            pending_error: None,
            current: false,
            config_attribs: Vec::new(),
            context_attribs: Vec::new(),
            bound_api: None,
            drawable_size: None,
            lookups: Vec::new(),
            presented: Vec::new(),
            release_calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.push(fault);
        self
    }

    pub fn with_extensions(mut self, extensions: Option<&str>) -> Self {
        self.extensions = extensions.map(str::to_string);
        self
    }

    /// Client version reported by `eglQueryContext`. Defaults to the
    /// requested version.
    pub fn reporting_client_version(mut self, version: i32) -> Self {
        self.reported_client_version = Some(version);
        self
    }

    pub fn inject(&mut self, fault: Fault) {
        self.faults.push(fault);
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    fn fails(&self, fault: Fault) -> bool {
        self.faults.contains(&fault)
    }

    fn acquire(&mut self, resource: Resource) {
        *self.acquired.entry(resource).or_insert(0) += 1;
    }

    fn release(&mut self, resource: Resource) {
        self.release_calls.set(self.release_calls.get() + 1);
        *self.released.entry(resource).or_insert(0) += 1;
        self.release_order.push(resource);
    }

    pub fn acquired(&self, resource: Resource) -> u32 {
        self.acquired.get(&resource).copied().unwrap_or(0)
    }

    pub fn released(&self, resource: Resource) -> u32 {
        self.released.get(&resource).copied().unwrap_or(0)
    }

    /// Resources still held: acquired more often than released.
    pub fn outstanding(&self) -> Vec<Resource> {
        let mut held: Vec<Resource> = self
            .acquired
            .keys()
            .copied()
            .filter(|r| self.acquired(*r) > self.released(*r))
            .collect();
        held.sort_by_key(|r| *r as u8);
        held
    }

    /// Panics unless every acquired resource was released exactly once.
    pub fn assert_balanced(&self) {
        for resource in [
            Resource::Display,
            Resource::Drawable,
            Resource::Surface,
            Resource::Context,
            Resource::Current,
        ] {
            assert_eq!(
                self.acquired(resource),
                self.released(resource),
                "{:?} acquired {} times but released {} times (release order {:?})",
                resource,
                self.acquired(resource),
                self.released(resource),
                self.release_order
            );
        }
    }

    /// Shared count of every release call. Stays readable after the mock is
    /// dropped.
    pub fn release_counter(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.release_calls)
    }

    pub fn release_order(&self) -> &[Resource] {
        &self.release_order
    }

    pub fn is_current(&self) -> bool {
        self.current
    }

    pub fn config_attribs(&self) -> &[i32] {
        &self.config_attribs
    }

    pub fn context_attribs(&self) -> &[i32] {
        &self.context_attribs
    }

    pub fn bound_api(&self) -> Option<u32> {
        self.bound_api
    }

    pub fn drawable_size(&self) -> Option<(i32, i32)> {
        self.drawable_size
    }

    pub fn lookups(&self) -> &[String] {
        &self.lookups
    }

    /// Buffer addresses passed to the post entry point, in order.
    pub fn presented(&self) -> &[usize] {
        &self.presented
    }
}

impl Default for MockEglDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl EglDriver for MockEglDriver {
    type Display = u32;
    type Config = u32;
    type Drawable = MockDrawable;
    type Surface = u32;
    type Context = u32;

    fn get_display(&mut self, native: NativeDisplay) -> Option<u32> {
        if self.fails(Fault::GetDisplay) || native.as_ptr().is_null() {
            return None;
        }
        Some(DISPLAY_HANDLE)
    }

    fn initialize(&mut self, display: u32) -> Result<(i32, i32), EglError> {
        assert_eq!(display, DISPLAY_HANDLE);
        if self.fails(Fault::Initialize) {
            return Err(EglError::NOT_INITIALIZED);
        }
        self.acquire(Resource::Display);
        Ok((1, 4))
    }

    fn query_extensions(&mut self, _display: u32) -> Option<String> {
        self.extensions.clone()
    }

    fn choose_config(&mut self, _display: u32, attribs: &[i32]) -> Result<Option<u32>, EglError> {
        self.config_attribs = attribs.to_vec();
        if self.fails(Fault::ChooseConfig) {
            return Err(EglError::BAD_ATTRIBUTE);
        }
        if self.fails(Fault::NoMatchingConfig) {
            return Ok(None);
        }
        Ok(Some(CONFIG_HANDLE))
    }

    fn create_drawable(
        &mut self,
        surface: NativeSurface,
        width: i32,
        height: i32,
    ) -> Result<MockDrawable, String> {
        if self.fails(Fault::CreateDrawable) || surface.as_ptr().is_null() {
            return Err("wl_egl_window_create returned NULL".to_string());
        }
        self.drawable_size = Some((width, height));
        self.acquire(Resource::Drawable);
        Ok(MockDrawable(DRAWABLE_HANDLE))
    }

    fn create_window_surface(
        &mut self,
        _display: u32,
        config: u32,
        drawable: &MockDrawable,
    ) -> Result<u32, EglError> {
        assert_eq!(config, CONFIG_HANDLE);
        assert_eq!(drawable, &MockDrawable(DRAWABLE_HANDLE));
        if self.fails(Fault::CreateSurface) {
            return Err(EglError::BAD_NATIVE_WINDOW);
        }
        self.acquire(Resource::Surface);
        Ok(SURFACE_HANDLE)
    }

    fn bind_api(&mut self, api: u32) -> Result<(), EglError> {
        if self.fails(Fault::BindApi) {
            return Err(EglError::BAD_PARAMETER);
        }
        self.bound_api = Some(api);
        Ok(())
    }

    fn create_context(
        &mut self,
        _display: u32,
        _config: u32,
        attribs: &[i32],
    ) -> Result<u32, EglError> {
        self.context_attribs = attribs.to_vec();
        if self.fails(Fault::CreateContext) {
            return Err(EglError::BAD_MATCH);
        }
        self.acquire(Resource::Context);
        Ok(CONTEXT_HANDLE)
    }

    fn make_current(
        &mut self,
        _display: u32,
        surface: u32,
        context: u32,
    ) -> Result<(), EglError> {
        assert_eq!(surface, SURFACE_HANDLE);
        assert_eq!(context, CONTEXT_HANDLE);
        if self.fails(Fault::MakeCurrent) {
            return Err(EglError::BAD_ACCESS);
        }
        self.current = true;
        self.acquire(Resource::Current);
        Ok(())
    }

    fn release_current(&mut self, _display: u32) -> Result<(), EglError> {
        self.current = false;
        self.release(Resource::Current);
        Ok(())
    }

    fn context_client_version(&mut self, _display: u32, _context: u32) -> Option<i32> {
        // CONTEXT_CLIENT_VERSION value sits at index 1 of the attribute list.
        self.reported_client_version
            .or_else(|| self.context_attribs.get(1).copied())
    }

    fn get_proc_address(&mut self, name: &str) -> Option<ProcAddress> {
        self.lookups.push(name.to_string());
        if self.fails(Fault::MissingEntryPoint(name_of(name))) {
            return None;
        }
        Some(stub_entry_point as ProcAddress)
    }

    unsafe fn post_buffer(
        &mut self,
        _entry: ProcAddress,
        drawable: &MockDrawable,
        buffer: NativeBuffer,
    ) -> i32 {
        assert_eq!(drawable, &MockDrawable(DRAWABLE_HANDLE));
        assert!(self.current, "posted without a current context");
        if self.fails(Fault::Present) {
            self.pending_error = Some(EglError::BAD_SURFACE);
            return 0;
        }
        self.presented.push(buffer.as_ptr() as usize);
        1
    }

    fn last_error(&mut self) -> Option<EglError> {
        self.pending_error.take()
    }

    fn destroy_surface(&mut self, _display: u32, surface: u32) -> Result<(), EglError> {
        assert_eq!(surface, SURFACE_HANDLE);
        self.release(Resource::Surface);
        Ok(())
    }

    fn destroy_drawable(&mut self, drawable: MockDrawable) {
        assert_eq!(drawable, MockDrawable(DRAWABLE_HANDLE));
        self.release(Resource::Drawable);
    }

    fn destroy_context(&mut self, _display: u32, context: u32) -> Result<(), EglError> {
        assert_eq!(context, CONTEXT_HANDLE);
        self.release(Resource::Context);
        Ok(())
    }

    fn terminate(&mut self, display: u32) -> Result<(), EglError> {
        assert_eq!(display, DISPLAY_HANDLE);
        self.release(Resource::Display);
        Ok(())
    }
}

/// Maps a looked-up name onto the static name a `MissingEntryPoint` fault
/// carries.
fn name_of(name: &str) -> &'static str {
    crate::egl::extensions::REQUIRED_ENTRY_POINTS
        .iter()
        .copied()
        .find(|known| *known == name)
        .unwrap_or("")
}
