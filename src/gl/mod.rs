// src/gl/mod.rs

//! Fixed-function GPU state for the presentation surface.
//!
//! Sets up a pixel-space orthographic projection with a top-left origin,
//! enables 2D texturing and the vertex/texcoord client arrays, and allocates
//! one placeholder texture. Nothing is ever drawn through this state by the
//! core itself; buffers reach the screen through the post entry point.

use crate::platform::Dimensions;
use log::{debug, warn};

#[cfg(feature = "native")]
pub mod gles1;
#[cfg(test)]
pub mod mock;

#[cfg(feature = "native")]
pub use gles1::Gles1;

pub type GLenum = u32;
pub type GLuint = u32;
pub type GLint = i32;

pub const NO_ERROR: GLenum = 0;
pub const MODELVIEW: GLenum = 0x1700;
pub const PROJECTION: GLenum = 0x1701;
pub const TEXTURE_2D: GLenum = 0x0DE1;
pub const VERTEX_ARRAY: GLenum = 0x8074;
pub const TEXTURE_COORD_ARRAY: GLenum = 0x8078;
pub const TEXTURE_MAG_FILTER: GLenum = 0x2800;
pub const TEXTURE_MIN_FILTER: GLenum = 0x2801;
pub const TEXTURE_WRAP_S: GLenum = 0x2802;
pub const TEXTURE_WRAP_T: GLenum = 0x2803;
pub const LINEAR: GLint = 0x2601;
pub const CLAMP_TO_EDGE: GLint = 0x812F;

/// The GL calls the surface state needs. Every call requires the context to
/// be current on the calling thread.
pub trait FixedFunction {
    fn viewport(&mut self, x: GLint, y: GLint, width: GLint, height: GLint);
    fn matrix_mode(&mut self, mode: GLenum);
    fn load_identity(&mut self);
    fn ortho(&mut self, ortho: &Ortho);
    fn enable(&mut self, cap: GLenum);
    fn color(&mut self, r: f32, g: f32, b: f32, a: f32);
    fn enable_client_state(&mut self, array: GLenum);
    fn gen_texture(&mut self) -> GLuint;
    fn bind_texture(&mut self, target: GLenum, texture: GLuint);
    fn tex_parameter(&mut self, target: GLenum, pname: GLenum, param: GLint);
    fn delete_texture(&mut self, texture: GLuint);
    fn get_error(&mut self) -> GLenum;
}

/// Orthographic projection volume, as passed to `glOrthof`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ortho {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Ortho {
    /// Pixel-space projection with the origin at the top-left corner and Y
    /// growing downward.
    pub fn top_left_origin(dimensions: Dimensions) -> Self {
        Self {
            left: 0.0,
            right: dimensions.width as f32,
            bottom: dimensions.height as f32,
            top: 0.0,
            near: 0.0,
            far: 1.0,
        }
    }

    /// Maps a point to normalized device coordinates.
    pub fn project(&self, x: f32, y: f32) -> (f32, f32) {
        let ndc_x = 2.0 * (x - self.left) / (self.right - self.left) - 1.0;
        let ndc_y = 2.0 * (y - self.bottom) / (self.top - self.bottom) - 1.0;
        (ndc_x, ndc_y)
    }
}

/// GPU state owned by a configured surface: the placeholder texture.
#[derive(Debug)]
pub struct SurfaceState {
    texture: Option<GLuint>,
    dimensions: Dimensions,
}

impl SurfaceState {
    /// Applies the baseline state for a window of `dimensions`.
    ///
    /// Without `fixed_function` (GLES 2 and later contexts) only the viewport
    /// and the placeholder texture are set up.
    pub fn configure<G: FixedFunction>(
        gl: &mut G,
        dimensions: Dimensions,
        fixed_function: bool,
    ) -> SurfaceState {
        gl.viewport(0, 0, dimensions.width_i32(), dimensions.height_i32());

        if fixed_function {
            gl.matrix_mode(PROJECTION);
            gl.load_identity();
            gl.ortho(&Ortho::top_left_origin(dimensions));

            gl.matrix_mode(MODELVIEW);
            gl.load_identity();

            gl.enable(TEXTURE_2D);
            gl.color(1.0, 1.0, 1.0, 1.0);

            gl.enable_client_state(VERTEX_ARRAY);
            gl.enable_client_state(TEXTURE_COORD_ARRAY);
        }

        let texture = gl.gen_texture();
        gl.bind_texture(TEXTURE_2D, texture);
        gl.tex_parameter(TEXTURE_2D, TEXTURE_MIN_FILTER, LINEAR);
        gl.tex_parameter(TEXTURE_2D, TEXTURE_MAG_FILTER, LINEAR);
        gl.tex_parameter(TEXTURE_2D, TEXTURE_WRAP_S, CLAMP_TO_EDGE);
        gl.tex_parameter(TEXTURE_2D, TEXTURE_WRAP_T, CLAMP_TO_EDGE);

        match gl.get_error() {
            NO_ERROR => {}
            err => warn!("GL error {:#06x} while configuring the surface state", err),
        }
        debug!(
            "Surface state configured for {}x{} (texture {}, fixed function: {})",
            dimensions.width, dimensions.height, texture, fixed_function
        );

        SurfaceState {
            texture: Some(texture),
            dimensions,
        }
    }

    /// Name of the placeholder texture, `None` once released.
    pub fn texture(&self) -> Option<GLuint> {
        self.texture
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Deletes the placeholder texture. Later calls do nothing.
    pub fn release<G: FixedFunction>(&mut self, gl: &mut G) {
        if let Some(texture) = self.texture.take() {
            gl.delete_texture(texture);
            debug!("Placeholder texture {} deleted", texture);
        }
    }
}

impl Drop for SurfaceState {
    fn drop(&mut self) {
        if let Some(texture) = self.texture {
            warn!("SurfaceState dropped with texture {} still allocated", texture);
        }
    }
}
