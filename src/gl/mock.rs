// src/gl/mock.rs

use crate::gl::{FixedFunction, GLenum, GLint, GLuint, Ortho, NO_ERROR};
use std::cell::Cell;
use std::rc::Rc;

/// One recorded GL call.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    Viewport(GLint, GLint, GLint, GLint),
    MatrixMode(GLenum),
    LoadIdentity,
    Ortho(Ortho),
    Enable(GLenum),
    Color(f32, f32, f32, f32),
    EnableClientState(GLenum),
    GenTexture(GLuint),
    BindTexture(GLenum, GLuint),
    TexParameter(GLenum, GLenum, GLint),
    DeleteTexture(GLuint),
}

/// Records every call instead of touching a GPU.
#[derive(Debug, Default)]
pub struct RecordingGl {
    calls: Vec<GlCall>,
    next_texture: GLuint,
    pending_error: Option<GLenum>,
    deletions: Rc<Cell<u32>>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaves `error` pending for the next `get_error`.
    pub fn with_pending_error(mut self, error: GLenum) -> Self {
        self.pending_error = Some(error);
        self
    }

    /// Shared count of texture deletions. Stays readable after the mock is
    /// dropped.
    pub fn deletion_counter(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.deletions)
    }

    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    pub fn deleted_textures(&self) -> Vec<GLuint> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                GlCall::DeleteTexture(texture) => Some(*texture),
                _ => None,
            })
            .collect()
    }

    pub fn generated_textures(&self) -> Vec<GLuint> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                GlCall::GenTexture(texture) => Some(*texture),
                _ => None,
            })
            .collect()
    }
}

impl FixedFunction for RecordingGl {
    fn viewport(&mut self, x: GLint, y: GLint, width: GLint, height: GLint) {
        self.calls.push(GlCall::Viewport(x, y, width, height));
    }

    fn matrix_mode(&mut self, mode: GLenum) {
        self.calls.push(GlCall::MatrixMode(mode));
    }

    fn load_identity(&mut self) {
        self.calls.push(GlCall::LoadIdentity);
    }

    fn ortho(&mut self, ortho: &Ortho) {
        self.calls.push(GlCall::Ortho(*ortho));
    }

    fn enable(&mut self, cap: GLenum) {
        self.calls.push(GlCall::Enable(cap));
    }

    fn color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.calls.push(GlCall::Color(r, g, b, a));
    }

    fn enable_client_state(&mut self, array: GLenum) {
        self.calls.push(GlCall::EnableClientState(array));
    }

    fn gen_texture(&mut self) -> GLuint {
        self.next_texture += 1;
        self.calls.push(GlCall::GenTexture(self.next_texture));
        self.next_texture
    }

    fn bind_texture(&mut self, target: GLenum, texture: GLuint) {
        self.calls.push(GlCall::BindTexture(target, texture));
    }

    fn tex_parameter(&mut self, target: GLenum, pname: GLenum, param: GLint) {
        self.calls.push(GlCall::TexParameter(target, pname, param));
    }

    fn delete_texture(&mut self, texture: GLuint) {
        self.deletions.set(self.deletions.get() + 1);
        self.calls.push(GlCall::DeleteTexture(texture));
    }

    fn get_error(&mut self) -> GLenum {
        self.pending_error.take().unwrap_or(NO_ERROR)
    }
}
