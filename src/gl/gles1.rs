// src/gl/gles1.rs

//! GLES 1.x entry points from libGLESv1_CM. Linking is set up by `build.rs`.

use crate::gl::{FixedFunction, GLenum, GLint, GLuint, Ortho};
use std::marker::PhantomData;

type GLsizei = i32;
type GLfloat = f32;

extern "C" {
    fn glViewport(x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn glMatrixMode(mode: GLenum);
    fn glLoadIdentity();
    fn glOrthof(
        left: GLfloat,
        right: GLfloat,
        bottom: GLfloat,
        top: GLfloat,
        near: GLfloat,
        far: GLfloat,
    );
    fn glEnable(cap: GLenum);
    fn glColor4f(red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat);
    fn glEnableClientState(array: GLenum);
    fn glGenTextures(n: GLsizei, textures: *mut GLuint);
    fn glBindTexture(target: GLenum, texture: GLuint);
    fn glTexParameteri(target: GLenum, pname: GLenum, param: GLint);
    fn glDeleteTextures(n: GLsizei, textures: *const GLuint);
    fn glGetError() -> GLenum;
}

/// Calls straight into libGLESv1_CM.
///
/// Only valid while a GLES context is current on this thread, which is why
/// the type is not `Send`.
pub struct Gles1 {
    _thread_bound: PhantomData<*const ()>,
}

impl Gles1 {
    pub fn new() -> Self {
        Self {
            _thread_bound: PhantomData,
        }
    }
}

impl Default for Gles1 {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY (all methods): the presenter only calls these between a successful
// eglMakeCurrent and the release of the context, on the owning thread.
impl FixedFunction for Gles1 {
    fn viewport(&mut self, x: GLint, y: GLint, width: GLint, height: GLint) {
        unsafe { glViewport(x, y, width, height) }
    }

    fn matrix_mode(&mut self, mode: GLenum) {
        unsafe { glMatrixMode(mode) }
    }

    fn load_identity(&mut self) {
        unsafe { glLoadIdentity() }
    }

    fn ortho(&mut self, o: &Ortho) {
        unsafe { glOrthof(o.left, o.right, o.bottom, o.top, o.near, o.far) }
    }

    fn enable(&mut self, cap: GLenum) {
        unsafe { glEnable(cap) }
    }

    fn color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { glColor4f(r, g, b, a) }
    }

    fn enable_client_state(&mut self, array: GLenum) {
        unsafe { glEnableClientState(array) }
    }

    fn gen_texture(&mut self) -> GLuint {
        let mut texture = 0;
        unsafe { glGenTextures(1, &mut texture) };
        texture
    }

    fn bind_texture(&mut self, target: GLenum, texture: GLuint) {
        unsafe { glBindTexture(target, texture) }
    }

    fn tex_parameter(&mut self, target: GLenum, pname: GLenum, param: GLint) {
        unsafe { glTexParameteri(target, pname, param) }
    }

    fn delete_texture(&mut self, texture: GLuint) {
        unsafe { glDeleteTextures(1, &texture) }
    }

    fn get_error(&mut self) -> GLenum {
        unsafe { glGetError() }
    }
}
