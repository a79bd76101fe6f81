// src/egl/extensions.rs

//! Resolution of the driver entry points for buffer import and presentation.

use crate::egl::{EglDriver, ProcAddress};
use crate::error::PresentError;
use log::debug;

pub const CREATE_IMAGE: &str = "eglCreateImageKHR";
pub const IMAGE_TARGET_TEXTURE_2D: &str = "glEGLImageTargetTexture2DOES";
pub const DESTROY_IMAGE: &str = "eglDestroyImageKHR";
pub const POST_BUFFER: &str = "eglHybrisWaylandPostBuffer";

/// Entry points resolved by [`ExtensionTable::resolve`], in lookup order.
pub const REQUIRED_ENTRY_POINTS: [&str; 4] =
    [CREATE_IMAGE, IMAGE_TARGET_TEXTURE_2D, DESTROY_IMAGE, POST_BUFFER];

/// Fully resolved extension entry points. A table only exists when every
/// lookup succeeded.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionTable {
    create_image: ProcAddress,
    image_target_texture_2d: ProcAddress,
    destroy_image: ProcAddress,
    post_buffer: ProcAddress,
}

impl ExtensionTable {
    /// Looks up every required entry point. The first missing one aborts
    /// resolution with `ExtensionMissing`.
    ///
    /// Must run while the context is current, since some drivers only hand
    /// out GL entry points for a current context.
    pub fn resolve<E: EglDriver>(driver: &mut E, verbose: bool) -> Result<Self, PresentError> {
        let mut lookup = |name: &'static str| {
            stage_log!(verbose, "getting {}", name);
            driver
                .get_proc_address(name)
                .ok_or(PresentError::ExtensionMissing(name))
        };

        let table = ExtensionTable {
            create_image: lookup(CREATE_IMAGE)?,
            image_target_texture_2d: lookup(IMAGE_TARGET_TEXTURE_2D)?,
            destroy_image: lookup(DESTROY_IMAGE)?,
            post_buffer: lookup(POST_BUFFER)?,
        };
        debug!("Resolved {} extension entry points", REQUIRED_ENTRY_POINTS.len());
        Ok(table)
    }

    /// `eglCreateImageKHR`.
    pub fn create_image(&self) -> ProcAddress {
        self.create_image
    }

    /// `glEGLImageTargetTexture2DOES`.
    pub fn image_target_texture_2d(&self) -> ProcAddress {
        self.image_target_texture_2d
    }

    /// `eglDestroyImageKHR`.
    pub fn destroy_image(&self) -> ProcAddress {
        self.destroy_image
    }

    /// `eglHybrisWaylandPostBuffer`.
    pub fn post_buffer(&self) -> ProcAddress {
        self.post_buffer
    }

    /// Looks an entry point up by symbol name.
    pub fn entry_point(&self, name: &str) -> Option<ProcAddress> {
        match name {
            CREATE_IMAGE => Some(self.create_image),
            IMAGE_TARGET_TEXTURE_2D => Some(self.image_target_texture_2d),
            DESTROY_IMAGE => Some(self.destroy_image),
            POST_BUFFER => Some(self.post_buffer),
            _ => None,
        }
    }
}
