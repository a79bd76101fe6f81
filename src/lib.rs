// src/lib.rs

//! Hardware-accelerated presentation of externally produced native buffers
//! on a Wayland surface.
//!
//! The crate chains the Wayland windowing session, the EGL context, the
//! libhybris buffer-post extension and a minimal GLES 1 state baseline into a
//! single [`PresentationContext`](presenter::PresentationContext). A producer
//! elsewhere in the process fills `ANativeWindowBuffer`s and hands them to
//! [`present`](presenter::PresentationContext::present), one per frame.
//!
//! Module map:
//! - `platform`: windowing session (Wayland connection, full-screen toplevel)
//! - `egl`: graphics context state machine and extension resolution
//! - `gl`: fixed-function surface state and the placeholder texture
//! - `presenter`: the presentation context tying it all together

/// Logs an initialization stage. Stages are logged at `info` when verbose
/// diagnostics are enabled and at `debug` otherwise.
#[macro_export]
macro_rules! stage_log {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            log::info!($($arg)+);
        } else {
            log::debug!($($arg)+);
        }
    };
}

pub mod config;
pub mod egl;
pub mod error;
pub mod gl;
pub mod platform;
pub mod presenter;

pub use config::Config;
pub use error::PresentError;
pub use platform::{Dimensions, NativeBuffer};
pub use presenter::PresentationContext;

#[cfg(feature = "native")]
pub use presenter::NativePresenter;
