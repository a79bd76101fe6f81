// src/error.rs

//! Error taxonomy for presentation context setup and use.
//!
//! Every failure path of initialization has its own variant, so callers can
//! tell exactly which native call refused to cooperate.

use crate::egl::EglError;
use thiserror::Error;

/// Errors reported by the presentation core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentError {
    #[error("failed to initialize the windowing toolkit: {0}")]
    ToolkitInitFailed(String),

    #[error("failed to create the presentation window: {0}")]
    WindowCreateFailed(String),

    #[error("failed to acquire an EGL display for the native display")]
    DisplayAcquireFailed,

    #[error("failed to initialize the EGL display ({0})")]
    DisplayInitFailed(EglError),

    #[error("unable to find an EGL config")]
    ConfigSelectFailed,

    #[error("failed to create the wl_egl_window drawable: {0}")]
    DrawableCreateFailed(String),

    #[error("unable to create an EGL window surface ({0})")]
    SurfaceCreateFailed(EglError),

    #[error("unable to create a GLES context ({0})")]
    ContextCreateFailed(EglError),

    #[error("unable to make the GLES context current ({0})")]
    ContextActivateFailed(EglError),

    #[error("required entry point {0} not found")]
    ExtensionMissing(&'static str),

    #[error("buffer presentation failed ({0})")]
    PresentationFailed(EglError),

    #[error("presentation context is not initialized")]
    NotReady,

    #[error("presentation context is already initialized")]
    AlreadyInitialized,

    #[error("lost the compositor connection: {0}")]
    ConnectionLost(String),
}

/// The initialization step a failed `initialize` stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailedStage {
    ToolkitInit,
    WindowCreate,
    DisplayAcquire,
    DisplayInit,
    ConfigSelect,
    DrawableCreate,
    SurfaceCreate,
    ContextCreate,
    ContextActivate,
    ExtensionResolve,
}

impl PresentError {
    /// Maps an initialization error to the stage that failed.
    ///
    /// Steady-state errors (`PresentationFailed`, `NotReady`, ...) have no stage.
    pub fn failed_stage(&self) -> Option<FailedStage> {
        match self {
            PresentError::ToolkitInitFailed(_) => Some(FailedStage::ToolkitInit),
            PresentError::WindowCreateFailed(_) => Some(FailedStage::WindowCreate),
            PresentError::DisplayAcquireFailed => Some(FailedStage::DisplayAcquire),
            PresentError::DisplayInitFailed(_) => Some(FailedStage::DisplayInit),
            PresentError::ConfigSelectFailed => Some(FailedStage::ConfigSelect),
            PresentError::DrawableCreateFailed(_) => Some(FailedStage::DrawableCreate),
            PresentError::SurfaceCreateFailed(_) => Some(FailedStage::SurfaceCreate),
            PresentError::ContextCreateFailed(_) => Some(FailedStage::ContextCreate),
            PresentError::ContextActivateFailed(_) => Some(FailedStage::ContextActivate),
            PresentError::ExtensionMissing(_) => Some(FailedStage::ExtensionResolve),
            PresentError::PresentationFailed(_)
            | PresentError::NotReady
            | PresentError::AlreadyInitialized
            | PresentError::ConnectionLost(_) => None,
        }
    }
}
