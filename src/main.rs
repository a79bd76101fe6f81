// In src/main.rs

//! Standalone presenter: opens the full-screen window, brings up EGL and keeps
//! the compositor connection serviced until the window is closed or the
//! process is signalled. Buffers are posted by an in-process producer linked
//! against the library.

use anyhow::Context;
use log::{error, info};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use surface_presenter::config::CONFIG;
use surface_presenter::NativePresenter;

/// How long one event-loop iteration waits for compositor events.
const DISPATCH_TIMEOUT: Duration = Duration::from_millis(100);

static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_termination_signal(_signal: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

fn install_signal_handlers() -> anyhow::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_termination_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for signal in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only stores to an atomic.
        unsafe { sigaction(signal, &action) }
            .with_context(|| format!("Failed to install the {} handler", signal))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting surface-presenter...");
    let config = CONFIG.clone();
    info!(
        "Configuration: GLES client version {}, verbose init {}",
        config.context.client_version, config.diagnostics.verbose
    );

    install_signal_handlers()?;

    let mut presenter = NativePresenter::native(config);
    let dimensions = presenter
        .initialize()
        .context("Failed to initialize the presentation context")?;
    info!(
        "Presenting to a {}x{} window",
        dimensions.width, dimensions.height
    );

    // --- Main Event Loop ---
    let mut result = Ok(());
    while !SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
        match presenter.dispatch_events(DISPATCH_TIMEOUT) {
            Ok(false) => {}
            Ok(true) => {
                info!("Compositor closed the window. Exiting main loop.");
                break;
            }
            Err(e) => {
                error!("Error while dispatching compositor events: {}. Exiting.", e);
                result = Err::<(), _>(e).context("Compositor connection failed");
                break;
            }
        }
    }
    if SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
        info!("Termination signal received.");
    }

    // --- Cleanup ---
    presenter.shutdown();
    info!("surface-presenter exited.");
    result
}
