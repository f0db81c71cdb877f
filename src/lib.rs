//! Watch for the termination-requesting signals (`SIGHUP`, `SIGINT`,
//! `SIGQUIT`, `SIGTERM`) and record whether one has arrived.
//!
//! ```no_run
//! termwatch::install()?;
//! while !termwatch::report() {
//!     // do a unit of work
//! }
//! # Ok::<(), termwatch::RegistrationError>(())
//! ```

pub mod cli;
pub mod error;
pub mod monitor;
pub mod report;
pub mod signals;

pub use error::RegistrationError;
pub use monitor::{Monitor, MonitorState};
pub use report::Report;
pub use signals::TerminationSignal;

/// Install the handler for the termination signals on the process-wide
/// monitor.
pub fn install() -> Result<(), RegistrationError> {
    Monitor::install()
}

/// Whether a termination signal has been delivered since [`install`].
///
/// Always `false` if [`install`] was never called.
pub fn report() -> bool {
    Monitor::global().report()
}
