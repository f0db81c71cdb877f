//! The termination-requesting signals and handler registration.

use std::ffi::c_int;
use std::fmt;

use log::debug;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

use crate::error::RegistrationError;

/// One of the four signals conventionally used to ask a process to shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationSignal {
    /// `SIGHUP`
    Hangup,
    /// `SIGINT`
    Interrupt,
    /// `SIGQUIT`
    Quit,
    /// `SIGTERM`
    Terminate,
}

impl TerminationSignal {
    /// Every monitored signal, in registration order.
    pub const ALL: [TerminationSignal; 4] = [
        TerminationSignal::Hangup,
        TerminationSignal::Interrupt,
        TerminationSignal::Quit,
        TerminationSignal::Terminate,
    ];

    pub fn as_nix(self) -> Signal {
        match self {
            Self::Hangup => Signal::SIGHUP,
            Self::Interrupt => Signal::SIGINT,
            Self::Quit => Signal::SIGQUIT,
            Self::Terminate => Signal::SIGTERM,
        }
    }

    /// Platform signal number.
    pub fn as_raw(self) -> c_int {
        self.as_nix() as c_int
    }

    /// Map a raw signal number back to a monitored signal.
    ///
    /// Returns `None` for anything outside the four. Does not allocate, so it
    /// may be called from a signal handler.
    pub fn from_raw(signo: c_int) -> Option<Self> {
        if signo == Signal::SIGHUP as c_int {
            Some(Self::Hangup)
        } else if signo == Signal::SIGINT as c_int {
            Some(Self::Interrupt)
        } else if signo == Signal::SIGQUIT as c_int {
            Some(Self::Quit)
        } else if signo == Signal::SIGTERM as c_int {
            Some(Self::Terminate)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Hangup => "SIGHUP",
            Self::Interrupt => "SIGINT",
            Self::Quit => "SIGQUIT",
            Self::Terminate => "SIGTERM",
        }
    }
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<TerminationSignal> for Signal {
    fn from(signal: TerminationSignal) -> Self {
        signal.as_nix()
    }
}

/// Register `handler` for all four termination signals.
///
/// The handler runs with an empty mask and no flags: it is not reset to the
/// default disposition after delivery and interrupted system calls are not
/// restarted. The previous disposition is discarded.
///
/// `handler` runs in signal context and must restrict itself to
/// async-signal-safe operations (an atomic store, for instance).
///
/// Stops at the first signal whose registration fails and returns that
/// failure.
pub fn install(handler: extern "C" fn(c_int)) -> Result<(), RegistrationError> {
    let action = SigAction::new(
        SigHandler::Handler(handler),
        SaFlags::empty(),
        SigSet::empty(),
    );

    for signal in TerminationSignal::ALL {
        // SAFETY: the handler is a plain function pointer and the caller is
        // responsible for it being async-signal-safe.
        unsafe { sigaction(signal.as_nix(), &action) }
            .map_err(|source| RegistrationError::Registration { signal, source })?;
        debug!("Registered handler for {}", signal);
    }

    Ok(())
}
