use nix::errno::Errno;

use crate::signals::TerminationSignal;

/// Errors from installing the termination handler
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Failed to register handler for {signal}: {source}")]
    Registration {
        signal: TerminationSignal,
        #[source]
        source: Errno,
    },
}

impl RegistrationError {
    /// The signal whose registration failed first.
    pub fn signal(&self) -> TerminationSignal {
        match self {
            Self::Registration { signal, .. } => *signal,
        }
    }
}
