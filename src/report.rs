//! Snapshot of a monitor for display.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::monitor::{self, Monitor, MonitorState};
use crate::signals::TerminationSignal;

/// Point-in-time view of a [`Monitor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub signaled: bool,
    pub signal: Option<String>,
    pub state: MonitorState,
}

impl Report {
    pub fn capture(monitor: &Monitor) -> Self {
        // Read the flag once so the three fields agree.
        Self::from_snapshot(monitor.received_signal(), monitor.is_armed())
    }

    fn from_snapshot(received: Option<TerminationSignal>, armed: bool) -> Self {
        Self {
            signaled: received.is_some(),
            signal: received.map(|s| s.name().to_string()),
            state: monitor::state_of(received, armed),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "signaled: {}", self.signaled)?;
        writeln!(f, "signal: {}", self.signal.as_deref().unwrap_or("none"))?;
        let state = match self.state {
            MonitorState::Unarmed => "unarmed",
            MonitorState::Armed => "armed",
            MonitorState::Signaled => "signaled",
        };
        write!(f, "state: {}", state)
    }
}
