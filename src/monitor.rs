//! Process-wide record of termination requests.
//!
//! The OS only accepts a bare function pointer as a handler, so the flag
//! lives in a single static [`Monitor`] that [`on_signal`] writes into.
//! Use [`Monitor::global`] (or the crate-level [`install`](crate::install)
//! and [`report`](crate::report)) to reach it.

use std::ffi::c_int;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;
use crate::signals::{self, TerminationSignal};

static MONITOR: Monitor = Monitor::new();

/// Lifecycle of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorState {
    /// No handler installed yet.
    Unarmed,
    /// Handler installed, nothing delivered.
    Armed,
    /// A termination signal has been delivered. Final.
    Signaled,
}

/// Termination flag plus the armed marker.
///
/// `received` holds the raw number of the first monitored signal, or 0.
///
/// There is exactly one monitor per process, reached through
/// [`Monitor::global`]. [`Monitor::install`] is an associated function
/// because it always arms that instance. Only the installed handler can set
/// the flag:
///
/// ```compile_fail
/// termwatch::Monitor::global().record(2);
/// ```
#[derive(Debug)]
pub struct Monitor {
    received: AtomicI32,
    armed: AtomicBool,
}

impl Monitor {
    pub(crate) const fn new() -> Self {
        Self {
            received: AtomicI32::new(0),
            armed: AtomicBool::new(false),
        }
    }

    /// The instance the installed handler writes into.
    pub fn global() -> &'static Monitor {
        &MONITOR
    }

    /// Register the handler for the termination signals and arm the global
    /// monitor. Safe to call more than once.
    pub fn install() -> Result<(), RegistrationError> {
        signals::install(on_signal)?;
        MONITOR.armed.store(true, Ordering::SeqCst);
        info!("Watching for termination signals");
        Ok(())
    }

    /// Whether a termination signal has been delivered.
    pub fn report(&self) -> bool {
        self.received.load(Ordering::SeqCst) != 0
    }

    /// The first termination signal delivered, if any.
    pub fn received_signal(&self) -> Option<TerminationSignal> {
        TerminationSignal::from_raw(self.received.load(Ordering::SeqCst))
    }

    pub fn state(&self) -> MonitorState {
        state_of(self.received_signal(), self.is_armed())
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Handler body. Async-signal-safe: one compare-and-swap, nothing else.
    ///
    /// Numbers outside the four monitored signals are ignored, and only the
    /// first delivery is kept.
    pub(crate) fn record(&self, signo: c_int) {
        if TerminationSignal::from_raw(signo).is_some() {
            let _ = self
                .received
                .compare_exchange(0, signo, Ordering::SeqCst, Ordering::SeqCst);
        }
    }

    /// Block until a termination signal arrives, checking every `poll_interval`.
    pub fn wait(&self, poll_interval: Duration) -> TerminationSignal {
        loop {
            if let Some(signal) = self.received_signal() {
                return signal;
            }
            thread::sleep(poll_interval);
        }
    }

    /// Like [`Monitor::wait`], but gives up after `timeout`.
    ///
    /// A timeout too large to represent as a deadline waits forever.
    pub fn wait_timeout(
        &self,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Option<TerminationSignal> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Some(self.wait(poll_interval));
        };
        loop {
            if let Some(signal) = self.received_signal() {
                return Some(signal);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            thread::sleep(poll_interval.min(deadline - now));
        }
    }
}

/// Signaled wins over armed; it is final.
pub(crate) fn state_of(received: Option<TerminationSignal>, armed: bool) -> MonitorState {
    match (received, armed) {
        (Some(_), _) => MonitorState::Signaled,
        (None, true) => MonitorState::Armed,
        (None, false) => MonitorState::Unarmed,
    }
}

extern "C" fn on_signal(signo: c_int) {
    MONITOR.record(signo);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_monitor_is_unarmed_and_quiet() {
        let monitor = Monitor::new();
        assert!(!monitor.report());
        assert_eq!(monitor.received_signal(), None);
        assert_eq!(monitor.state(), MonitorState::Unarmed);
    }

    #[test]
    fn test_record_sets_flag() {
        let monitor = Monitor::new();
        monitor.record(TerminationSignal::Interrupt.as_raw());
        assert!(monitor.report());
        assert_eq!(
            monitor.received_signal(),
            Some(TerminationSignal::Interrupt)
        );
        assert_eq!(monitor.state(), MonitorState::Signaled);
    }

    #[test]
    fn test_first_signal_wins() {
        let monitor = Monitor::new();
        monitor.record(TerminationSignal::Hangup.as_raw());
        monitor.record(TerminationSignal::Terminate.as_raw());
        assert_eq!(monitor.received_signal(), Some(TerminationSignal::Hangup));
        assert!(monitor.report());
    }

    #[test]
    fn test_unmonitored_numbers_are_ignored() {
        let monitor = Monitor::new();
        monitor.record(0);
        monitor.record(nix::sys::signal::Signal::SIGUSR1 as c_int);
        monitor.record(nix::sys::signal::Signal::SIGCHLD as c_int);
        assert!(!monitor.report());
        assert_eq!(monitor.state(), MonitorState::Unarmed);
    }

    #[test]
    fn test_armed_state() {
        let monitor = Monitor::new();
        monitor.armed.store(true, Ordering::SeqCst);
        assert_eq!(monitor.state(), MonitorState::Armed);
        monitor.record(TerminationSignal::Quit.as_raw());
        assert_eq!(monitor.state(), MonitorState::Signaled);
    }

    #[test]
    fn test_signaled_even_if_never_armed() {
        let monitor = Monitor::new();
        monitor.record(TerminationSignal::Terminate.as_raw());
        assert_eq!(monitor.state(), MonitorState::Signaled);
    }

    #[test]
    fn test_wait_timeout_expires() {
        let monitor = Monitor::new();
        let start = Instant::now();
        let result = monitor.wait_timeout(Duration::from_millis(5), Duration::from_millis(30));
        assert_eq!(result, None);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_wait_timeout_with_unrepresentable_deadline() {
        let monitor = Monitor::new();
        monitor.record(TerminationSignal::Quit.as_raw());
        let result = monitor.wait_timeout(Duration::from_millis(5), Duration::MAX);
        assert_eq!(result, Some(TerminationSignal::Quit));

        let result = monitor.wait_timeout(Duration::from_millis(5), Duration::from_secs(u64::MAX));
        assert_eq!(result, Some(TerminationSignal::Quit));
    }

    #[test]
    fn test_state_of() {
        assert_eq!(state_of(None, false), MonitorState::Unarmed);
        assert_eq!(state_of(None, true), MonitorState::Armed);
        assert_eq!(
            state_of(Some(TerminationSignal::Hangup), false),
            MonitorState::Signaled
        );
        assert_eq!(
            state_of(Some(TerminationSignal::Hangup), true),
            MonitorState::Signaled
        );
    }

    #[test]
    fn test_wait_returns_once_recorded_from_another_thread() {
        let monitor = Arc::new(Monitor::new());
        let writer = Arc::clone(&monitor);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            writer.record(TerminationSignal::Terminate.as_raw());
        });

        let signal = monitor.wait_timeout(Duration::from_millis(5), Duration::from_secs(5));
        handle.join().unwrap();
        assert_eq!(signal, Some(TerminationSignal::Terminate));
        assert_eq!(monitor.wait(Duration::from_millis(5)), TerminationSignal::Terminate);
    }
}
