//! Cooperative cancellation for long scans.
//!
//! Scans receive a [`CancellationSignal`] from the host and poll it through a [`Safepoint`];
//! nothing in this workspace interrupts a thread on its own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Rows processed between two polls of the cancellation signal.
pub const SAFEPOINT_INTERVAL: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation was cancelled")]
pub struct Cancelled;

/// A zero-argument, pollable cancellation capability.
pub trait CancellationSignal: Sync {
    fn is_cancelled(&self) -> bool;
}

/// A signal that never fires.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancel;

impl CancellationSignal for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<F> CancellationSignal for F
where
    F: Fn() -> bool + Sync,
{
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Shared flag the host flips to stop running scans.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

impl CancellationSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Polls a signal every `interval` ticks, starting with the first one.
pub struct Safepoint<'a> {
    signal: &'a dyn CancellationSignal,
    interval: usize,
    ticks: usize,
}

impl<'a> Safepoint<'a> {
    pub fn new(signal: &'a dyn CancellationSignal) -> Self {
        Self::with_interval(signal, SAFEPOINT_INTERVAL)
    }

    pub fn with_interval(signal: &'a dyn CancellationSignal, interval: usize) -> Self {
        Self {
            signal,
            interval: interval.max(1),
            ticks: 0,
        }
    }

    pub fn poll(&mut self) -> Result<(), Cancelled> {
        let due = self.ticks % self.interval == 0;
        self.ticks = self.ticks.wrapping_add(1);
        if due && self.signal.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn polls_on_interval_boundaries() {
        let polls = AtomicUsize::new(0);
        let signal = || {
            polls.fetch_add(1, Ordering::Relaxed);
            false
        };
        let mut safepoint = Safepoint::with_interval(&signal, 4);
        for _ in 0..9 {
            safepoint.poll().unwrap();
        }
        // Ticks 0, 4 and 8.
        assert_eq!(polls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn token_cancels_on_next_due_poll() {
        let token = CancellationToken::new();
        let mut safepoint = Safepoint::with_interval(&token, 1);
        assert_eq!(safepoint.poll(), Ok(()));

        token.clone().cancel();
        assert_eq!(safepoint.poll(), Err(Cancelled));
    }
}
