use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Cooperative stop flag shared between a worker thread and its owner.
///
/// Workers sleep through `wait_timeout` so a stop request wakes them
/// immediately instead of waiting out the poll interval.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    pub fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        if let Ok(mut stopped) = lock.lock() {
            *stopped = true;
        }
        cvar.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        lock.lock().map(|s| *s).unwrap_or(true)
    }

    /// Sleep up to `timeout`. Returns true if stop was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let Ok(mut stopped) = lock.lock() else {
            return true;
        };
        let deadline = std::time::Instant::now() + timeout;
        while !*stopped {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match cvar.wait_timeout(stopped, remaining) {
                Ok((guard, _)) => stopped = guard,
                Err(_) => return true,
            }
        }
        true
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
