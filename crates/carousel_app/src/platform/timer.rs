use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use engine_logging::engine_debug;

/// Background thread invoking `tick` every `interval` until cancelled.
/// Dropping the timer cancels it and joins the thread.
pub struct AutoPlayTimer {
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AutoPlayTimer {
    /// `tick` returning false stops the timer.
    pub fn start<F>(interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if !tick() {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        engine_debug!("Auto-play timer armed ({:?})", interval);
        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            engine_debug!("Auto-play timer disarmed");
        }
    }
}

impl Drop for AutoPlayTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn ticks_until_cancelled() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let timer = AutoPlayTimer::start(Duration::from_millis(5), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });
        thread::sleep(Duration::from_millis(60));
        timer.cancel();

        let after_cancel = ticks.load(Ordering::SeqCst);
        assert!(after_cancel >= 1);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(ticks.load(Ordering::SeqCst), after_cancel);
    }

    #[test]
    fn drop_stops_before_first_tick() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        drop(AutoPlayTimer::start(Duration::from_secs(60), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        }));
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn tick_returning_false_ends_thread() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let timer = AutoPlayTimer::start(Duration::from_millis(2), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        });
        thread::sleep(Duration::from_millis(40));
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        drop(timer);
    }
}
