use log::info;
use std::{
    sync::mpsc::{self, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

/// A thread logging periodically that a computation is still running.
///
/// The watchdog only logs; it never interrupts the computation.
/// It stops when it is dropped.
pub struct ProgressWatchdog {
    stop_sender: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressWatchdog {
    /// Starts a watchdog logging every `interval`.
    ///
    /// A null interval disables the logs.
    pub fn start(label: String, interval: Duration) -> Self {
        if interval.is_zero() {
            return Self {
                stop_sender: None,
                handle: None,
            };
        }
        let (stop_sender, stop_receiver) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            let start = Instant::now();
            while let Err(RecvTimeoutError::Timeout) = stop_receiver.recv_timeout(interval) {
                info!(
                    "{} still running after {:.0}s",
                    label,
                    start.elapsed().as_secs_f64()
                );
            }
        });
        Self {
            stop_sender: Some(stop_sender),
            handle: Some(handle),
        }
    }
}

impl Drop for ProgressWatchdog {
    fn drop(&mut self) {
        if let Some(s) = self.stop_sender.take() {
            let _ = s.send(());
        }
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}
