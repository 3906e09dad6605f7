//! Batch processing of many instances, each one in an isolated process under a deadline.

mod batch_runner;
pub use batch_runner::BatchConfig;
pub use batch_runner::BatchRunner;
pub use batch_runner::BatchStats;

mod isolated_worker;
pub use isolated_worker::IsolatedWorker;
pub use isolated_worker::WorkerOutcome;

mod progress_watchdog;
pub use progress_watchdog::ProgressWatchdog;
