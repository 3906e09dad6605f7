use anyhow::{anyhow, Context, Result};
use log::debug;
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::{
    io::Read,
    path::PathBuf,
    process::{Child, Command, Stdio},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

/// The way a worker process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// The process exited successfully; its standard output is attached.
    Finished {
        /// The standard output of the process.
        stdout: String,
        /// The time spent between the launch and the exit of the process.
        elapsed: Duration,
    },
    /// The process exited with an error status.
    Failed {
        /// A description of the exit status.
        status: String,
        /// The standard error of the process.
        stderr: String,
    },
    /// The deadline was reached and the process was killed.
    TimedOut,
}

/// A process running a whole computation under a hard wall-clock deadline.
///
/// The standard output is read by a dedicated thread which signals its completion through a channel;
/// if no completion is received before the deadline, the process is killed.
/// On unix, the process leads its own process group, and the whole group is killed;
/// this includes the external SAT solvers it may have launched.
/// No partial output is kept from a killed process.
pub struct IsolatedWorker {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl IsolatedWorker {
    /// Builds a new worker for the given program, arguments and deadline.
    pub fn new(program: PathBuf, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program,
            args,
            timeout,
        }
    }

    /// Launches the process and waits for its exit or for the deadline.
    pub fn run(&self) -> Result<WorkerOutcome> {
        debug!("launching {:?} with args {:?}", self.program, self.args);
        let start = Instant::now();
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        command.process_group(0);
        let mut child = command
            .spawn()
            .with_context(|| format!("while launching {:?}", self.program))?;
        let mut child_stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("cannot read the standard output of the worker"))?;
        let mut child_stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("cannot read the standard error of the worker"))?;
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let mut buffer = String::new();
            let result = child_stdout.read_to_string(&mut buffer).map(|_| buffer);
            // the receiver is gone if the deadline was reached
            let _ = sender.send(result);
        });
        let stderr_reader = thread::spawn(move || {
            let mut buffer = String::new();
            if let Err(e) = child_stderr.read_to_string(&mut buffer) {
                debug!("error while reading the worker standard error: {}", e);
            }
            buffer
        });
        match receiver.recv_timeout(self.timeout) {
            Ok(read_result) => {
                let status = child.wait().context("while waiting for the worker")?;
                let elapsed = start.elapsed();
                let stderr = stderr_reader.join().unwrap_or_default();
                let stdout = read_result.context("while reading the worker output")?;
                if status.success() {
                    Ok(WorkerOutcome::Finished { stdout, elapsed })
                } else {
                    Ok(WorkerOutcome::Failed {
                        status: status.to_string(),
                        stderr,
                    })
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                debug!("deadline reached, killing the worker");
                kill_worker(&mut child);
                child.wait().context("while waiting for the killed worker")?;
                Ok(WorkerOutcome::TimedOut)
            }
            Err(RecvTimeoutError::Disconnected) => {
                kill_worker(&mut child);
                let _ = child.wait();
                Err(anyhow!("the worker output reader ended unexpectedly"))
            }
        }
    }
}

#[cfg(unix)]
fn kill_worker(child: &mut Child) {
    // the worker was spawned as the leader of its own process group
    let pgid = child.id() as libc::pid_t;
    if unsafe { libc::kill(-pgid, libc::SIGKILL) } == 0 {
        return;
    }
    debug!(
        "error while killing the worker process group: {}",
        std::io::Error::last_os_error()
    );
    if let Err(e) = child.kill() {
        debug!("error while killing the worker: {}", e);
    }
}

#[cfg(not(unix))]
fn kill_worker(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("error while killing the worker: {}", e);
    }
}
