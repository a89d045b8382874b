//!
//! The anvil process guard.
//!

use std::path::PathBuf;
use std::process::Child;
use std::process::Command;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::error::Error;
use crate::hardfork::Hardfork;

///
/// The anvil launch parameters.
///
#[derive(Debug, Clone)]
pub struct AnvilConfig {
    /// The anvil executable name or path.
    pub binary: String,
    /// The JSON-RPC port.
    pub port: u16,
    /// Whether the node output is forwarded to the terminal.
    pub verbose: bool,
}

impl Default for AnvilConfig {
    fn default() -> Self {
        Self {
            binary: "anvil".to_owned(),
            port: 8545,
            verbose: false,
        }
    }
}

impl AnvilConfig {
    ///
    /// The JSON-RPC endpoint of the launched node.
    ///
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

///
/// The shared handle stopping the anvil process.
///
/// The process is killed and reaped exactly once, by whichever of the guard
/// and the signal handler gets there first.
///
#[derive(Debug, Clone)]
pub struct StopHandle {
    /// The child process, `None` once stopped.
    child: Arc<Mutex<Option<Child>>>,
}

impl StopHandle {
    ///
    /// Kills and reaps the process. Returns `false` if it was already stopped.
    ///
    pub fn stop(&self) -> bool {
        match self.lock().take() {
            Some(mut child) => {
                let _ = child.kill();
                let _ = child.wait();
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Child>> {
        self.child.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

///
/// The running anvil process.
///
/// The process is terminated when the guard is dropped, explicitly
/// terminated, or the debugger receives SIGINT or SIGTERM.
///
#[derive(Debug)]
pub struct AnvilProcess {
    /// The resolved executable.
    path: PathBuf,
    /// The stop handle, shared with the signal handler.
    handle: StopHandle,
}

impl AnvilProcess {
    /// The exit code of a debugger stopped by a signal.
    pub const EXIT_CODE_INTERRUPTED: i32 = 130;

    ///
    /// Launches anvil with the block timestamp and protocol version.
    ///
    pub fn spawn(config: &AnvilConfig, timestamp: u64, hardfork: Hardfork) -> crate::Result<Self> {
        let path = which::which(config.binary.as_str()).map_err(|error| Error::Launch {
            binary: config.binary.clone(),
            message: error.to_string(),
        })?;

        let (stdout, stderr) = if config.verbose {
            (Stdio::inherit(), Stdio::inherit())
        } else {
            (Stdio::null(), Stdio::null())
        };

        let child = Command::new(path.as_path())
            .args(Self::arguments(config, timestamp, hardfork))
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|error| Error::Launch {
                binary: path.to_string_lossy().to_string(),
                message: error.to_string(),
            })?;

        Ok(Self {
            path,
            handle: StopHandle {
                child: Arc::new(Mutex::new(Some(child))),
            },
        })
    }

    ///
    /// The command line arguments.
    ///
    pub fn arguments(config: &AnvilConfig, timestamp: u64, hardfork: Hardfork) -> Vec<String> {
        vec![
            "--port".to_owned(),
            config.port.to_string(),
            "--timestamp".to_owned(),
            timestamp.to_string(),
            "--hardfork".to_owned(),
            hardfork.to_string(),
        ]
    }

    ///
    /// The resolved executable.
    ///
    pub fn path(&self) -> &std::path::Path {
        self.path.as_path()
    }

    ///
    /// The handle stopping the process from elsewhere.
    ///
    pub fn stop_handle(&self) -> StopHandle {
        self.handle.clone()
    }

    ///
    /// Fails with `Launch` if the process is no longer running.
    ///
    pub fn ensure_running(&self) -> crate::Result<()> {
        let mut child = self.handle.lock();
        let status = match child.as_mut() {
            Some(child) => child.try_wait().map_err(|error| self.launch_error(error))?,
            None => return Err(self.launch_error("the process was terminated")),
        };
        match status {
            None => Ok(()),
            Some(status) => Err(self.launch_error(format!(
                "the process exited with {status} before accepting connections"
            ))),
        }
    }

    ///
    /// Stops the process on SIGINT or SIGTERM, then exits the debugger.
    ///
    /// Can be installed once per process.
    ///
    pub fn stop_on_signal(&self) -> crate::Result<()> {
        let handle = self.stop_handle();
        ctrlc::set_handler(move || {
            handle.stop();
            std::process::exit(Self::EXIT_CODE_INTERRUPTED);
        })
        .map_err(|error| self.launch_error(format!("cannot install the signal handler: {error}")))
    }

    ///
    /// Terminates the process. Subsequent calls are no-ops.
    ///
    pub fn terminate(&mut self) {
        self.handle.stop();
    }

    fn launch_error<E>(&self, error: E) -> Error
    where
        E: ToString,
    {
        Error::Launch {
            binary: self.path.to_string_lossy().to_string(),
            message: error.to_string(),
        }
    }
}

impl Drop for AnvilProcess {
    fn drop(&mut self) {
        self.terminate();
    }
}
