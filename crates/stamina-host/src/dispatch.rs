//! One-shot command dispatch
//!
//! The dispatch thread waits (with timeout) for the requested command to be
//! registered, executes it once, then asks the host to stop unless the
//! command declared keep-running intent. Execution failures are logged and
//! never crash the host; the stop sequence still proceeds.
//!
//! States: WAITING -> EXECUTING -> STOPPING, or WAITING -> NOT_FOUND ->
//! STOPPING when the timeout elapses.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::command::CommandContext;
use crate::commandline::CommandLine;
use crate::registry::CommandRegistry;

/// Why the host process should stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    /// Normal stop; process exits 0.
    Stop,
    /// Restart requested; process exits with the restart code (100).
    Restart,
}

impl StopSignal {
    /// Process exit code for this signal.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Stop => 0,
            Self::Restart => 100,
        }
    }
}

#[derive(Default)]
struct ShutdownState {
    signal: Option<StopSignal>,
}

/// Cooperative shutdown latch shared between the main thread, the dispatch
/// thread, and any command that stops or restarts the host.
#[derive(Default)]
pub struct Shutdown {
    state: Mutex<ShutdownState>,
    cond: Condvar,
}

impl Shutdown {
    /// Create an un-signaled latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. The first request wins; later ones are ignored.
    pub fn request(&self, signal: StopSignal) {
        let mut state = self.state.lock().unwrap();
        if state.signal.is_none() {
            debug!("Shutdown requested: {:?}", signal);
            state.signal = Some(signal);
            self.cond.notify_all();
        }
    }

    /// Whether a stop has been requested.
    pub fn is_requested(&self) -> bool {
        self.state.lock().unwrap().signal.is_some()
    }

    /// Block until a stop is requested.
    pub fn wait(&self) -> StopSignal {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(signal) = state.signal {
                return signal;
            }
            state = self.cond.wait(state).unwrap();
        }
    }
}

/// Spawn the command dispatch thread.
///
/// The thread waits up to `timeout` for the command named by `command_line`
/// to appear in the registry, executes it, and requests a stop unless the
/// command returned keep-running true.
pub fn spawn_dispatcher(
    registry: Arc<CommandRegistry>,
    command_line: CommandLine,
    timeout: Duration,
    shutdown: Arc<Shutdown>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("stamina-command-dispatch".to_string())
        .spawn(move || dispatch(&registry, &command_line, timeout, &shutdown))
        .expect("failed to spawn dispatch thread")
}

fn dispatch(
    registry: &CommandRegistry,
    command_line: &CommandLine,
    timeout: Duration,
    shutdown: &Shutdown,
) {
    info!("Waiting for command: {}", command_line.command());
    let Some(command) = registry.wait_for(command_line.command(), timeout) else {
        error!("Command not found: {}", command_line.command());
        shutdown.request(StopSignal::Stop);
        return;
    };

    let mut context = CommandContext::for_stdio(
        command_line.arguments().to_vec(),
        command_line.working_dir().to_path_buf(),
    );

    info!("Executing command-line: $ {}", command_line);
    let keep_running =
        match panic::catch_unwind(AssertUnwindSafe(|| command.execute(&mut context))) {
            Ok(Ok(keep_running)) => keep_running,
            Ok(Err(e)) => {
                error!("Command execution failed: {}", e);
                false
            }
            Err(_) => {
                error!("Command execution panicked: {}", command_line.command());
                false
            }
        };

    if !keep_running {
        shutdown.request(StopSignal::Stop);
    }
}

/// Join a thread with a bounded timeout.
///
/// The dispatch thread is never killed: if it does not finish in time, the
/// handle is abandoned and the process exits with it still running.
pub fn join_with_timeout(handle: JoinHandle<()>, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            debug!("Dispatch thread still running after join timeout");
            return false;
        }
        thread::sleep(Duration::from_millis(10));
    }
    handle.join().is_ok()
}
