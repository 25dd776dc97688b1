//! Command registry
//!
//! A shared map of named commands with a timed wait: the dispatch thread
//! blocks in [`CommandRegistry::wait_for`] until a module registers the
//! requested command or the timeout elapses. Closing the registry wakes all
//! waiters, which is how cooperative shutdown interrupts a pending wait.

use std::collections::BTreeMap;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::command::Command;

#[derive(Default)]
struct Inner {
    commands: BTreeMap<String, Arc<dyn Command>>,
    closed: bool,
}

/// Shared registry of named command services.
#[derive(Default)]
pub struct CommandRegistry {
    inner: Mutex<Inner>,
    cond: Condvar,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, replacing any previous registration of the same
    /// name, and wake pending waiters.
    pub fn register(&self, command: Arc<dyn Command>) {
        let name = command.name().to_string();
        debug!("Registering command: {}", name);
        let mut inner = self.inner.lock().unwrap();
        inner.commands.insert(name, command);
        self.cond.notify_all();
    }

    /// Look up a command without waiting.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.inner.lock().unwrap().commands.get(name).cloned()
    }

    /// All registered command names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.inner.lock().unwrap().commands.keys().cloned().collect()
    }

    /// Block until a command with the given name is registered.
    ///
    /// Returns `None` when the timeout elapses or the registry is closed
    /// before a match appears.
    pub fn wait_for(&self, name: &str, timeout: Duration) -> Option<Arc<dyn Command>> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock().unwrap();
        loop {
            if let Some(command) = inner.commands.get(name) {
                return Some(command.clone());
            }
            if inner.closed {
                return None;
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, result) = self.cond.wait_timeout(inner, deadline - now).unwrap();
            inner = guard;
            if result.timed_out() && inner.commands.get(name).is_none() {
                return None;
            }
        }
    }

    /// Close the registry, waking every pending waiter.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
        self.cond.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandContext;
    use std::io::Write;
    use std::thread;

    struct Nop(&'static str);

    impl Command for Nop {
        fn name(&self) -> &str {
            self.0
        }

        fn help(&self, _out: &mut dyn Write) -> std::io::Result<()> {
            Ok(())
        }

        fn execute(&self, _context: &mut CommandContext) -> stamina_core::Result<bool> {
            Ok(false)
        }
    }

    #[test]
    fn wait_returns_registered_command() {
        let registry = Arc::new(CommandRegistry::new());
        let waiter = {
            let registry = registry.clone();
            thread::spawn(move || registry.wait_for("test", Duration::from_secs(5)))
        };
        thread::sleep(Duration::from_millis(20));
        registry.register(Arc::new(Nop("test")));

        let found = waiter.join().unwrap();
        assert_eq!(found.unwrap().name(), "test");
    }

    #[test]
    fn wait_times_out_without_registration() {
        let registry = CommandRegistry::new();
        let found = registry.wait_for("missing", Duration::from_millis(30));
        assert!(found.is_none());
    }

    #[test]
    fn close_wakes_waiters() {
        let registry = Arc::new(CommandRegistry::new());
        let waiter = {
            let registry = registry.clone();
            thread::spawn(move || registry.wait_for("never", Duration::from_secs(60)))
        };
        thread::sleep(Duration::from_millis(20));
        registry.close();
        assert!(waiter.join().unwrap().is_none());
    }

    #[test]
    fn names_are_sorted() {
        let registry = CommandRegistry::new();
        registry.register(Arc::new(Nop("zeta")));
        registry.register(Arc::new(Nop("alpha")));
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }
}
