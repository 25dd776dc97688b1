//! Bootstrap sequence
//!
//! The launcher resolves the home directory, merges configuration, wipes
//! framework state when asked, starts the built-in modules by start level,
//! and hands any persisted command to the dispatch thread. The process exit
//! code carries the shutdown intent (0 stop, 100 restart).

use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::Context as _;
use stamina_core::{Config, RuntimeDirs};
use stamina_host::commandline;
use stamina_host::{
    join_with_timeout, spawn_dispatcher, BufferLayer, CommandRegistry, LogBuffer, ModuleHost,
    Shutdown, StopSignal,
};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::cli::Cli;
use crate::modules::builtin_modules;
use crate::output;
use crate::runtime::Runtime;

/// How long the main thread waits for the dispatch thread after shutdown.
const DISPATCH_JOIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Boot the platform and run it to completion.
pub fn run(cli: Cli) -> anyhow::Result<i32> {
    let working_dir = std::env::current_dir()?;

    // Two-pass directory resolution: home is needed to find the
    // configuration, which may in turn redirect the data directories.
    let home_override = cli.home.as_deref().map(camino::Utf8Path::as_std_path);
    let bootstrap = RuntimeDirs::resolve(home_override, &Config::new())?;
    let mut config = load_config(&bootstrap)?;
    config
        .overlay_definitions(cli.define.iter().map(String::as_str))
        .context("invalid -D definition")?;
    let dirs = RuntimeDirs::resolve(Some(bootstrap.home()), &config)?;

    let log_buffer = Arc::new(LogBuffer::new());
    init_tracing(&cli, log_buffer.clone());
    info!(
        "Stamina {} starting, home: {}",
        env!("CARGO_PKG_VERSION"),
        dirs.home().display()
    );

    if config.get_bool("stamina.data.clean") {
        clean_data_dir(&dirs)?;
    }
    std::fs::create_dir_all(dirs.data())?;

    let runtime = Arc::new(Runtime {
        config,
        dirs,
        working_dir,
        repositories: RwLock::new(Default::default()),
        log_buffer,
        shutdown: Arc::new(Shutdown::new()),
    });

    // Persist the requested command before modules start; a leftover file
    // from a crashed run is discarded rather than replayed.
    let command_file = runtime.dirs.command_file();
    match &cli.command {
        Some(command) => commandline::write_command_file(&command_file, command, &cli.args)?,
        None if command_file.exists() => {
            warn!("Discarding stale command file: {}", command_file.display());
            std::fs::remove_file(&command_file)?;
        }
        None => {}
    }

    let mut host = ModuleHost::new(Arc::new(CommandRegistry::new()));
    for module in builtin_modules(&runtime) {
        host.install(module);
    }

    // Module start covers system repository indexing, which can take a
    // moment on a large sys/ directory.
    let progress =
        (cli.command.is_none() && !cli.quiet).then(|| output::spinner("Starting platform"));
    let started = host.start_all();
    if let Some(progress) = &progress {
        progress.finish_and_clear();
    }
    started.context("platform bootstrap failed")?;

    let dispatcher = match commandline::consume_command_file(&command_file, &runtime.working_dir)? {
        Some(command_line) => Some(spawn_dispatcher(
            host.registry().clone(),
            command_line,
            Duration::from_secs(runtime.command_timeout_secs()),
            runtime.shutdown.clone(),
        )),
        None => {
            if !cli.quiet {
                output::success("Platform started");
            }
            None
        }
    };

    let signal = runtime.shutdown.wait();
    host.stop_all();
    if let Some(handle) = dispatcher {
        join_with_timeout(handle, DISPATCH_JOIN_TIMEOUT);
    }

    if signal == StopSignal::Restart && !cli.quiet {
        output::info("Restart requested");
    }
    Ok(signal.exit_code())
}

/// Load `etc/framework.properties`, following `${includes}` chains. A
/// missing file yields an empty configuration.
fn load_config(dirs: &RuntimeDirs) -> anyhow::Result<Config> {
    let file = dirs.conf().join("framework.properties");
    if !file.is_file() {
        debug!("No framework configuration at {}", file.display());
        return Ok(Config::new());
    }
    Config::load(&file).with_context(|| format!("loading {}", file.display()))
}

/// Remove the data directory when `stamina.data.clean` is set. Refuses to
/// wipe the home directory itself in case `stamina.data` points at it.
fn clean_data_dir(dirs: &RuntimeDirs) -> std::io::Result<()> {
    if dirs.data() == dirs.home() {
        warn!("stamina.data.clean ignored: data directory is the home directory");
        return Ok(());
    }
    if dirs.data().is_dir() {
        info!("Cleaning data directory: {}", dirs.data().display());
        std::fs::remove_dir_all(dirs.data())?;
    }
    Ok(())
}

/// Console logging on stderr plus the bounded in-memory buffer.
///
/// Command invocations keep the console quiet by default so command output
/// is all the caller sees; `-v` flags raise the level, `RUST_LOG` overrides
/// everything.
fn init_tracing(cli: &Cli, buffer: Arc<LogBuffer>) {
    let default = if cli.quiet {
        "error"
    } else if cli.command.is_some() && cli.verbose == 0 {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(BufferLayer::new(buffer).with_filter(LevelFilter::DEBUG))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .init();
}
