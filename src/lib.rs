// src/lib.rs

pub mod cli;
pub mod config;
pub mod driver;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use anyhow::{anyhow, Context, Result};
use tokio::io::BufReader;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::model::{ActionSection, ConfigFile};
use crate::config::{default_config_path, load_and_validate};
use crate::driver::serve_lines;
use crate::exec::{Executor, LaunchOptions, LogSinks};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - the executor (launch + start)
/// - the stdin/stdout line driver
/// - Ctrl-C handling
///
/// The action is always stopped before returning.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args)?;
    let action = resolve_action(&args, &cfg)?;
    let options = resolve_launch_options(&args, &cfg);

    if args.dry_run {
        print_dry_run(&cfg, &action, &options);
        return Ok(());
    }

    let sinks = open_log_sinks(&cfg).context("opening action log sinks")?;
    let mut executor = Executor::new(sinks, &action.command, &action.args, &options)
        .with_context(|| format!("preparing action '{}'", action.command))?;

    if let Err(e) = executor.start().await {
        executor.stop();
        return Err(e).with_context(|| format!("starting action '{}'", action.command));
    }
    info!(command = %action.command, pid = ?executor.pid(), "action ready");

    let input = BufReader::new(tokio::io::stdin());
    let output = tokio::io::stdout();

    let served = tokio::select! {
        res = serve_lines(&mut executor, input, output) => Some(res),
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(error = %e, "failed to listen for Ctrl+C");
            }
            info!("interrupted; stopping action");
            None
        }
    };

    executor.stop();

    match served {
        Some(Ok(summary)) => {
            info!(interactions = summary.interactions, "done");
            Ok(())
        }
        Some(Err(e)) => Err(e).context("serving requests"),
        None => Ok(()),
    }
}

/// Explicit `--config` must exist; the default path is optional.
fn load_config(args: &CliArgs) -> Result<ConfigFile> {
    if let Some(path) = &args.config {
        return load_and_validate(path).with_context(|| format!("loading config '{path}'"));
    }

    let path = default_config_path();
    if path.exists() {
        debug!(path = %path.display(), "loading default config");
        return load_and_validate(&path)
            .with_context(|| format!("loading config '{}'", path.display()));
    }

    Ok(ConfigFile::default())
}

fn resolve_action(args: &CliArgs, cfg: &ConfigFile) -> Result<ActionSection> {
    if let Some((command, rest)) = args.command.split_first() {
        return Ok(ActionSection {
            command: command.clone(),
            args: rest.to_vec(),
        });
    }

    cfg.action
        .clone()
        .ok_or_else(|| anyhow!("no action command given (use `-- COMMAND ARGS...` or [action] in the config)"))
}

fn resolve_launch_options(args: &CliArgs, cfg: &ConfigFile) -> LaunchOptions {
    let mut options = cfg.config.launch_options();
    if args.debug {
        options.debug = true;
    }
    if let Some(ms) = args.start_timeout_ms {
        options.start_timeout = std::time::Duration::from_millis(ms.max(1));
    }
    options
}

fn open_log_sinks(cfg: &ConfigFile) -> std::io::Result<LogSinks> {
    match (&cfg.config.stdout_log, &cfg.config.stderr_log) {
        (Some(out), Some(err)) => LogSinks::open(out, err),
        // Validation rejects configs with only one of the two set.
        _ => LogSinks::inherit_stderr(),
    }
}

/// Print the resolved launch settings.
fn print_dry_run(cfg: &ConfigFile, action: &ActionSection, options: &LaunchOptions) {
    println!("actionloop dry-run");
    println!("  command: {}", action.command);
    if !action.args.is_empty() {
        println!("  args: {:?}", action.args);
    }
    println!("  start_timeout: {:?}", options.start_timeout);
    println!("  debug: {}", options.debug);
    if options.debug {
        println!("  debug_log_path: {}", options.debug_log_path.display());
    }
    match (&cfg.config.stdout_log, &cfg.config.stderr_log) {
        (Some(out), Some(err)) => {
            println!("  stdout_log: {}", out.display());
            println!("  stderr_log: {}", err.display());
        }
        _ => println!("  logs: stderr"),
    }

    debug!("dry-run complete (no execution)");
}
