/*
 * Copyright 2024 Fluence Labs Limited
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![deny(
    dead_code,
    nonstandard_style,
    unused_imports,
    unused_mut,
    unused_variables,
    unused_unsafe,
    unreachable_patterns
)]

mod status;

#[cfg(test)]
mod tests;

use std::time::Duration;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use eyre::WrapErr as _;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use nocache::CacheSwitch;
use nocache::CpuBroadcast;
use nocache::NativeBroadcast;
use nocache::SimulatedMachine;
use nocache_config::load_config;
use nocache_config::Backend;
use nocache_config::NocacheConfig;

use crate::status::ReportStatus;

/// Disables CPU caching on every logical processor of the machine.
///
/// The simulated backend is the default. The native backend executes
/// privileged instructions and must run at ring 0, caches are neither flushed
/// nor invalidated on any transition.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(short, long)]
    config_path: Option<String>,

    /// Overrides the backend from the config, `native` needs ring 0.
    #[arg(short, long, value_enum)]
    backend: Option<BackendArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Disable caching on every logical processor.
    Activate,
    /// Reenable caching on every logical processor.
    Deactivate,
    /// Disable caching, hold it disabled, then reenable it.
    Window {
        /// Overrides window.hold_secs from the config, Ctrl-C ends the window earlier.
        #[arg(long)]
        hold_secs: Option<u64>,
    },
    /// Print per-core cache control registers.
    Status,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum BackendArg {
    Native,
    Simulated,
}

fn main() -> eyre::Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config_path.as_deref())?;
    config.backend = select_backend(config.backend, args.backend);

    let filter = EnvFilter::builder()
        .with_env_var("RUST_LOG")
        .with_default_directive(Directive::from(config.logs.log_level))
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("setting global tracing subscriber failed")?;
    tracing_log::LogTracer::init()?;

    tracing::debug!("running {:?} with config {config:?}", args.command);
    match config.backend {
        Backend::Native => {
            tracing::warn!(
                "native backend writes CR0 and IA32_MTRR_DEF_TYPE directly, \
                 outside ring 0 the process is killed by a general protection fault"
            );
            // SAFETY: ring 0 is a documented precondition of the native backend,
            // running it anywhere else is fatal for the process.
            let broadcast = unsafe { NativeBroadcast::native() };
            run(args.command, CacheSwitch::new(broadcast), &config)
        }
        Backend::Simulated { logical_cores } => {
            let machine = SimulatedMachine::new(logical_cores);
            run(args.command, CacheSwitch::new(machine), &config)
        }
    }
}

/// A simulated override keeps the configured simulated machine size.
fn select_backend(configured: Backend, requested: Option<BackendArg>) -> Backend {
    match (requested, configured) {
        (Some(BackendArg::Native), _) => Backend::Native,
        (Some(BackendArg::Simulated), Backend::Native) => Backend::simulated_default(),
        (Some(BackendArg::Simulated), simulated @ Backend::Simulated { .. }) => simulated,
        (None, configured) => configured,
    }
}

fn run<B>(command: Command, switch: CacheSwitch<B>, config: &NocacheConfig) -> eyre::Result<()>
where
    B: CpuBroadcast + ReportStatus,
{
    match command {
        Command::Activate => switch.activate()?,
        Command::Deactivate => switch.deactivate()?,
        Command::Window { hold_secs } => {
            let hold = hold_secs
                .map(Duration::from_secs)
                .unwrap_or(config.window.hold);
            run_window(&switch, hold)?;
        }
        Command::Status => {}
    }

    switch.broadcast().report_status(&mut std::io::stdout().lock())
}

fn run_window<B: CpuBroadcast>(switch: &CacheSwitch<B>, hold: Duration) -> eyre::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build tokio runtime")?;

    let window = switch.disabled_window()?;
    tracing::info!("caching is disabled for {hold:?}, Ctrl-C ends the window earlier");

    runtime.block_on(async {
        let deadline = tokio::time::Instant::now() + hold;

        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => {
                tracing::info!("window has elapsed");
            }
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => tracing::info!("window interrupted"),
                Err(error) => {
                    tracing::warn!("listening for Ctrl-C failed: {error}, holding the window till its end");
                    tokio::time::sleep_until(deadline).await;
                }
            }
        }
    });

    window.close().wrap_err("closing the window failed")
}
