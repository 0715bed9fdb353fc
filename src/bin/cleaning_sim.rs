//! Cleaning simulator - scripted, headless cleaning session
//!
//! Runs a list of steps against a session and prints the final snapshot as JSON.
//!
//! Steps:
//! - any session command: `select:<area>`, `select:whole-bus`, `toggle:<method>`,
//!   `methods:<m1>,<m2>`, `clear:<area>`, `clear-all`, `confirm`, `skip`, `reset`
//! - `wait:<n>`: let `n` countdown seconds elapse (stops early on completion)
//! - `wait-complete`: let the countdown run to the end
//!
//! Usage:
//!   cargo run --bin cleaning-sim -- --tick-ms 5 --seed 42 \
//!     select:aisle toggle:basic-wash toggle:polish confirm wait:30 skip

use anyhow::Context;
use berlbus_cleaning::domain::Command;
use berlbus_cleaning::infra::{logging, Config};
use berlbus_cleaning::services::{create_session_runner, CleaningSession, Phase, SessionSnapshot};
use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::info;

/// Scripted cleaning session runner
#[derive(Parser, Debug)]
#[command(name = "cleaning-sim", version, about)]
struct Args {
    /// Path to TOML configuration file (default: $CONFIG_FILE, then config/dev.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Countdown period in milliseconds (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: Option<u64>,

    /// RNG seed for the found-items report (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Print compact instead of pretty JSON
    #[arg(long)]
    compact: bool,

    /// Script steps, executed in order
    #[arg(required = true)]
    steps: Vec<String>,
}

/// One parsed script step
#[derive(Debug)]
enum Step {
    Send(Command),
    Wait(u32),
    WaitComplete,
}

fn parse_step(text: &str) -> anyhow::Result<Step> {
    if text == "wait-complete" {
        return Ok(Step::WaitComplete);
    }
    if let Some(secs) = text.strip_prefix("wait:") {
        let secs = secs.parse().with_context(|| format!("invalid wait step '{}'", text))?;
        return Ok(Step::Wait(secs));
    }
    text.parse().map(Step::Send)
}

/// Wait until the runner has processed `count` commands
async fn wait_for_commands(
    rx: &mut watch::Receiver<SessionSnapshot>,
    count: u64,
) -> anyhow::Result<()> {
    rx.wait_for(|s| s.command_count >= count).await.context("session runner stopped")?;
    Ok(())
}

async fn run_script(
    steps: Vec<Step>,
    cmd_tx: &mpsc::Sender<Command>,
    rx: &mut watch::Receiver<SessionSnapshot>,
) -> anyhow::Result<()> {
    let mut sent = 0u64;
    for step in steps {
        match step {
            Step::Send(cmd) => {
                info!(command = %cmd.name(), "script_command");
                cmd_tx.send(cmd).await.context("session runner stopped")?;
                sent += 1;
                wait_for_commands(rx, sent).await?;
            }
            Step::Wait(secs) => {
                let target = rx.borrow().remaining_seconds.saturating_sub(secs);
                rx.wait_for(|s| s.phase != Phase::Cleaning || s.remaining_seconds <= target)
                    .await
                    .context("session runner stopped")?;
            }
            Step::WaitComplete => {
                rx.wait_for(|s| s.phase != Phase::Cleaning)
                    .await
                    .context("session runner stopped")?;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref());
    if let Some(ms) = args.tick_ms {
        config = config.with_tick_interval_ms(ms)?;
    }
    if let Some(seed) = args.seed {
        config = config.with_outcome_seed(seed);
    }

    logging::init_stderr(config.log_json())?;

    // Parse the whole script up front so a typo fails before anything runs
    let steps = args.steps.iter().map(|s| parse_step(s)).collect::<anyhow::Result<Vec<_>>>()?;

    info!(
        config_file = %config.config_file(),
        bus_id = %config.bus_id(),
        tick_interval_ms = %config.tick_interval_ms(),
        seed = ?config.outcome_seed(),
        steps = %steps.len(),
        "cleaning_sim_starting"
    );

    let session = CleaningSession::new(&config);
    let (cmd_tx, mut snapshot_rx, runner) =
        create_session_runner(session, config.tick_interval(), 64);
    let runner_handle = tokio::spawn(runner.run());

    run_script(steps, &cmd_tx, &mut snapshot_rx).await?;

    let snapshot = snapshot_rx.borrow().clone();
    drop(cmd_tx);
    runner_handle.await.context("session runner panicked")?;

    let json = if args.compact {
        serde_json::to_string(&snapshot)?
    } else {
        serde_json::to_string_pretty(&snapshot)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert!(matches!(parse_step("wait:30").unwrap(), Step::Wait(30)));
        assert!(matches!(parse_step("wait-complete").unwrap(), Step::WaitComplete));
        assert!(matches!(parse_step("confirm").unwrap(), Step::Send(Command::Confirm)));
        assert!(parse_step("wait:soon").is_err());
        assert!(parse_step("select:roof").is_err());
    }

    #[test]
    fn test_args_config_optional() {
        let args = Args::try_parse_from(["cleaning-sim", "confirm"]).unwrap();
        assert_eq!(args.config, None);

        let args = Args::try_parse_from(["cleaning-sim", "-c", "config/depot.toml", "confirm"]).unwrap();
        assert_eq!(args.config.as_deref(), Some("config/depot.toml"));
    }

    #[test]
    fn test_args_reject_zero_tick() {
        assert!(Args::try_parse_from(["cleaning-sim", "--tick-ms", "0", "confirm"]).is_err());
        let args = Args::try_parse_from(["cleaning-sim", "--tick-ms", "5", "confirm"]).unwrap();
        assert_eq!(args.tick_ms, Some(5));
    }
}
