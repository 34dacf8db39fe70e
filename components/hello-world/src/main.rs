//! hello-world - greeting and USB keyboard last-character diagnostic
//!
//! Usage:
//!   hello-world --config hello-world.toml
//!   hello-world --print-times 3 -vv

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use hello_world::{run, Config, Platform, StdoutConsole};

#[derive(Parser, Debug)]
#[command(name = "hello-world")]
#[command(version)]
#[command(about = "Print a greeting, then the last character typed on the first USB keyboard")]
struct Args {
    /// Configuration file (greeting settings and simulated devices)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of times the greeting is printed
    #[arg(long)]
    print_times: Option<u32>,

    /// Do not print the greeting
    #[arg(long)]
    disable_print: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let default_filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(times) = args.print_times {
        config.hello_world.print_times = times;
    }
    if args.disable_print {
        config.hello_world.print_enable = false;
    }

    log::info!(
        "greeting enabled={} times={}",
        config.hello_world.print_enable,
        config.hello_world.print_times
    );

    let platform = Platform::from_devices(&config.devices);
    let mut console = StdoutConsole::stdout();
    Ok(run(&config, &platform, &mut console).into())
}
