use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vitrine", version)]
struct Cli {
    /// Log engine decisions to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a showcase config and print it with defaults filled in.
    Check(CheckArgs),
    /// Play a scripted scenario and print its event trace as JSON lines.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Also check item-dependent settings against this many items.
    #[arg(long)]
    items: Option<usize>,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Simulated frame rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Write the trace here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))?;
    Ok(value)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let config: vitrine::ShowcaseConfig = read_json(&args.in_path, "config")?;
    match args.items {
        Some(n) => config.validate_for(n)?,
        None => config.validate()?,
    }
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &config).context("write config")?;
    writeln!(out)?;
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let scenario: vitrine::Scenario = read_json(&args.in_path, "scenario")?;
    let trace = vitrine::run_scenario(&scenario, args.fps)
        .with_context(|| format!("run scenario '{}'", args.in_path.display()))?;

    let mut out: Box<dyn std::io::Write> = match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(path)
                .with_context(|| format!("create trace '{}'", path.display()))?;
            Box::new(BufWriter::new(f))
        }
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    for entry in &trace.entries {
        serde_json::to_writer(&mut out, entry).context("write trace entry")?;
        writeln!(out)?;
    }
    out.flush()?;

    eprintln!(
        "{} frames, {} events, final state {}",
        trace.frames,
        trace.entries.len(),
        trace.final_state
    );
    Ok(())
}
