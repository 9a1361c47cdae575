use anyhow::Result;
use clap::{Parser, ValueEnum};
use hallway_core::{record::BufferedRecorder, ControlMode};
use hallway_sim::{Runner, SimConfig};
use log::info;
use std::collections::BTreeMap;

/// Who drives the agent.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// A scripted operator; episodes are replayed as demonstrations
    Interactive,

    /// A random policy choosing actions and delays
    Autonomous,
}

impl From<Mode> for ControlMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Interactive => ControlMode::Interactive,
            Mode::Autonomous => ControlMode::Autonomous,
        }
    }
}

/// Run episodes of the hallway cue-association task
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Control mode, overriding the configuration
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Number of episodes
    #[arg(short, long, default_value_t = 10)]
    episodes: usize,

    /// Random seed, overriding the configuration
    #[arg(short, long)]
    seed: Option<u64>,

    /// Replayed steps per fixed tick, all at once if omitted
    #[arg(long)]
    replay_steps_per_tick: Option<usize>,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    save_config: Option<String>,
}

fn create_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.scheduler = config.scheduler.mode(mode.into());
    }
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if args.replay_steps_per_tick.is_some() {
        config.scheduler = config
            .scheduler
            .replay_steps_per_tick(args.replay_steps_per_tick);
    }
    Ok(config)
}

fn run(args: &Args) -> Result<BufferedRecorder> {
    let config = create_config(args)?;
    if let Some(path) = &args.save_config {
        config.save(path)?;
        info!("Saved configuration to {}", path);
        return Ok(BufferedRecorder::new());
    }

    info!(
        "Running {} episodes in {:?} mode",
        args.episodes, config.scheduler.mode
    );
    let mut runner = Runner::build(&config)?;
    let mut recorder = BufferedRecorder::new();
    runner.run(args.episodes, config.flush_interval, &mut recorder)?;

    let policy = runner.protocol();
    info!(
        "Live decisions: {}, demonstration steps: {}",
        policy.n_live(),
        policy.n_demonstrations()
    );
    Ok(recorder)
}

/// Logs the number of episodes per outcome.
fn summarize(recorder: &BufferedRecorder) {
    let mut counts = BTreeMap::new();
    for record in recorder.iter() {
        if let Ok(outcome) = record.get_string("outcome") {
            *counts.entry(outcome).or_insert(0) += 1;
        }
    }
    for (outcome, n) in counts.iter() {
        info!("{}: {} episodes", outcome, n);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let recorder = run(&args)?;
    summarize(&recorder);

    Ok(())
}
