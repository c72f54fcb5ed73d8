//! vrpsy
//!
//! Headless runner for VR psychophysics sessions. Runs the configured trial
//! types against a simulated participant and writes one results table per
//! trial type.
//!
//! # Usage
//!
//! ```bash
//! # Export a settings file with every default filled in
//! vrpsy template --output settings.json
//!
//! # Run a session in simulated time
//! vrpsy run --settings settings.json --output results --seed 42
//!
//! # Pace frames against the wall clock
//! vrpsy run --settings settings.json --realtime --fps 90
//! ```

mod app;
mod participant;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use vrpsy_core::SettingsDocument;
use vrpsy_experiment::trials::default_registry;
use vrpsy_experiment::{DirectorySink, OutputFormat, TableSummary, write_template};
use vrpsy_timing::{HighPrecisionTimer, ManualTimer};

use app::{App, RunConfig};
use participant::ParticipantProfile;

#[derive(Parser, Debug)]
#[command(name = "vrpsy")]
#[command(author, version, about = "Headless VR psychophysics session runner", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a full session against a simulated participant
    Run(RunArgs),

    /// Write a settings template with every trial type's defaults
    Template {
        #[arg(short, long, default_value = "settings.json")]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Settings JSON file
    #[arg(short, long)]
    settings: PathBuf,

    /// Directory the results tables are written to
    #[arg(short, long, default_value = "results")]
    output: PathBuf,

    #[arg(long, value_enum, default_value = "csv")]
    format: FormatArg,

    /// Seed for trial order and participant behavior
    #[arg(long)]
    seed: Option<u64>,

    /// Frame rate of the simulated headset
    #[arg(long, default_value = "90")]
    fps: f64,

    /// Sleep on the wall clock between frames instead of simulating time
    #[arg(long)]
    realtime: bool,

    /// Pause once this many trials are done
    #[arg(long)]
    pause_after: Option<usize>,

    /// How long the pause screen stays up before resuming
    #[arg(long, default_value = "5")]
    pause_seconds: f64,

    /// Seconds until the headset eye tracker connects; never if unset
    #[arg(long)]
    eye_tracker_connect_after: Option<f64>,

    /// Gaze samples below this confidence are dropped
    #[arg(long, default_value = "0.6")]
    confidence_threshold: f64,

    /// Abort if the session has not ended after this many seconds
    #[arg(long, default_value = "3600")]
    max_session_seconds: f64,

    #[command(flatten)]
    participant: ParticipantArgs,
}

#[derive(Args, Debug)]
struct ParticipantArgs {
    #[arg(long, default_value = "0.25")]
    min_reaction_time: f64,

    #[arg(long, default_value = "0.6")]
    max_reaction_time: f64,

    /// Chance of missing a target entirely
    #[arg(long, default_value = "0.05")]
    lapse_rate: f64,

    /// Chance of responding before the target appears
    #[arg(long, default_value = "0.05")]
    false_alarm_rate: f64,

    /// Chance of looking at the target instead of the fixation dot
    #[arg(long, default_value = "0.05")]
    glance_rate: f64,

    /// Chance per frame of tapping the click pad
    #[arg(long, default_value = "0.05")]
    click_rate: f64,
}

impl ParticipantArgs {
    fn profile(&self) -> anyhow::Result<ParticipantProfile> {
        for (name, rate) in [
            ("lapse-rate", self.lapse_rate),
            ("false-alarm-rate", self.false_alarm_rate),
            ("glance-rate", self.glance_rate),
            ("click-rate", self.click_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                bail!("--{name} must be within [0, 1], got {rate}");
            }
        }
        if !(self.min_reaction_time >= 0.0 && self.max_reaction_time >= self.min_reaction_time) {
            bail!(
                "reaction time range {}..{} is invalid",
                self.min_reaction_time,
                self.max_reaction_time
            );
        }
        Ok(ParticipantProfile {
            min_reaction_time: self.min_reaction_time,
            max_reaction_time: self.max_reaction_time,
            lapse_rate: self.lapse_rate,
            false_alarm_rate: self.false_alarm_rate,
            glance_rate: self.glance_rate,
            click_rate: self.click_rate,
            ..ParticipantProfile::default()
        })
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("vrpsy v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run(args) => run_session(args),
        Commands::Template { output } => {
            write_template(&default_registry(), &output)
                .with_context(|| format!("failed to export template to {}", output.display()))?;
            println!("Settings template written to {}", output.display());
            Ok(())
        }
    }
}

fn run_session(args: RunArgs) -> anyhow::Result<()> {
    let settings = SettingsDocument::load(&args.settings)
        .with_context(|| format!("failed to load settings from {}", args.settings.display()))?;
    let profile = args.participant.profile()?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let sink = DirectorySink::new(&args.output, args.format.into());
    let config = RunConfig {
        fps: args.fps,
        pause_after: args.pause_after,
        pause_seconds: args.pause_seconds,
        eye_tracker_connect_after: args.eye_tracker_connect_after,
        confidence_threshold: args.confidence_threshold,
        max_session_seconds: args.max_session_seconds,
    };

    let summaries = if args.realtime {
        App::new(settings, HighPrecisionTimer::new(), rng, sink, profile, config)?.run()?
    } else {
        App::new(settings, ManualTimer::new(), rng, sink, profile, config)?.run()?
    };

    print_summaries(&summaries, &args.output);
    Ok(())
}

fn print_summaries(summaries: &[TableSummary], output: &std::path::Path) {
    println!("\nSession complete. Results written to {}", output.display());
    for summary in summaries {
        println!("  {summary}");
    }
}
