use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use swingsense::testing::fixtures::{FixturePattern, FixtureSpec, SwingProfile};
use swingsense::{
    Calibration, MotionSample, PipelineConfig, SwingAnalysis, SwingAnalyzer, ValidationContext,
};

#[derive(Parser, Debug)]
#[command(
    name = "swing_cli",
    about = "Deterministic analysis harness for the Swingsense pipeline"
)]
struct Cli {
    /// Override pipeline configuration (JSON, defaults applied on failure)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a sample window through the full pipeline
    Analyze {
        /// JSON array of motion samples
        #[arg(long)]
        samples: PathBuf,
        /// JSON calibration profile
        #[arg(long)]
        calibration: PathBuf,
        /// JSON validation context (neutral context if omitted)
        #[arg(long)]
        context: Option<PathBuf>,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate a synthetic fixture window as JSON
    Synth {
        #[arg(long, value_enum)]
        pattern: SynthPattern,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Swing profile for swing-shaped patterns
        #[arg(long, value_enum, default_value = "iron")]
        profile: SynthProfile,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SynthPattern {
    FullSwing,
    TruncatedSwing,
    Gait,
    DoorSlam,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SynthProfile {
    Iron,
    Driver,
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .map(PipelineConfig::load_from_file)
        .unwrap_or_default();

    match cli.command {
        Commands::Analyze {
            samples,
            calibration,
            context,
            output,
        } => run_analyze(config, samples, calibration, context, output),
        Commands::Synth {
            pattern,
            seed,
            profile,
            output,
        } => run_synth(pattern, seed, profile, output),
    }
}

fn run_analyze(
    config: PipelineConfig,
    samples_path: PathBuf,
    calibration_path: PathBuf,
    context_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let window: Vec<MotionSample> = read_json(&samples_path)?;
    let calibration: Calibration = read_json(&calibration_path)?;
    let context = match context_path {
        Some(path) => read_json(&path)?,
        None => ValidationContext::neutral(),
    };

    let analyzer = SwingAnalyzer::new(config);
    let analysis = analyzer
        .analyze(&window, &calibration, &context)
        .with_context(|| format!("analyzing {}", samples_path.display()))?;

    let accepted = analysis
        .validation
        .as_ref()
        .map(|v| v.is_valid)
        .unwrap_or(false);

    emit_report(&samples_path, window.len(), &analysis, output_path)?;

    if accepted {
        Ok(ExitCode::from(0))
    } else {
        Ok(ExitCode::from(2))
    }
}

fn run_synth(
    pattern: SynthPattern,
    seed: u64,
    profile: SynthProfile,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let profile = match profile {
        SynthProfile::Iron => SwingProfile::iron(),
        SynthProfile::Driver => SwingProfile::driver(),
    };
    let pattern = match pattern {
        SynthPattern::FullSwing => FixturePattern::FullSwing { profile },
        SynthPattern::TruncatedSwing => FixturePattern::TruncatedSwing { profile },
        SynthPattern::Gait => FixturePattern::Gait {
            step_hz: 2.0,
            sway_accel: 3.0,
            duration_ms: 1500,
        },
        SynthPattern::DoorSlam => FixturePattern::DoorSlam { duration_ms: 1500 },
    };
    let window = FixtureSpec { pattern, seed }.generate();

    let json = serde_json::to_string_pretty(&window)?;
    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }
    Ok(ExitCode::from(0))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

fn emit_report(
    samples_path: &PathBuf,
    sample_count: usize,
    analysis: &SwingAnalysis,
    output_path: Option<PathBuf>,
) -> Result<()> {
    let report = AnalysisReportPayload {
        window: samples_path.display().to_string(),
        sample_count,
        analysis,
    };
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

#[derive(Serialize)]
struct AnalysisReportPayload<'a> {
    window: String,
    sample_count: usize,
    analysis: &'a SwingAnalysis,
}
