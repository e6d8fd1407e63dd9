use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meow_interpreter::analysis::{interpret, AcousticFeatures, FeatureValidator, VisualFeatures};
use meow_interpreter::batch::{collect_jobs, run_batch, BatchOutcome, BatchSummary};
use meow_interpreter::config::AppConfig;
use meow_interpreter::ensemble::{CombinedAnalysis, EnsembleAdapter, MlFeatureMap};
use meow_interpreter::extract;
use meow_interpreter::fixtures::{ExpectationDiff, FixtureCatalog, FixtureProcessor};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "meow_cli",
    about = "Interpret cat vocalizations from feature vectors or WAV recordings"
)]
struct Cli {
    /// JSON configuration file (defaults are used when absent or invalid)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(long, global = true)]
    verbose: bool,
    /// Override directory containing fixture assets (defaults to ./fixtures)
    #[arg(long, global = true)]
    fixtures_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interpret a JSON acoustic feature vector
    Interpret {
        #[arg(long)]
        features: PathBuf,
        #[arg(long)]
        visual: Option<PathBuf>,
        /// Also run the ensemble and emit the combined analysis
        #[arg(long)]
        ml: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Extract features from a WAV recording and interpret them
    Analyze {
        #[arg(long)]
        wav: PathBuf,
        #[arg(long)]
        visual: Option<PathBuf>,
        #[arg(long)]
        ml: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Analyze every clip in a directory concurrently
    Batch {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        ml: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run a fixture and compare against its expectations
    Verify {
        #[arg(long)]
        fixture: String,
        #[arg(long)]
        expect: Option<PathBuf>,
    },
    /// List available fixtures on disk
    DumpFixtures,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // A second init (e.g. in-process tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::default(),
    };
    let catalog = cli
        .fixtures_dir
        .map(FixtureCatalog::new)
        .unwrap_or_default();

    match cli.command {
        Commands::Interpret {
            features,
            visual,
            ml,
            output,
        } => run_interpret(&config, &features, visual.as_deref(), ml, output),
        Commands::Analyze {
            wav,
            visual,
            ml,
            output,
        } => run_analyze(&config, &wav, visual.as_deref(), ml, output),
        Commands::Batch { dir, ml, output } => run_batch_dir(config, &dir, ml, output),
        Commands::Verify { fixture, expect } => run_verify(&config, &catalog, &fixture, expect),
        Commands::DumpFixtures => run_dump(&catalog),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

fn load_visual(path: Option<&Path>) -> Result<Option<VisualFeatures>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let visual: VisualFeatures = read_json(path)?;
    FeatureValidator::validate_visual(&visual)
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(Some(visual))
}

fn run_interpret(
    config: &AppConfig,
    features_path: &Path,
    visual_path: Option<&Path>,
    with_ml: bool,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let features: AcousticFeatures = read_json(features_path)?;
    FeatureValidator::validate(&features)
        .with_context(|| format!("validating {}", features_path.display()))?;
    let visual = load_visual(visual_path)?;

    let interpretation = interpret(&features, visual.as_ref());
    if with_ml {
        let adapter = EnsembleAdapter::from_config(&config.ensemble);
        let ml = adapter.analyze(&MlFeatureMap::from_features(&features, visual.as_ref()));
        emit_json(&CombinedAnalysis::build(Some(interpretation), Some(ml)), output_path)?;
    } else {
        emit_json(&interpretation, output_path)?;
    }
    Ok(ExitCode::from(0))
}

fn run_analyze(
    config: &AppConfig,
    wav_path: &Path,
    visual_path: Option<&Path>,
    with_ml: bool,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let visual = load_visual(visual_path)?;
    let analysis = extract::analyze_wav(wav_path, config, visual.as_ref())
        .with_context(|| format!("analyzing {}", wav_path.display()))?;
    tracing::info!(
        "[Analyze] {} candidate segment(s) in {}",
        analysis.candidates,
        wav_path.display()
    );

    if with_ml {
        let mut ml_features = analysis.clip_features.ml_features.clone();
        if let Some(visual) = &visual {
            ml_features.merge(&MlFeatureMap::from_visual(visual));
        }
        let adapter = EnsembleAdapter::from_config(&config.ensemble);
        let ml = adapter.analyze(&ml_features);
        emit_json(
            &CombinedAnalysis::build(Some(analysis.interpretation), Some(ml)),
            output_path,
        )?;
    } else {
        emit_json(&analysis.interpretation, output_path)?;
    }
    Ok(ExitCode::from(0))
}

#[derive(Serialize)]
struct BatchReport {
    summary: BatchSummary,
    outcomes: Vec<BatchOutcome>,
}

fn run_batch_dir(
    config: AppConfig,
    dir: &Path,
    with_ml: bool,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let jobs = collect_jobs(dir)?;
    let ensemble = with_ml.then(|| Arc::new(EnsembleAdapter::from_config(&config.ensemble)));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;
    let (outcomes, summary) = runtime.block_on(run_batch(jobs, Arc::new(config), ensemble));

    emit_json(&BatchReport { summary, outcomes }, output_path)?;
    Ok(ExitCode::from(0))
}

fn run_verify(
    config: &AppConfig,
    catalog: &FixtureCatalog,
    fixture: &str,
    override_expect: Option<PathBuf>,
) -> Result<ExitCode> {
    let processor = FixtureProcessor::new(config);
    let data = catalog.load(fixture, override_expect)?;
    let run = processor
        .run(&data)
        .with_context(|| format!("processing fixture {}", fixture))?;

    emit_json(&run, None)?;

    match data.expectations {
        Some(expectations) => {
            match expectations.verify(&run.interpretation, run.ml_analysis.as_ref()) {
                Ok(()) => Ok(ExitCode::from(0)),
                Err(diff) => {
                    emit_diff(&diff)?;
                    Ok(ExitCode::from(2))
                }
            }
        }
        None => {
            log::warn!("Fixture {} has no expectations; nothing verified", fixture);
            Ok(ExitCode::from(0))
        }
    }
}

fn run_dump(catalog: &FixtureCatalog) -> Result<ExitCode> {
    let fixtures = catalog.discover()?;
    if fixtures.is_empty() {
        println!("No fixtures found under {}", catalog.root().display());
        return Ok(ExitCode::from(0));
    }

    for metadata in fixtures {
        if let Some(expect) = metadata.expect_path {
            println!("{} -> {}", metadata.name, expect.display());
        } else {
            println!("{}", metadata.name);
        }
    }
    Ok(ExitCode::from(0))
}

fn emit_json<T: Serialize>(value: &T, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }
    Ok(())
}

fn emit_diff(diff: &ExpectationDiff) -> Result<()> {
    let json = serde_json::to_string_pretty(&diff.to_json())?;
    eprintln!("{json}");
    Ok(())
}
