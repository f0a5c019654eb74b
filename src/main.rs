//! SAR Triage - Main Entry Point
//!
//! Demo/orchestration CLI: dataset → train → assess/scenarios.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use sar_triage::api::commands;
use sar_triage::constants;
use sar_triage::logic::dataset::DEFAULT_ROWS_PER_CELL;
use sar_triage::logic::explain::{ExplanationRenderer, JsonRenderer, TextRenderer};
use sar_triage::logic::model::DEFAULT_FOLDS;
use sar_triage::{EnvironmentRisk, TriageConfig, TriageEngine};

#[derive(Parser, Debug)]
#[command(name = "sar-triage", version, about = "Victim-presence fusion and rescue urgency triage")]
struct Cli {
    /// JSON configuration file (environment variables still override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the synthesized training dataset
    Dataset {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = DEFAULT_ROWS_PER_CELL)]
        rows_per_cell: usize,
    },
    /// Retrain from the configured dataset and persist the model
    Train,
    /// Cross-validate on the configured dataset
    Evaluate {
        #[arg(long, default_value_t = DEFAULT_FOLDS)]
        folds: usize,
    },
    /// Assess one reading (JSON file) under an environmental risk
    Assess {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        risk: EnvironmentRisk,
        /// Print the assessment as JSON, explanation as a factor array
        #[arg(long)]
        json: bool,
    },
    /// Run the built-in field scenarios
    Scenarios,
    /// Print the confidence × risk decision table
    Table,
    /// Print configuration, model status and feature layout
    Info,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<TriageConfig> {
    let config = match path {
        Some(path) => TriageConfig::load(path)?,
        None => TriageConfig::from_env()?,
    };
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Dataset generation needs no engine
    if let Command::Dataset { out, rows_per_cell } = &cli.command {
        let summary = commands::write_dataset(out, *rows_per_cell)
            .with_context(|| format!("writing dataset to {}", out.display()))?;
        println!(
            "Wrote {} rows ({} positive, {} negative) to {}",
            summary.rows,
            summary.positives,
            summary.negatives,
            out.display()
        );
        return Ok(());
    }

    let config = load_config(cli.config.as_ref())?;

    if let Command::Evaluate { folds } = &cli.command {
        let report = commands::evaluate_model(&config, *folds).context("evaluating model")?;
        println!("Cross-validation ({} folds)", report.folds);
        println!("  accuracy  {:.4} ± {:.4}", report.cv_mean, report.cv_std);
        println!("  precision {:.4}", report.precision);
        println!("  recall    {:.4}", report.recall);
        println!("  f1        {:.4}", report.f1_score);
        let [[tn, fp], [fn_, tp]] = report.confusion_matrix;
        println!("  confusion [[{}, {}], [{}, {}]]", tn, fp, fn_, tp);
        return Ok(());
    }

    let engine = TriageEngine::new(&config)?;

    match cli.command {
        Command::Train => {
            let status = commands::train_model(&engine).context("training model")?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Assess { input, risk, json } => {
            let renderer: &dyn ExplanationRenderer = if json { &JsonRenderer } else { &TextRenderer };
            let assessment = commands::assess_file(&engine, &input, risk, renderer)
                .with_context(|| format!("assessing {}", input.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                let state = &assessment.state;
                let result = &assessment.result;
                println!(
                    "Confidence: {} (p={:.3})  Responsiveness: {}  Vitals: {}",
                    state.confidence_level,
                    state.probability,
                    state.responsiveness.as_str(),
                    state.vital_signs.as_str()
                );
                for note in &state.observations {
                    println!("  - {}", note);
                }
                println!("Urgency: {} (risk {})", result.urgency_level, result.environment_risk);
                println!("{}", result.explanation);
            }
        }
        Command::Scenarios => {
            let outcomes = commands::run_scenarios(&engine).context("running scenarios")?;
            let mut failed = 0;
            for outcome in &outcomes {
                let mark = if outcome.matches() { "ok" } else { "MISMATCH" };
                if !outcome.matches() {
                    failed += 1;
                }
                println!(
                    "[{:<8}] {:<50} risk {:<6} confidence {:<8} urgency {:<8} (expected {})",
                    mark,
                    outcome.name,
                    outcome.risk.as_str(),
                    outcome.assessment.state.confidence_level.as_str(),
                    outcome.assessment.result.urgency_level.as_str(),
                    outcome.expected
                );
            }
            if failed > 0 {
                anyhow::bail!("{} of {} scenarios did not match", failed, outcomes.len());
            }
        }
        Command::Table => {
            print!("{}", commands::decision_table(&engine));
        }
        Command::Info => {
            let info = commands::engine_info(&config, &engine)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Dataset { .. } | Command::Evaluate { .. } => {}
    }

    Ok(())
}
