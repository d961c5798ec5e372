mod args;
mod config;
mod report;
mod session_csv;

use anyhow::{Context as _, Result};
use args::{AnalyzeCli, Cli, ModeSelect};
use clap::Parser;
use hop_analysis_core::analyze_session;
use log::{LevelFilter, info, warn};
use std::fs::File;
use std::io::BufWriter;

fn analyze(args: AnalyzeCli) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;

    let input = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let channels = session_csv::read_session(input, args.time_scale, &args.channel_names)
        .with_context(|| format!("failed to load session {}", args.input.display()))?;

    let analysis = analyze_session(&channels, &config)?;
    let skipped = analysis.total_skipped_updates();
    if skipped > 0 {
        warn!("{skipped} Kalman updates skipped due to ill-conditioning");
    }
    print!("{}", report::summary(&analysis));

    if let Some(output) = &args.output {
        let file = File::create(output)
            .with_context(|| format!("failed to create {}", output.display()))?;
        report::write_json(&analysis, BufWriter::new(file))?;
        info!("report written to {}", output.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    env_logger::builder()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    match args.mode {
        ModeSelect::Analyze(args) => analyze(args),
        ModeSelect::DefaultConfig => {
            print!("{}", config::default_config_toml()?);
            Ok(())
        }
    }
}
