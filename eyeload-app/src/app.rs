use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use eyeload_asc::{ParsedSession, ParserConfig, load_file};
use eyeload_timing::SampleOrigin;
use rayon::prelude::*;
use tracing::error;

use crate::tracing_config;

#[derive(Parser, Debug)]
#[command(name = "eyeload")]
#[command(about = "Restructure eye-tracker text exports into sample and trial tables", long_about = None)]
struct Cli {
    /// Session export files (.asc)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Parser configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep calibration-check trials in the trial table
    #[arg(long)]
    keep_recalibration: bool,

    /// Number samples from the first recorded sample instead of the recorder clock
    #[arg(long)]
    relative_samples: bool,

    /// List every kept trial
    #[arg(long)]
    trials: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

pub struct App {
    files: Vec<PathBuf>,
    config: ParserConfig,
    list_trials: bool,
}

impl App {
    pub fn new() -> Result<Self> {
        let cli = Cli::parse();
        tracing_config::init(cli.verbose);

        let mut config = match &cli.config {
            Some(path) => ParserConfig::from_json_file(path)
                .with_context(|| format!("loading parser config {}", path.display()))?,
            None => ParserConfig::default(),
        };
        if cli.keep_recalibration {
            config.drop_recalibration = false;
        }
        if cli.relative_samples {
            config.sample_origin = SampleOrigin::SessionRelative;
        }

        Ok(Self {
            files: cli.files,
            config,
            list_trials: cli.trials,
        })
    }

    pub fn run(self) -> Result<()> {
        // one file per rayon task
        let results: Vec<_> = self
            .files
            .par_iter()
            .map(|path| (path, load_file(path, &self.config)))
            .collect();

        let mut failed = 0usize;
        for (path, result) in &results {
            match result {
                Ok(session) => self.report(path, session),
                Err(err) => {
                    failed += 1;
                    error!(path = %path.display(), %err, "failed to parse session");
                }
            }
        }

        if failed > 0 {
            bail!("{failed} of {} session files failed to parse", results.len());
        }
        Ok(())
    }

    fn report(&self, path: &Path, session: &ParsedSession) {
        let params = &session.params;
        println!("=== {} ===", path.display());
        println!(
            "Display: {}×{}, {:.1} Hz",
            params.display_width(),
            params.display_height(),
            params.sample_rate_hz()
        );
        println!("{}", session.summary());

        if self.list_trials {
            for trial in &session.trials {
                println!(
                    "  trial {:>4} block {:>2} [{}, {}] {:>6} samples: {} fixations, {} saccades, {} target changes{}",
                    trial.trial_id,
                    trial.block_no,
                    trial.start_sample,
                    trial.end_sample,
                    trial.duration_samples,
                    trial.fixations.len(),
                    trial.saccades.len(),
                    trial.target_events.len(),
                    if trial.recalibration { " (recal)" } else { "" },
                );
            }
        }
        println!();
    }
}
