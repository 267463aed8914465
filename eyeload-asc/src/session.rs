use std::fmt;
use std::path::Path;
use std::time::Duration;

use eyeload_core::{
    EyeloadError, GazeEvent, Result, SampleTable, SessionParameters, TargetEvent, TrialTable,
};
use eyeload_timing::{RecorderClock, SampleClock};
use tracing::{debug, info};

use crate::assemble::{TrialEvents, assemble_trials, drop_recalibration};
use crate::classify::classify;
use crate::config::ParserConfig;
use crate::events::{extract_fixations, extract_saccades, extract_target_events};
use crate::header::extract_session_parameters;
use crate::samples::{build_sample_table, parse_samples};
use crate::segment::{TrialWindow, check_overlap, segment};
use crate::trial::{TrialVariables, extract_trial_windows};

/// Everything derived from one session file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSession {
    pub params: SessionParameters,
    pub clock: RecorderClock,
    pub samples: SampleTable,
    pub trials: TrialTable,
    pub recalibration_dropped: usize,
}

/// Parses the lines of one recorder export into the sample and trial tables
pub fn parse<'a, I>(lines: I, config: &ParserConfig) -> Result<ParsedSession>
where
    I: IntoIterator<Item = &'a str>,
{
    config.validate()?;
    let markers = &config.markers;
    let records = classify(lines, markers);
    debug!(records = records.len(), "classified records");

    let params = extract_session_parameters(&records)?;
    let windows = extract_trial_windows(&records)?;
    let vars = TrialVariables::extract(&records, markers)?;
    let raw_targets = extract_target_events(&records, markers)?;
    let fixations = extract_fixations(&records)?;
    let saccades = extract_saccades(&records)?;
    let raw_samples = parse_samples(&records, markers)?;

    let clock = RecorderClock::with_origin(
        params.sample_rate_hz(),
        config.sample_origin,
        raw_samples.iter().map(|s| s.sample).min(),
    );

    let windows: Vec<TrialWindow> = windows.iter().map(|w| w.rebase(&clock)).collect();
    let targets: Vec<TargetEvent> = raw_targets
        .iter()
        .map(|raw| TargetEvent {
            sample: clock.rebase(raw.sample),
            ..raw.normalize(&params)
        })
        .collect();
    let fixations = rebase_events(&fixations, &clock);
    let saccades = rebase_events(&saccades, &clock);

    let policy = config.overlap_policy;
    check_overlap(&windows, policy);
    let events = TrialEvents {
        targets: segment(&windows, &targets, policy),
        fixations: segment(&windows, &fixations, policy),
        saccades: segment(&windows, &saccades, policy),
    };

    let trials = assemble_trials(&windows, vars, events)?;
    let (trials, recalibration_dropped) = if config.drop_recalibration {
        drop_recalibration(trials)
    } else {
        (trials, 0)
    };

    let samples = build_sample_table(&raw_samples, &params, &clock)?;

    Ok(ParsedSession {
        params,
        clock,
        samples,
        trials,
        recalibration_dropped,
    })
}

pub fn parse_str(text: &str, config: &ParserConfig) -> Result<ParsedSession> {
    parse(text.lines(), config)
}

/// Reads the whole file up front, then parses it
pub fn load_file(path: impl AsRef<Path>, config: &ParserConfig) -> Result<ParsedSession> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| EyeloadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = text.len(), "loaded session file");
    parse_str(&text, config)
}

fn rebase_events(events: &[GazeEvent], clock: &RecorderClock) -> Vec<GazeEvent> {
    events
        .iter()
        .map(|e| GazeEvent {
            onset: clock.rebase(e.onset),
            offset: clock.rebase(e.offset),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub trials: usize,
    pub recalibration_dropped: usize,
    pub fixations: usize,
    pub saccades: usize,
    pub target_events: usize,
    pub sample_rows: usize,
    pub missing_rows: usize,
    pub first_sample: Option<i64>,
    pub last_sample: Option<i64>,
    pub duration: Duration,
}

impl ParsedSession {
    pub fn summary(&self) -> SessionSummary {
        let first_sample = self.samples.first_sample();
        let last_sample = self.samples.last_sample();
        let duration = match (first_sample, last_sample) {
            (Some(first), Some(last)) => self.clock.elapsed(first, last),
            _ => Duration::ZERO,
        };
        SessionSummary {
            trials: self.trials.len(),
            recalibration_dropped: self.recalibration_dropped,
            fixations: self.trials.iter().map(|t| t.fixations.len()).sum(),
            saccades: self.trials.iter().map(|t| t.saccades.len()).sum(),
            target_events: self.trials.iter().map(|t| t.target_events.len()).sum(),
            sample_rows: self.samples.len(),
            missing_rows: self.samples.missing_count(),
            first_sample,
            last_sample,
            duration,
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Trials: {} kept, {} recalibration dropped",
            self.trials, self.recalibration_dropped
        )?;
        writeln!(
            f,
            "Events: {} fixations, {} saccades, {} target changes",
            self.fixations, self.saccades, self.target_events
        )?;
        match (self.first_sample, self.last_sample) {
            (Some(first), Some(last)) => write!(
                f,
                "Samples: {} rows [{first}, {last}], {} missing, {:.3} s",
                self.sample_rows,
                self.missing_rows,
                self.duration.as_secs_f64()
            ),
            _ => write!(f, "Samples: none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyeload_timing::SampleOrigin;

    const SESSION: &str = "\
** CONVERTED FROM session.edf
MSG\t0 DISPLAY_COORDS 0 0 1024 768
SAMPLES\tGAZE\tRIGHT\tRATE\t1000.00\tTRACKING\tCR
MSG\t90 TRIALID 1
MSG\t91 !V TRIAL_VAR block 1
MSG\t91 !V TRIAL_VAR Trial_Recycled_ False
MSG\t91 !V TRIAL_VAR Recal False
MSG\t91 !V TRIAL_VAR targpos 2
MSG\t91 !V TRIAL_VAR steppos 0
START\t100 \tRIGHT\tSAMPLES\tEVENTS
100\t  512.0\t  384.0\t  800.0\t...
MSG\t101 !V TARGET_POS TARG1 (1024,768) 1 0
101\t  512.0\t  384.0\t  800.0\t...
END\t101 \tSAMPLES\tEVENTS\tRES\t38.0\t38.0
";

    #[test]
    fn single_trial_session() {
        let session = parse_str(SESSION, &ParserConfig::default()).unwrap();

        assert_eq!(session.params.display_width(), 1024.0);
        assert_eq!(session.samples.len(), 2);
        let row = session.samples.get(100).unwrap();
        assert_eq!((row.time_ms, row.x_norm, row.y_norm, row.pupil_raw), (100.0, 0.0, 0.0, 800.0));

        assert_eq!(session.trials.len(), 1);
        let trial = session.trials.get(0).unwrap();
        assert_eq!((trial.start_sample, trial.end_sample, trial.duration_samples), (100, 101, 1));
        assert!(!trial.recalibration);
        assert_eq!(
            trial.target_events,
            vec![TargetEvent {
                sample: 101,
                position: [1.0, 1.0]
            }]
        );
    }

    #[test]
    fn session_relative_shifts_trials_and_samples_together() {
        let config = ParserConfig {
            sample_origin: SampleOrigin::SessionRelative,
            ..ParserConfig::default()
        };
        let session = parse_str(SESSION, &config).unwrap();
        assert_eq!(session.samples.first_sample(), Some(0));
        assert_eq!(session.samples.get(1).unwrap().time_ms, 1.0);

        let trial = session.trials.get(0).unwrap();
        assert_eq!((trial.start_sample, trial.end_sample), (0, 1));
        assert_eq!(trial.target_events[0].sample, 1);
    }

    #[test]
    fn summary_reports_counts() {
        let summary = parse_str(SESSION, &ParserConfig::default())
            .unwrap()
            .summary();
        assert_eq!(summary.trials, 1);
        assert_eq!(summary.target_events, 1);
        assert_eq!(summary.sample_rows, 2);
        assert_eq!(summary.missing_rows, 0);
        assert_eq!(summary.duration, Duration::from_millis(1));
        assert!(summary.to_string().contains("Samples: 2 rows [100, 101]"));
    }

    #[test]
    fn nonexistent_file_is_an_io_error() {
        let err = load_file("/definitely/not/here.asc", &ParserConfig::default()).unwrap_err();
        assert!(matches!(err, EyeloadError::Io { .. }));
    }
}
