use eyeload_core::{EyeloadError, Result};
use tracing::debug;

use crate::classify::{Record, RecordKind, TrialVar, of_kind};
use crate::config::RecordMarkers;
use crate::fields::{last_token, malformed, parse_field, tab_field};
use crate::segment::TrialWindow;

/// Pairs START/END records in file order into trial windows
pub fn extract_trial_windows(records: &[Record<'_>]) -> Result<Vec<TrialWindow>> {
    let starts = boundary_samples(records, RecordKind::TrialStart)?;
    let ends = boundary_samples(records, RecordKind::TrialEnd)?;
    if starts.len() != ends.len() {
        return Err(EyeloadError::TrialBoundaryMismatch {
            starts: starts.len(),
            ends: ends.len(),
        });
    }

    let windows = starts
        .into_iter()
        .zip(ends)
        .map(|((start, _), (end, end_record))| {
            if end < start {
                Err(malformed(
                    end_record,
                    format!("trial ends at sample {end} before its start at {start}"),
                ))
            } else {
                Ok(TrialWindow { start, end })
            }
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(trials = windows.len(), "trial windows");
    Ok(windows)
}

fn boundary_samples<'r, 'a>(
    records: &'r [Record<'a>],
    kind: RecordKind,
) -> Result<Vec<(i64, &'r Record<'a>)>> {
    of_kind(records, kind)
        .map(|r| {
            let sample: i64 = parse_field(r, tab_field(r.text, 1), "sample")?;
            Ok::<_, EyeloadError>((sample, r))
        })
        .collect()
}

/// Per-trial scalar variables, one entry per declaration line in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TrialVariables {
    pub ids: Vec<i64>,
    pub blocks: Vec<i64>,
    pub recycled: Vec<bool>,
    pub recalibration: Vec<bool>,
    pub target_pos: Vec<i64>,
    pub step_pos: Vec<i64>,
}

impl TrialVariables {
    pub fn extract(records: &[Record<'_>], markers: &RecordMarkers) -> Result<Self> {
        let mut vars = Self::default();
        for record in records {
            match record.kind {
                RecordKind::TrialId => vars.ids.push(trailing_int(record, "trial id")?),
                RecordKind::TrialVar(var) => match var {
                    TrialVar::Block => vars.blocks.push(trailing_int(record, var.name())?),
                    TrialVar::TargetPos => vars.target_pos.push(trailing_int(record, var.name())?),
                    TrialVar::StepPos => vars.step_pos.push(trailing_int(record, var.name())?),
                    TrialVar::Recycled => vars.recycled.push(trailing_flag(record, markers)),
                    TrialVar::Recalibration => {
                        vars.recalibration.push(trailing_flag(record, markers))
                    }
                },
                _ => {}
            }
        }
        Ok(vars)
    }

    /// Every variable must be declared exactly once per trial
    pub fn check_count(&self, trials: usize) -> Result<()> {
        let counts = [
            ("trial id", self.ids.len()),
            (TrialVar::Block.name(), self.blocks.len()),
            (TrialVar::Recycled.name(), self.recycled.len()),
            (TrialVar::Recalibration.name(), self.recalibration.len()),
            (TrialVar::TargetPos.name(), self.target_pos.len()),
            (TrialVar::StepPos.name(), self.step_pos.len()),
        ];
        for (variable, found) in counts {
            if found != trials {
                return Err(EyeloadError::TrialVariableMismatch {
                    variable,
                    found,
                    expected: trials,
                });
            }
        }
        Ok(())
    }
}

fn trailing_int(record: &Record<'_>, what: &str) -> Result<i64> {
    parse_field(record, last_token(record.text), what)
}

fn trailing_flag(record: &Record<'_>, markers: &RecordMarkers) -> bool {
    last_token(record.text) == Some(markers.true_literal.as_str())
}
