use eyeload_core::{GazeEvent, Result, TargetEvent, Trial, TrialTable};
use tracing::info;

use crate::segment::TrialWindow;
use crate::trial::TrialVariables;

/// Segmented events for every trial, bucketed in window order
#[derive(Debug, Clone, Default)]
pub(crate) struct TrialEvents {
    pub targets: Vec<Vec<TargetEvent>>,
    pub fixations: Vec<Vec<GazeEvent>>,
    pub saccades: Vec<Vec<GazeEvent>>,
}

/// Joins trial scalars and segmented events into one row per trial, in file order
pub(crate) fn assemble_trials(
    windows: &[TrialWindow],
    vars: TrialVariables,
    events: TrialEvents,
) -> Result<TrialTable> {
    vars.check_count(windows.len())?;

    let TrialVariables {
        ids,
        blocks,
        recycled,
        recalibration,
        target_pos,
        step_pos,
    } = vars;
    let scalars = ids
        .into_iter()
        .zip(blocks)
        .zip(recycled.into_iter().zip(recalibration))
        .zip(target_pos.into_iter().zip(step_pos));
    let buckets = events
        .targets
        .into_iter()
        .zip(events.fixations)
        .zip(events.saccades);

    let trials = windows
        .iter()
        .zip(scalars)
        .zip(buckets)
        .map(|((window, scalars), buckets)| {
            let (((trial_id, block_no), (recycled, recalibration)), codes) = scalars;
            let (target_pos_code, step_pos_code) = codes;
            let ((target_events, fixations), saccades) = buckets;
            Trial {
                trial_id,
                block_no,
                recycled,
                recalibration,
                target_pos_code,
                step_pos_code,
                start_sample: window.start,
                end_sample: window.end,
                duration_samples: window.duration_samples(),
                target_events,
                fixations,
                saccades,
            }
        })
        .collect();

    Ok(TrialTable::new(trials))
}

/// Removes calibration-check trials. Returns the kept table and how many were dropped.
pub fn drop_recalibration(table: TrialTable) -> (TrialTable, usize) {
    let before = table.len();
    info!(trials = before, "trials before recalibration rejection");
    let kept = table.without_recalibration();
    info!(trials = kept.len(), "trials after recalibration rejection");
    let dropped = before - kept.len();
    (kept, dropped)
}
