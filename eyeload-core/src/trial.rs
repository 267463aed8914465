use serde::{Deserialize, Serialize};

use crate::session::SessionParameters;

/// Anything stamped with the sample at which it begins
pub trait Onset {
    fn onset(&self) -> i64;
}

/// Fixation or saccade as classified by the recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazeEvent {
    pub onset: i64,
    pub offset: i64,
}

impl GazeEvent {
    pub fn duration_samples(&self) -> i64 {
        self.offset - self.onset
    }
}

impl Onset for GazeEvent {
    fn onset(&self) -> i64 {
        self.onset
    }
}

/// Target position change; `P` is raw pixels before normalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetEvent<P = [f64; 2]> {
    pub sample: i64,
    pub position: P,
}

pub type RawTargetEvent = TargetEvent<[i64; 2]>;

impl RawTargetEvent {
    pub fn normalize(&self, params: &SessionParameters) -> TargetEvent {
        let [x, y] = self.position;
        TargetEvent {
            sample: self.sample,
            position: params.normalize_point([x as f64, y as f64]),
        }
    }
}

impl<P> Onset for TargetEvent<P> {
    fn onset(&self) -> i64 {
        self.sample
    }
}

/// One experimental interval with its scalar variables and the events it contains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub trial_id: i64,
    pub block_no: i64,
    pub recycled: bool,
    pub recalibration: bool,
    pub target_pos_code: i64,
    pub step_pos_code: i64,
    pub start_sample: i64,
    pub end_sample: i64,
    pub duration_samples: i64,
    pub target_events: Vec<TargetEvent>,
    pub fixations: Vec<GazeEvent>,
    pub saccades: Vec<GazeEvent>,
}

/// Trials in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialTable {
    trials: Vec<Trial>,
}

impl TrialTable {
    pub fn new(trials: Vec<Trial>) -> Self {
        Self { trials }
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Trial> {
        self.trials.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trial> {
        self.trials.iter()
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn into_inner(self) -> Vec<Trial> {
        self.trials
    }

    pub fn recalibration_count(&self) -> usize {
        self.trials.iter().filter(|t| t.recalibration).count()
    }

    /// Drops calibration-check trials, keeping file order
    pub fn without_recalibration(mut self) -> Self {
        self.trials.retain(|t| !t.recalibration);
        self
    }
}

impl<'a> IntoIterator for &'a TrialTable {
    type Item = &'a Trial;
    type IntoIter = std::slice::Iter<'a, Trial>;

    fn into_iter(self) -> Self::IntoIter {
        self.trials.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(id: i64, start: i64, end: i64, recalibration: bool) -> Trial {
        Trial {
            trial_id: id,
            block_no: 1,
            recycled: false,
            recalibration,
            target_pos_code: 0,
            step_pos_code: 0,
            start_sample: start,
            end_sample: end,
            duration_samples: end - start,
            target_events: Vec::new(),
            fixations: Vec::new(),
            saccades: Vec::new(),
        }
    }

    #[test]
    fn recalibration_trials_are_removed_in_order() {
        let table = TrialTable::new(vec![
            trial(1, 0, 10, false),
            trial(2, 20, 30, true),
            trial(3, 40, 50, false),
        ]);
        assert_eq!(table.recalibration_count(), 1);

        let kept = table.without_recalibration();
        let ids: Vec<i64> = kept.iter().map(|t| t.trial_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn raw_target_positions_normalize_per_axis() {
        let params = SessionParameters::new(1024.0, 768.0, 500.0);
        let raw = RawTargetEvent {
            sample: 42,
            position: [1024, 0],
        };
        let norm = raw.normalize(&params);
        assert_eq!(norm.sample, 42);
        assert_eq!(norm.position, [1.0, -1.0]);
        assert_eq!(norm.onset(), 42);
    }
}
