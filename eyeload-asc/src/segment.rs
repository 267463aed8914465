use eyeload_core::Onset;
use eyeload_timing::{RecorderClock, SampleClock};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What to do with an event whose onset lies in more than one trial window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Every containing trial gets a copy
    #[default]
    AllContaining,
    /// Only the earliest containing trial in file order
    FirstContaining,
}

/// Closed sample interval of one trial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialWindow {
    pub start: i64,
    pub end: i64,
}

impl TrialWindow {
    pub fn contains(&self, sample: i64) -> bool {
        self.start <= sample && sample <= self.end
    }

    pub fn duration_samples(&self) -> i64 {
        self.end - self.start
    }

    pub fn rebase(&self, clock: &RecorderClock) -> Self {
        Self {
            start: clock.rebase(self.start),
            end: clock.rebase(self.end),
        }
    }
}

/// Number of windows (in start order) that begin inside an earlier window
pub fn overlapping_windows(windows: &[TrialWindow]) -> usize {
    let mut sorted = windows.to_vec();
    sorted.sort_by_key(|w| w.start);
    let mut furthest_end: Option<i64> = None;
    let mut overlaps = 0;
    for window in &sorted {
        if furthest_end.is_some_and(|end| window.start <= end) {
            overlaps += 1;
        }
        furthest_end = Some(furthest_end.map_or(window.end, |end| end.max(window.end)));
    }
    overlaps
}

/// Buckets `events` by the trial window containing their onset.
///
/// Returns one bucket per window, in window order. Events outside every
/// window are dropped.
pub fn segment<E>(windows: &[TrialWindow], events: &[E], policy: OverlapPolicy) -> Vec<Vec<E>>
where
    E: Onset + Clone,
{
    let mut buckets: Vec<Vec<E>> = vec![Vec::new(); windows.len()];
    let mut assigned = 0usize;

    for event in events {
        let onset = event.onset();
        let mut hit = false;
        for (window, bucket) in windows.iter().zip(buckets.iter_mut()) {
            if window.contains(onset) {
                bucket.push(event.clone());
                hit = true;
                if policy == OverlapPolicy::FirstContaining {
                    break;
                }
            }
        }
        if hit {
            assigned += 1;
        }
    }

    let dropped = events.len() - assigned;
    if dropped > 0 {
        debug!(dropped, total = events.len(), "events outside every trial window");
    }
    buckets
}

/// Warns once per session when trial windows overlap
pub(crate) fn check_overlap(windows: &[TrialWindow], policy: OverlapPolicy) {
    let overlaps = overlapping_windows(windows);
    if overlaps > 0 {
        warn!(overlaps, ?policy, "trial windows overlap");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyeload_core::GazeEvent;
    use proptest::prelude::*;

    fn fix(onset: i64) -> GazeEvent {
        GazeEvent {
            onset,
            offset: onset + 10,
        }
    }

    #[test]
    fn events_land_in_their_window() {
        let windows = [
            TrialWindow { start: 100, end: 200 },
            TrialWindow { start: 300, end: 400 },
        ];
        let events = [fix(50), fix(100), fix(200), fix(250), fix(399), fix(401)];
        let buckets = segment(&windows, &events, OverlapPolicy::AllContaining);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0], vec![fix(100), fix(200)]);
        assert_eq!(buckets[1], vec![fix(399)]);
    }

    #[test]
    fn trials_without_events_get_empty_buckets() {
        let windows = [TrialWindow { start: 0, end: 10 }];
        let buckets = segment::<GazeEvent>(&windows, &[], OverlapPolicy::AllContaining);
        assert_eq!(buckets, vec![Vec::<GazeEvent>::new()]);
    }

    #[test]
    fn overlap_policy_decides_shared_events() {
        let windows = [
            TrialWindow { start: 0, end: 100 },
            TrialWindow { start: 50, end: 150 },
        ];
        assert_eq!(overlapping_windows(&windows), 1);

        let events = [fix(75)];
        let all = segment(&windows, &events, OverlapPolicy::AllContaining);
        assert_eq!(all, vec![vec![fix(75)], vec![fix(75)]]);

        let first = segment(&windows, &events, OverlapPolicy::FirstContaining);
        assert_eq!(first, vec![vec![fix(75)], vec![]]);
    }

    #[test]
    fn touching_windows_overlap_on_the_shared_sample() {
        let windows = [
            TrialWindow { start: 0, end: 10 },
            TrialWindow { start: 11, end: 20 },
        ];
        assert_eq!(overlapping_windows(&windows), 0);
        let windows = [
            TrialWindow { start: 0, end: 10 },
            TrialWindow { start: 10, end: 20 },
        ];
        assert_eq!(overlapping_windows(&windows), 1);
    }

    #[test]
    fn long_window_overlaps_every_later_window_it_spans() {
        let windows = [
            TrialWindow { start: 0, end: 100 },
            TrialWindow { start: 10, end: 20 },
            TrialWindow { start: 30, end: 40 },
            TrialWindow { start: 101, end: 110 },
        ];
        assert_eq!(overlapping_windows(&windows), 2);
    }

    proptest! {
        #[test]
        fn assigned_events_lie_inside_their_window(
            starts in proptest::collection::vec(0i64..10_000, 1..20),
            onsets in proptest::collection::vec(-100i64..12_000, 0..200),
        ) {
            let mut starts = starts;
            starts.sort_unstable();
            starts.dedup();
            let windows: Vec<TrialWindow> = starts
                .windows(2)
                .map(|w| TrialWindow { start: w[0], end: w[1] - 1 })
                .collect();
            let events: Vec<GazeEvent> = onsets.into_iter().map(fix).collect();

            let buckets = segment(&windows, &events, OverlapPolicy::AllContaining);
            prop_assert_eq!(buckets.len(), windows.len());
            for (window, bucket) in windows.iter().zip(&buckets) {
                for event in bucket {
                    prop_assert!(window.start <= event.onset && event.onset <= window.end);
                }
            }
            let assigned: usize = buckets.iter().map(Vec::len).sum();
            let contained = events
                .iter()
                .filter(|e| windows.iter().any(|w| w.contains(e.onset)))
                .count();
            prop_assert_eq!(assigned, contained);
        }
    }
}
