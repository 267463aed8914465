use eyeload_core::{EyeloadError, Result, SampleRecord, SampleTable, SessionParameters};
use eyeload_timing::{RecorderClock, SampleClock};
use tracing::{debug, warn};

use crate::classify::{Record, RecordKind, of_kind};
use crate::config::RecordMarkers;
use crate::fields::malformed;

/// One telemetry line before normalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub sample: i64,
    pub x: f64,
    pub y: f64,
    pub pupil: f64,
}

/// Widest stamp range the gap fill will materialize: four hours at 2 kHz
pub const MAX_SAMPLE_SPAN: i64 = 4 * 60 * 60 * 2_000;

pub fn parse_samples(records: &[Record<'_>], markers: &RecordMarkers) -> Result<Vec<RawSample>> {
    let lines: Vec<&Record<'_>> = of_kind(records, RecordKind::Sample).collect();
    let samples = lines
        .iter()
        .map(|r| parse_sample(r, markers))
        .collect::<Result<Vec<_>>>()?;

    if let Some(first) = samples.iter().map(|s| s.sample).min() {
        let outlier = lines
            .iter()
            .zip(&samples)
            .find(|(_, s)| s.sample - first > MAX_SAMPLE_SPAN);
        if let Some((record, s)) = outlier {
            return Err(malformed(
                record,
                format!(
                    "sample {} is more than {MAX_SAMPLE_SPAN} samples after the first sample {first}",
                    s.sample
                ),
            ));
        }
    }

    debug!(count = samples.len(), "telemetry lines");
    Ok(samples)
}

fn parse_sample(record: &Record<'_>, markers: &RecordMarkers) -> Result<RawSample> {
    let body = record
        .text
        .strip_suffix(markers.continuation.as_str())
        .unwrap_or(record.text);
    // sample, x, y, pupil; the fifth column is left empty by the recorder
    let mut fields = body.split('\t').map(str::trim);

    let raw = fields.next().unwrap_or_default();
    let sample =
        parse_stamp(raw).ok_or_else(|| malformed(record, format!("invalid sample `{raw}`")))?;
    let mut value = || measurement(fields.next(), &markers.missing_value);
    Ok(RawSample {
        sample,
        x: value(),
        y: value(),
        pupil: value(),
    })
}

/// Stamps are the recorder's unsigned 32-bit clock; float stamps are truncated.
fn parse_stamp(raw: &str) -> Option<i64> {
    if let Ok(stamp) = raw.parse::<u32>() {
        return Some(i64::from(stamp));
    }
    let value = raw.parse::<f64>().ok()?.trunc();
    (0.0..=f64::from(u32::MAX))
        .contains(&value)
        .then_some(value as i64)
}

/// Missing token, empty or unparseable fields all read as NaN
fn measurement(raw: Option<&str>, missing: &str) -> f64 {
    match raw {
        Some(raw) if raw != missing => raw.parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Normalizes gaze, reindexes onto the full [first, last] sample range and
/// stamps each row with its time on `clock`.
pub fn build_sample_table(
    raw: &[RawSample],
    params: &SessionParameters,
    clock: &RecorderClock,
) -> Result<SampleTable> {
    let (Some(first), Some(last)) = (
        raw.iter().map(|s| s.sample).min(),
        raw.iter().map(|s| s.sample).max(),
    ) else {
        return Ok(SampleTable::empty());
    };
    if last.checked_sub(first).is_none_or(|d| d > MAX_SAMPLE_SPAN) {
        return Err(EyeloadError::SampleSpanTooLarge {
            first,
            last,
            limit: MAX_SAMPLE_SPAN,
        });
    }

    let span = usize::try_from(last - first).unwrap_or(0) + 1;
    let mut slots: Vec<Option<RawSample>> = vec![None; span];
    let mut duplicates = 0usize;
    for s in raw {
        let slot = &mut slots[(s.sample - first) as usize];
        if slot.is_some() {
            duplicates += 1;
        }
        *slot = Some(*s);
    }
    if duplicates > 0 {
        warn!(duplicates, "repeated sample stamps, keeping the later line");
    }

    let mut filled = 0usize;
    let rows: Vec<SampleRecord> = slots
        .into_iter()
        .zip(first..=last)
        .map(|(slot, sample)| {
            let rebased = clock.rebase(sample);
            let time_ms = clock.to_ms(rebased);
            match slot {
                Some(s) => SampleRecord {
                    sample: rebased,
                    time_ms,
                    x_norm: params.normalize_x(s.x),
                    y_norm: params.normalize_y(s.y),
                    pupil_raw: s.pupil,
                },
                None => {
                    filled += 1;
                    SampleRecord::missing(rebased, time_ms)
                }
            }
        })
        .collect();

    debug!(first, last, filled, "gap-filled sample range");
    SampleTable::from_rows(rows)
}
