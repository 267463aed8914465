use eyeload_core::{EyeloadError, GazeEvent, RawTargetEvent, Result, TargetEvent};
use tracing::debug;

use crate::classify::{Record, RecordKind, of_kind};
use crate::config::RecordMarkers;
use crate::fields::{last_token, malformed, parse_field, tab_field};

/// Target position changes in raw pixels, ordered by sample
pub fn extract_target_events(
    records: &[Record<'_>],
    markers: &RecordMarkers,
) -> Result<Vec<RawTargetEvent>> {
    let mut stamps = Vec::new();
    let mut positions = Vec::new();
    for record in of_kind(records, RecordKind::TargetPosition) {
        stamps.push(target_stamp(record)?);
        positions.push(target_position(record, markers)?);
    }
    if stamps.len() != positions.len() {
        return Err(EyeloadError::TargetRecordMismatch {
            positions: positions.len(),
            stamps: stamps.len(),
        });
    }

    let mut events: Vec<RawTargetEvent> = stamps
        .into_iter()
        .zip(positions)
        .map(|(sample, position)| TargetEvent { sample, position })
        .collect();
    events.sort_by_key(|e| e.sample);
    debug!(count = events.len(), "target position changes");
    Ok(events)
}

pub fn extract_fixations(records: &[Record<'_>]) -> Result<Vec<GazeEvent>> {
    extract_gaze_events(records, RecordKind::Fixation)
}

pub fn extract_saccades(records: &[Record<'_>]) -> Result<Vec<GazeEvent>> {
    extract_gaze_events(records, RecordKind::Saccade)
}

/// End-of-event records carry both the onset and the offset sample
fn extract_gaze_events(records: &[Record<'_>], kind: RecordKind) -> Result<Vec<GazeEvent>> {
    let mut events = of_kind(records, kind)
        .map(gaze_event)
        .collect::<Result<Vec<_>>>()?;
    events.sort_by_key(|e| e.onset);
    debug!(kind = kind.name(), count = events.len(), "gaze events");
    Ok(events)
}

fn gaze_event(record: &Record<'_>) -> Result<GazeEvent> {
    let mut fields = record.text.split('\t');
    let onset = parse_field(record, fields.next().and_then(last_token), "onset sample")?;
    let offset = parse_field(
        record,
        fields.next().and_then(|f| f.split_whitespace().next()),
        "offset sample",
    )?;
    Ok(GazeEvent { onset, offset })
}

fn target_stamp(record: &Record<'_>) -> Result<i64> {
    let raw = tab_field(record.text, 1).and_then(|f| f.split_whitespace().next());
    parse_field(record, raw, "sample stamp")
}

fn target_position(record: &Record<'_>, markers: &RecordMarkers) -> Result<[i64; 2]> {
    let rest = record
        .text
        .split_once(markers.target_position.as_str())
        .map(|(_, rest)| rest)
        .unwrap_or(record.text);
    let open = rest
        .find(['(', '['])
        .ok_or_else(|| malformed(record, "missing bracketed position"))?;
    let close = if rest[open..].starts_with('(') { ')' } else { ']' };
    let body = &rest[open + 1..];
    let end = body
        .find(close)
        .ok_or_else(|| malformed(record, "unterminated position list"))?;

    let coords: Vec<&str> = body[..end].split(',').map(str::trim).collect();
    if coords.len() != 2 {
        return Err(malformed(
            record,
            format!("expected 2 coordinates, found {}", coords.len()),
        ));
    }
    let x = parse_field(record, Some(coords[0]), "target x")?;
    let y = parse_field(record, Some(coords[1]), "target y")?;
    Ok([x, y])
}
