use crate::config::RecordMarkers;

/// Per-trial scalar declared on its own message line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialVar {
    Block,
    Recycled,
    Recalibration,
    TargetPos,
    StepPos,
}

impl TrialVar {
    pub const ALL: [TrialVar; 5] = [
        TrialVar::Block,
        TrialVar::Recycled,
        TrialVar::Recalibration,
        TrialVar::TargetPos,
        TrialVar::StepPos,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TrialVar::Block => "block",
            TrialVar::Recycled => "recycled",
            TrialVar::Recalibration => "recalibration",
            TrialVar::TargetPos => "target_pos",
            TrialVar::StepPos => "step_pos",
        }
    }

    fn marker<'m>(&self, markers: &'m RecordMarkers) -> &'m str {
        match self {
            TrialVar::Block => &markers.block,
            TrialVar::Recycled => &markers.recycled,
            TrialVar::Recalibration => &markers.recalibration,
            TrialVar::TargetPos => &markers.target_pos_var,
            TrialVar::StepPos => &markers.step_pos_var,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    DisplayCoords,
    SampleRate,
    TrialStart,
    TrialEnd,
    TrialId,
    TrialVar(TrialVar),
    TargetPosition,
    Fixation,
    Saccade,
    Sample,
}

impl RecordKind {
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::DisplayCoords => "display geometry",
            RecordKind::SampleRate => "sample rate",
            RecordKind::TrialStart => "trial start",
            RecordKind::TrialEnd => "trial end",
            RecordKind::TrialId => "trial id",
            RecordKind::TrialVar(var) => var.name(),
            RecordKind::TargetPosition => "target position",
            RecordKind::Fixation => "fixation",
            RecordKind::Saccade => "saccade",
            RecordKind::Sample => "sample",
        }
    }
}

/// A recognized line. `line` is 1-based, `text` has its line ending removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub line: usize,
    pub kind: RecordKind,
    pub text: &'a str,
}

pub fn classify_line(text: &str, markers: &RecordMarkers) -> Option<RecordKind> {
    let text = text.trim_end_matches(['\n', '\r']);

    // Telemetry dominates the file, so test it first.
    if text.ends_with(markers.continuation.as_str())
        && text.starts_with(|c: char| c.is_ascii_digit())
    {
        return Some(RecordKind::Sample);
    }

    let first = text.split_whitespace().next()?;
    if first == markers.trial_start {
        return Some(RecordKind::TrialStart);
    }
    if first == markers.trial_end {
        return Some(RecordKind::TrialEnd);
    }
    if first == markers.fixation {
        return Some(RecordKind::Fixation);
    }
    if first == markers.saccade {
        return Some(RecordKind::Saccade);
    }
    if first == markers.samples_header && text.contains(markers.rate.as_str()) {
        return Some(RecordKind::SampleRate);
    }

    if text.contains(markers.display_coords.as_str()) {
        return Some(RecordKind::DisplayCoords);
    }
    if text.contains(markers.trial_id.as_str()) {
        return Some(RecordKind::TrialId);
    }
    if let Some(var) = TrialVar::ALL
        .into_iter()
        .find(|var| text.contains(var.marker(markers)))
    {
        return Some(RecordKind::TrialVar(var));
    }
    if text.contains(markers.target_position.as_str()) {
        return Some(RecordKind::TargetPosition);
    }
    None
}

/// Classifies every line once, dropping the ones no extractor consumes
pub fn classify<'a, I>(lines: I, markers: &RecordMarkers) -> Vec<Record<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let text = raw.trim_end_matches(['\n', '\r']);
            classify_line(text, markers).map(|kind| Record {
                line: index + 1,
                kind,
                text,
            })
        })
        .collect()
}

/// Records of one kind, in file order
pub fn of_kind<'r, 'a>(
    records: &'r [Record<'a>],
    kind: RecordKind,
) -> impl Iterator<Item = &'r Record<'a>> + 'r {
    records.iter().filter(move |r| r.kind == kind)
}
