use eyeload_core::{EyeloadError, Header, Result, SessionParameters};
use tracing::{debug, warn};

use crate::classify::{Record, RecordKind, of_kind};
use crate::fields::{malformed, parse_field, tab_field};

/// Reads display geometry and sampling rate. Both are mandatory.
pub fn extract_session_parameters(records: &[Record<'_>]) -> Result<SessionParameters> {
    let display = single(records, RecordKind::DisplayCoords, Header::DisplayCoords)?;
    let (width, height) = display_extent(display)?;

    let rate = single(records, RecordKind::SampleRate, Header::SampleRate)?;
    let rate_hz: f64 = parse_field(rate, tab_field(rate.text, 4), "sampling rate")?;
    if !(rate_hz.is_finite() && rate_hz > 0.0) {
        return Err(malformed(rate, format!("sampling rate {rate_hz} is not positive")));
    }

    debug!(width, height, rate_hz, "session parameters");
    Ok(SessionParameters::new(width, height, rate_hz))
}

fn single<'r, 'a>(
    records: &'r [Record<'a>],
    kind: RecordKind,
    header: Header,
) -> Result<&'r Record<'a>> {
    let mut matching = of_kind(records, kind);
    let first = matching.next().ok_or(EyeloadError::MissingHeader(header))?;
    let extra = matching.count();
    if extra > 0 {
        warn!(line = first.line, extra, "{header} declared more than once, using the first");
    }
    Ok(first)
}

fn display_extent(record: &Record<'_>) -> Result<(f64, f64)> {
    let mut tokens = record.text.split_whitespace().rev();
    let height: f64 = parse_field(record, tokens.next(), "display height")?;
    let width: f64 = parse_field(record, tokens.next(), "display width")?;
    for (extent, what) in [(width, "width"), (height, "height")] {
        if !(extent.is_finite() && extent > 0.0) {
            return Err(malformed(record, format!("display {what} {extent} is not positive")));
        }
    }
    Ok((width, height))
}
