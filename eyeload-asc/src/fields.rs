use std::fmt::Display;
use std::str::FromStr;

use eyeload_core::{EyeloadError, Result};

use crate::classify::Record;

pub(crate) fn last_token(text: &str) -> Option<&str> {
    text.split_whitespace().next_back()
}

pub(crate) fn tab_field(text: &str, index: usize) -> Option<&str> {
    text.split('\t').nth(index).map(str::trim)
}

pub(crate) fn malformed(record: &Record<'_>, reason: impl Into<String>) -> EyeloadError {
    EyeloadError::MalformedRecord {
        line: record.line,
        kind: record.kind.name(),
        reason: reason.into(),
    }
}

/// Parses a mandatory field, naming it in the error when absent or invalid
pub(crate) fn parse_field<T>(record: &Record<'_>, raw: Option<&str>, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = raw.ok_or_else(|| malformed(record, format!("missing {what}")))?;
    raw.parse()
        .map_err(|e| malformed(record, format!("invalid {what} `{raw}`: {e}")))
}
