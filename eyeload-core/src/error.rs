use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Header records a session cannot be normalized or time-stamped without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    DisplayCoords,
    SampleRate,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Header::DisplayCoords => f.write_str("display geometry"),
            Header::SampleRate => f.write_str("sample rate"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EyeloadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing {0} header record")]
    MissingHeader(Header),

    #[error("trial boundary mismatch: {starts} start records vs {ends} end records")]
    TrialBoundaryMismatch { starts: usize, ends: usize },

    #[error("trial variable `{variable}` declared {found} times for {expected} trials")]
    TrialVariableMismatch {
        variable: &'static str,
        found: usize,
        expected: usize,
    },

    #[error("target position mismatch: {positions} positions vs {stamps} sample stamps")]
    TargetRecordMismatch { positions: usize, stamps: usize },

    #[error("malformed {kind} record on line {line}: {reason}")]
    MalformedRecord {
        line: usize,
        kind: &'static str,
        reason: String,
    },

    #[error("sample range [{first}, {last}] exceeds the {limit} sample gap-fill limit")]
    SampleSpanTooLarge { first: i64, last: i64, limit: i64 },

    #[error("sample table is not contiguous: expected sample {expected}, found {found}")]
    NonContiguousSamples { expected: i64, found: i64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl EyeloadError {
    /// True when the input file itself is structurally broken, as opposed to
    /// an I/O or configuration problem on the caller's side.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            EyeloadError::MissingHeader(_)
                | EyeloadError::TrialBoundaryMismatch { .. }
                | EyeloadError::TrialVariableMismatch { .. }
                | EyeloadError::TargetRecordMismatch { .. }
                | EyeloadError::MalformedRecord { .. }
                | EyeloadError::SampleSpanTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EyeloadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_mismatch_reports_both_counts() {
        let err = EyeloadError::TrialBoundaryMismatch { starts: 4, ends: 3 };
        assert_eq!(
            err.to_string(),
            "trial boundary mismatch: 4 start records vs 3 end records"
        );
        assert!(err.is_format_error());
    }

    #[test]
    fn missing_header_names_the_header() {
        let err = EyeloadError::MissingHeader(Header::SampleRate);
        assert_eq!(err.to_string(), "missing sample rate header record");
    }

    #[test]
    fn oversized_sample_range_is_a_format_error() {
        let err = EyeloadError::SampleSpanTooLarge {
            first: 0,
            last: i64::MAX,
            limit: 10,
        };
        assert!(err.to_string().contains("exceeds the 10 sample gap-fill limit"));
        assert!(err.is_format_error());
    }

    #[test]
    fn io_error_is_not_a_format_error() {
        let err = EyeloadError::Io {
            path: PathBuf::from("/nowhere/session.asc"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().starts_with("failed to read /nowhere/session.asc"));
        assert!(!err.is_format_error());
    }
}
