use serde::{Deserialize, Serialize};

use crate::error::{EyeloadError, Result};

/// One recorder timestep. Gap-filled rows carry NaN in every measured field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub sample: i64,
    pub time_ms: f64,
    pub x_norm: f64,
    pub y_norm: f64,
    pub pupil_raw: f64,
}

impl SampleRecord {
    pub fn missing(sample: i64, time_ms: f64) -> Self {
        Self {
            sample,
            time_ms,
            x_norm: f64::NAN,
            y_norm: f64::NAN,
            pupil_raw: f64::NAN,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.x_norm.is_nan() && self.y_norm.is_nan() && self.pupil_raw.is_nan()
    }
}

/// Continuous telemetry keyed by sample index.
///
/// Rows always cover a contiguous integer range, so lookup by sample is an
/// offset from the first row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleTable {
    rows: Vec<SampleRecord>,
}

impl SampleTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps rows that must already be sorted and gap-free
    pub fn from_rows(rows: Vec<SampleRecord>) -> Result<Self> {
        if let Some(first) = rows.first() {
            for (offset, row) in rows.iter().enumerate() {
                let expected = first.sample + offset as i64;
                if row.sample != expected {
                    return Err(EyeloadError::NonContiguousSamples {
                        expected,
                        found: row.sample,
                    });
                }
            }
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_sample(&self) -> Option<i64> {
        self.rows.first().map(|r| r.sample)
    }

    pub fn last_sample(&self) -> Option<i64> {
        self.rows.last().map(|r| r.sample)
    }

    pub fn get(&self, sample: i64) -> Option<&SampleRecord> {
        let first = self.first_sample()?;
        let offset = usize::try_from(sample.checked_sub(first)?).ok()?;
        self.rows.get(offset)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SampleRecord> {
        self.rows.iter()
    }

    pub fn rows(&self) -> &[SampleRecord] {
        &self.rows
    }

    /// Rows with no measured value at all (recorder dropouts and gap fill)
    pub fn missing_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_missing()).count()
    }
}

impl<'a> IntoIterator for &'a SampleTable {
    type Item = &'a SampleRecord;
    type IntoIter = std::slice::Iter<'a, SampleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sample: i64) -> SampleRecord {
        SampleRecord {
            sample,
            time_ms: sample as f64,
            x_norm: 0.0,
            y_norm: 0.0,
            pupil_raw: 800.0,
        }
    }

    #[test]
    fn lookup_is_keyed_by_sample() {
        let table = SampleTable::from_rows(vec![row(10), row(11), row(12)]).unwrap();
        assert_eq!(table.first_sample(), Some(10));
        assert_eq!(table.last_sample(), Some(12));
        assert_eq!(table.get(11).map(|r| r.sample), Some(11));
        assert!(table.get(9).is_none());
        assert!(table.get(13).is_none());
    }

    #[test]
    fn gaps_are_rejected() {
        let err = SampleTable::from_rows(vec![row(10), row(12)]).unwrap_err();
        assert!(matches!(
            err,
            EyeloadError::NonContiguousSamples {
                expected: 11,
                found: 12
            }
        ));
    }

    #[test]
    fn missing_rows_are_counted() {
        let table = SampleTable::from_rows(vec![row(1), SampleRecord::missing(2, 2.0), row(3)])
            .unwrap();
        assert_eq!(table.missing_count(), 1);
        assert!(table.get(2).unwrap().is_missing());
        assert!(SampleTable::empty().get(0).is_none());
    }
}
