use std::path::Path;

use eyeload_core::{EyeloadError, Result};
use eyeload_timing::SampleOrigin;
use serde::{Deserialize, Serialize};

use crate::segment::OverlapPolicy;

/// Tokens that identify each record type in a recorder text export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordMarkers {
    pub display_coords: String,
    pub samples_header: String,
    pub rate: String,
    pub trial_start: String,
    pub trial_end: String,
    pub trial_id: String,
    pub block: String,
    pub recycled: String,
    pub recalibration: String,
    pub target_pos_var: String,
    pub step_pos_var: String,
    pub target_position: String,
    pub fixation: String,
    pub saccade: String,
    /// Suffix carried by every telemetry line
    pub continuation: String,
    pub missing_value: String,
    pub true_literal: String,
}

impl Default for RecordMarkers {
    fn default() -> Self {
        Self {
            display_coords: "DISPLAY_COORDS".into(),
            samples_header: "SAMPLES".into(),
            rate: "RATE".into(),
            trial_start: "START".into(),
            trial_end: "END".into(),
            trial_id: "TRIALID".into(),
            block: "TRIAL_VAR block".into(),
            recycled: "TRIAL_VAR Trial_Recycled_".into(),
            recalibration: "TRIAL_VAR Recal".into(),
            target_pos_var: "TRIAL_VAR targpos".into(),
            step_pos_var: "TRIAL_VAR steppos".into(),
            target_position: "TARGET_POS".into(),
            fixation: "EFIX".into(),
            saccade: "ESACC".into(),
            continuation: "...".into(),
            missing_value: ".".into(),
            true_literal: "True".into(),
        }
    }
}

impl RecordMarkers {
    fn named(&self) -> [(&'static str, &str); 17] {
        [
            ("display_coords", self.display_coords.as_str()),
            ("samples_header", self.samples_header.as_str()),
            ("rate", self.rate.as_str()),
            ("trial_start", self.trial_start.as_str()),
            ("trial_end", self.trial_end.as_str()),
            ("trial_id", self.trial_id.as_str()),
            ("block", self.block.as_str()),
            ("recycled", self.recycled.as_str()),
            ("recalibration", self.recalibration.as_str()),
            ("target_pos_var", self.target_pos_var.as_str()),
            ("step_pos_var", self.step_pos_var.as_str()),
            ("target_position", self.target_position.as_str()),
            ("fixation", self.fixation.as_str()),
            ("saccade", self.saccade.as_str()),
            ("continuation", self.continuation.as_str()),
            ("missing_value", self.missing_value.as_str()),
            ("true_literal", self.true_literal.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub markers: RecordMarkers,
    pub drop_recalibration: bool,
    pub sample_origin: SampleOrigin,
    pub overlap_policy: OverlapPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            markers: RecordMarkers::default(),
            drop_recalibration: true,
            sample_origin: SampleOrigin::Absolute,
            overlap_policy: OverlapPolicy::AllContaining,
        }
    }
}

impl ParserConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ParserConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EyeloadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, token) in self.markers.named() {
            if token.trim().is_empty() {
                return Err(EyeloadError::InvalidConfig(format!(
                    "marker `{name}` must not be empty"
                )));
            }
        }
        Ok(())
    }
}
