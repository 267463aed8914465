//! Restructures eye-tracker text exports into a gap-filled sample table and a
//! trial table with segmented target, fixation and saccade events.

pub mod assemble;
pub mod classify;
pub mod config;
pub mod events;
mod fields;
pub mod header;
pub mod samples;
pub mod segment;
pub mod session;
pub mod state;
pub mod trial;

pub use classify::{Record, RecordKind, TrialVar, classify, classify_line};
pub use config::{ParserConfig, RecordMarkers};
pub use events::{extract_fixations, extract_saccades, extract_target_events};
pub use header::extract_session_parameters;
pub use samples::{RawSample, build_sample_table, parse_samples};
pub use segment::{OverlapPolicy, TrialWindow, overlapping_windows, segment};
pub use session::{ParsedSession, SessionSummary, load_file, parse, parse_str};
pub use state::EyeSession;
pub use trial::extract_trial_windows;
