pub mod error;
pub mod sample;
pub mod session;
pub mod trial;

pub use error::{EyeloadError, Header, Result};
pub use sample::{SampleRecord, SampleTable};
pub use session::{SessionParameters, normalize};
pub use trial::{GazeEvent, Onset, RawTargetEvent, TargetEvent, Trial, TrialTable};
