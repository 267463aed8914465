pub mod clock;
pub use clock::{RecorderClock, SampleClock, SampleOrigin};
