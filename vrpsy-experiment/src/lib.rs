pub mod config;
pub mod error;
pub mod eye_tracker;
pub mod laser;
pub mod sequencer;
pub mod session;
pub mod sink;
pub mod summary;
pub mod template;
pub mod trial;
pub mod trials;

pub use config::{EyeTrackerSelection, SESSION_SETTINGS_KEY, SessionSettings};
pub use error::SessionError;
pub use eye_tracker::{
    DummyEyeTracker, EyeTracker, EyeTrackerSelector, GazeSample, PupilLabsEyeTracker,
    RecordingController, RecordingStatus,
};
pub use laser::{ActiveLaserManager, ControllerInput, Hand};
pub use sequencer::build_sequence;
pub use session::{SessionDriver, SessionEvent, SessionState, SlotHandle};
pub use sink::{DirectorySink, MemorySink, OutputFormat, PersistenceError, ResultsSink};
pub use summary::TableSummary;
pub use template::{template_document, write_template};
pub use trial::{Trial, TrialContext, TrialStatus};
