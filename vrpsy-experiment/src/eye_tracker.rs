//! Gaze providers and the runtime switch between them.
//!
//! The hardware tracker's network protocol lives in the host; here it is only
//! fed decoded gaze samples and connection changes.

use tracing::{info, warn};
use vrpsy_core::Vec3;

use crate::config::EyeTrackerSelection;

pub trait EyeTracker {
    /// Unit gaze direction in the viewer frame.
    fn local_gaze_direction(&self) -> Vec3;

    fn is_connected(&self) -> bool {
        true
    }
}

/// Always looks straight ahead.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyEyeTracker;

impl EyeTracker for DummyEyeTracker {
    fn local_gaze_direction(&self) -> Vec3 {
        Vec3::FORWARD
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeSample {
    pub direction: Vec3,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStatus {
    Started,
    Stopped,
    NotConnected,
    AlreadyRecording,
    NotRecording,
}

/// Tracks whether the eye tracker is recording its own raw data.
#[derive(Debug, Clone, Default)]
pub struct RecordingController {
    recording: bool,
}

impl RecordingController {
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn start_recording(&mut self, connected: bool) -> RecordingStatus {
        if !connected {
            warn!("eye tracker recording not started: not connected");
            return RecordingStatus::NotConnected;
        }
        if self.recording {
            info!("eye tracker recording is already running");
            return RecordingStatus::AlreadyRecording;
        }
        self.recording = true;
        info!("eye tracker recording started");
        RecordingStatus::Started
    }

    pub fn stop_recording(&mut self) -> RecordingStatus {
        if !self.recording {
            warn!("eye tracker recording not stopped: not recording");
            return RecordingStatus::NotRecording;
        }
        self.recording = false;
        info!("eye tracker recording stopped");
        RecordingStatus::Stopped
    }
}

/// Pupil Labs headset fed with decoded 3D gaze samples.
#[derive(Debug, Clone)]
pub struct PupilLabsEyeTracker {
    direction: Vec3,
    confidence_threshold: f64,
    connected: bool,
    recording: RecordingController,
}

impl PupilLabsEyeTracker {
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            direction: Vec3::FORWARD,
            confidence_threshold: confidence_threshold.clamp(0.0, 1.0),
            connected: false,
            recording: RecordingController::default(),
        }
    }

    /// Samples below the confidence threshold are dropped.
    pub fn receive_gaze(&mut self, sample: GazeSample) {
        if sample.confidence < self.confidence_threshold {
            return;
        }
        if let Some(direction) = sample.direction.normalized() {
            self.direction = direction;
        }
    }

    pub fn on_connected(&mut self) -> RecordingStatus {
        self.connected = true;
        info!("eye tracker connected");
        self.recording.start_recording(true)
    }

    pub fn on_disconnected(&mut self) {
        if self.connected {
            warn!("eye tracker disconnected");
        }
        self.connected = false;
        if self.recording.is_recording() {
            self.recording.stop_recording();
        }
    }

    pub fn recording(&self) -> &RecordingController {
        &self.recording
    }
}

impl EyeTracker for PupilLabsEyeTracker {
    fn local_gaze_direction(&self) -> Vec3 {
        self.direction
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Chooses the gaze provider, falling back to the dummy tracker while the
/// hardware one is not connected.
#[derive(Debug, Clone)]
pub struct EyeTrackerSelector {
    selection: EyeTrackerSelection,
    cached_selection: EyeTrackerSelection,
    pupil: PupilLabsEyeTracker,
    dummy: DummyEyeTracker,
    status: Option<String>,
}

impl EyeTrackerSelector {
    pub fn new(selection: EyeTrackerSelection, pupil: PupilLabsEyeTracker) -> Self {
        let mut selector = Self {
            selection,
            cached_selection: selection,
            pupil,
            dummy: DummyEyeTracker,
            status: None,
        };
        selector.refresh_status();
        selector
    }

    pub fn select(&mut self, selection: EyeTrackerSelection) {
        self.selection = selection;
    }

    /// Re-evaluates the choice; call once per frame.
    pub fn update(&mut self) {
        if self.cached_selection != self.selection {
            info!(
                from = ?self.cached_selection,
                to = ?self.selection,
                "eye tracker selection changed"
            );
            self.cached_selection = self.selection;
        }
        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        let status = match self.selection {
            EyeTrackerSelection::PupilLabs if !self.pupil.is_connected() => {
                Some("Eye tracker not connected, using dummy gaze".to_string())
            }
            _ => None,
        };
        if status.is_some() && self.status.is_none() {
            warn!("pupil labs tracker selected but not connected, falling back to dummy tracker");
        }
        self.status = status;
    }

    pub fn chosen(&self) -> &dyn EyeTracker {
        match self.cached_selection {
            EyeTrackerSelection::PupilLabs if self.pupil.is_connected() => &self.pupil,
            _ => &self.dummy,
        }
    }

    pub fn local_gaze_direction(&self) -> Vec3 {
        self.chosen().local_gaze_direction()
    }

    /// User-facing status line, set while running degraded.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn pupil_mut(&mut self) -> &mut PupilLabsEyeTracker {
        &mut self.pupil
    }
}
