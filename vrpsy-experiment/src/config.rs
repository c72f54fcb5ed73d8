use serde::{Deserialize, Serialize};
use vrpsy_core::{ConfigError, SettingsDocument};

pub const SESSION_SETTINGS_KEY: &str = "SessionSettings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EyeTrackerSelection {
    PupilLabs,
    #[default]
    Dummy,
}

/// Session-wide settings shared by every trial type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionSettings {
    pub fixation_dot_radius_deg: f64,
    /// Depth of the trial plane in front of the viewer.
    pub focus_depth_meters: f64,
    pub head_fixation_distance_error_tolerance_meters: f64,
    pub head_fixation_angle_error_tolerance_degrees: f64,
    pub eye_tracker: EyeTrackerSelection,
    /// How long a trial's prompt stays up before its protocol starts.
    pub prompt_delay_seconds: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            fixation_dot_radius_deg: 0.5,
            focus_depth_meters: 2.0,
            head_fixation_distance_error_tolerance_meters: 0.05,
            head_fixation_angle_error_tolerance_degrees: 5.0,
            eye_tracker: EyeTrackerSelection::Dummy,
            prompt_delay_seconds: 2.0,
        }
    }
}

impl SessionSettings {
    pub fn load(doc: &SettingsDocument) -> Result<Self, ConfigError> {
        let settings: Self = doc.section(SESSION_SETTINGS_KEY)?.parse()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            section: SESSION_SETTINGS_KEY.to_string(),
            reason: reason.to_string(),
        };
        if !(self.focus_depth_meters > 0.0) {
            return Err(invalid("FocusDepthMeters must be positive"));
        }
        if !(0.0..90.0).contains(&self.fixation_dot_radius_deg) {
            return Err(invalid("FixationDotRadiusDeg must be in [0, 90)"));
        }
        if self.head_fixation_distance_error_tolerance_meters < 0.0
            || self.head_fixation_angle_error_tolerance_degrees < 0.0
        {
            return Err(invalid("head fixation tolerances must be non-negative"));
        }
        if self.prompt_delay_seconds < 0.0 {
            return Err(invalid("PromptDelaySeconds must be non-negative"));
        }
        Ok(())
    }
}
