use crate::geometry::{Pose, Vec2};

/// RGBA color.
pub type Color = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixationDot {
    pub center: Vec2,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Offset from the plane center.
    pub offset: Vec2,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    TargetSound,
}

/// Everything the host should currently draw or play.
///
/// Trials and the session driver toggle these; rendering them is the host's
/// business.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub prompt: Option<String>,
    pub pause_prompt: bool,
    /// Viewer pose the trial plane is attached to.
    pub trial_plane: Option<Pose>,
    /// Plane depth in meters, valid while `trial_plane` is set.
    pub plane_depth: f64,
    pub fixation_dot: Option<FixationDot>,
    pub target: Option<Target>,
    pub sphere: Option<Color>,
    pub click_pad: bool,
    cues: Vec<Cue>,
}

impl Scene {
    pub fn play(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    /// Drains the cues raised since the last call.
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Hides every trial-owned stimulus. Session-level prompts stay.
    pub fn clear_stimuli(&mut self) {
        self.trial_plane = None;
        self.fixation_dot = None;
        self.target = None;
        self.sphere = None;
        self.click_pad = false;
    }
}
