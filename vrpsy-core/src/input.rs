use crate::geometry::{Pose, Ray, Vec3};

/// What the host hardware reported for one frame.
///
/// `confirm` and `click` are edges: they are true only on the frame the button
/// went down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSample {
    /// Unit gaze direction in the viewer frame.
    pub gaze: Vec3,
    /// Active controller's laser, if one is enabled.
    pub pointer: Option<Ray>,
    pub head: Pose,
    pub confirm: bool,
    pub click: bool,
}

impl Default for InputSample {
    fn default() -> Self {
        Self {
            gaze: Vec3::FORWARD,
            pointer: None,
            head: Pose::default(),
            confirm: false,
            click: false,
        }
    }
}

/// One scheduler tick as seen by a trial protocol.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub now_ns: u64,
    /// Time since the previous frame.
    pub delta_ns: u64,
    pub input: InputSample,
}

impl Frame {
    pub fn new(now_ns: u64, delta_ns: u64, input: InputSample) -> Self {
        Self {
            now_ns,
            delta_ns,
            input,
        }
    }
}

pub fn seconds_to_ns(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1_000_000_000.0).round() as u64
}

pub fn ns_to_seconds(ns: u64) -> f64 {
    ns as f64 / 1_000_000_000.0
}
