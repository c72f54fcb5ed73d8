//! Peripheral-appearance reaction task.
//!
//! The participant fixates a central dot; after a random delay a target appears
//! at a fixed eccentricity and polar angle, and the participant confirms as soon
//! as they see it without moving their eyes.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use vrpsy_core::{
    ConfigError, Cue, FixationDot, Frame, Pose, Ray, ResultRow, SettingsDocument, Target, Vec2,
    ns_to_seconds, rotate_2d, seconds_to_ns, visual_angle_to_distance,
};

use crate::config::SessionSettings;
use crate::trial::{Trial, TrialContext, TrialStatus, template_of};

pub const COLUMNS: &[&str] = &[
    "TrialSucceeded",
    "FalseAlarm",
    "FixationBroken",
    "TimedOut",
    "ReactionTime",
    "TargetOnsetDelay",
    "DistanceFromCenterDegrees",
    "PolarAngle",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppearanceSettings {
    pub repetitions: usize,
    pub min_target_presentation_time: f64,
    pub max_target_presentation_time: f64,
    pub target_timeout: f64,
    pub distance_from_center_degrees: f64,
    pub polar_angle: f64,
    pub fixation_time: f64,
    /// Fixation tolerance in degrees of visual angle.
    pub max_fixation_error: f64,
    pub enable_sound: bool,
    /// Score responses on the controller laser instead of the plain button.
    pub laser_input: bool,
    pub target_radius_degrees: f64,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            repetitions: 10,
            min_target_presentation_time: 0.5,
            max_target_presentation_time: 1.5,
            target_timeout: 2.0,
            distance_from_center_degrees: 10.0,
            polar_angle: 90.0,
            fixation_time: 1.0,
            max_fixation_error: 2.0,
            enable_sound: false,
            laser_input: false,
            target_radius_degrees: 1.0,
        }
    }
}

impl AppearanceSettings {
    fn validate(&self, section: &str) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            section: section.to_string(),
            reason: reason.to_string(),
        };
        if self.min_target_presentation_time < 0.0
            || self.min_target_presentation_time > self.max_target_presentation_time
        {
            return Err(invalid(
                "MinTargetPresentationTime must be in [0, MaxTargetPresentationTime]",
            ));
        }
        if self.target_timeout <= 0.0 {
            return Err(invalid("TargetTimeout must be positive"));
        }
        if self.fixation_time < 0.0 {
            return Err(invalid("FixationTime must be non-negative"));
        }
        for (key, deg) in [
            ("DistanceFromCenterDegrees", self.distance_from_center_degrees),
            ("MaxFixationError", self.max_fixation_error),
            ("TargetRadiusDegrees", self.target_radius_degrees),
        ] {
            if !(0.0..90.0).contains(&deg) {
                return Err(invalid(&format!("{key} must be in [0, 90)")));
            }
        }
        Ok(())
    }
}

/// How an instance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    FalseAlarm,
    FixationBroken,
    TimedOut,
}

/// What the controller laser is currently pointing at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitIdentity {
    FixationDot,
    Target,
    Plane,
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Inactive,
    WaitForFixation { held_ns: u64 },
    PreTargetDelay { started_ns: u64, delay_ns: u64 },
    ReactionWindow { onset_ns: u64 },
    Finished,
}

/// Per-instance flags, reset by `perform`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ReactionState {
    fixation_broken: bool,
    trial_succeeded: bool,
    trial_over: bool,
    can_react_now: bool,
    false_alarm: bool,
    timed_out: bool,
    reaction_time_ns: Option<u64>,
    target_onset_delay_ns: Option<u64>,
}

pub struct AppearanceTrial {
    name: String,
    settings: AppearanceSettings,
    phase: Phase,
    state: ReactionState,
    anchor: Pose,
    depth: f64,
    fixation_dot: FixationDot,
    target: Option<Target>,
}

impl AppearanceTrial {
    pub fn new(name: &str) -> Self {
        Self::with_settings(name, AppearanceSettings::default())
    }

    pub fn with_settings(name: &str, settings: AppearanceSettings) -> Self {
        Self {
            name: name.to_string(),
            settings,
            phase: Phase::Inactive,
            state: ReactionState::default(),
            anchor: Pose::default(),
            depth: 0.0,
            fixation_dot: FixationDot {
                center: Vec2::ZERO,
                radius: 0.0,
            },
            target: None,
        }
    }

    pub fn settings(&self) -> &AppearanceSettings {
        &self.settings
    }

    pub fn outcome(&self) -> Option<Outcome> {
        let s = &self.state;
        if !s.trial_over {
            None
        } else if s.trial_succeeded {
            Some(Outcome::Success)
        } else if s.false_alarm {
            Some(Outcome::FalseAlarm)
        } else if s.fixation_broken {
            Some(Outcome::FixationBroken)
        } else {
            Some(Outcome::TimedOut)
        }
    }

    /// Offset of the target from the plane center at `depth`.
    pub fn target_offset(settings: &AppearanceSettings, depth: f64) -> Vec2 {
        let radius = visual_angle_to_distance(settings.distance_from_center_degrees, depth);
        rotate_2d(Vec2::new(0.0, radius), settings.polar_angle)
    }

    /// Classifies where `ray` lands on the trial plane.
    pub fn hit_identity(&self, ray: Option<Ray>) -> HitIdentity {
        let Some(point) = ray.and_then(|r| r.intersect_plane(self.depth)) else {
            return HitIdentity::Nothing;
        };
        if let Some(target) = self.target {
            if point.distance(target.offset) <= target.radius {
                return HitIdentity::Target;
            }
        }
        if point.distance(self.fixation_dot.center) <= self.fixation_dot.radius {
            HitIdentity::FixationDot
        } else {
            HitIdentity::Plane
        }
    }

    fn head_within_tolerance(&self, head: &Pose, session: &SessionSettings) -> bool {
        let drift = head.position.sub(self.anchor.position).length();
        let turn = head.forward.angle_degrees(self.anchor.forward);
        drift <= session.head_fixation_distance_error_tolerance_meters
            && turn <= session.head_fixation_angle_error_tolerance_degrees
    }

    /// Fixation check for one frame. `probe` is the gaze ray, or the laser while
    /// it stands in for gaze.
    fn is_fixating(&self, probe: Option<Ray>, frame: &Frame, session: &SessionSettings) -> bool {
        if !self.head_within_tolerance(&frame.input.head, session) {
            return false;
        }
        let tolerance = visual_angle_to_distance(self.settings.max_fixation_error, self.depth);
        probe
            .and_then(|ray| ray.intersect_plane(self.depth))
            .is_some_and(|point| point.distance(self.fixation_dot.center) <= tolerance)
    }

    fn gaze_ray(frame: &Frame) -> Option<Ray> {
        Some(Ray::from_eyes(frame.input.gaze))
    }

    /// Probe used while waiting for fixation.
    fn wait_probe(&self, frame: &Frame) -> Option<Ray> {
        if self.settings.laser_input {
            frame.input.pointer
        } else {
            Self::gaze_ray(frame)
        }
    }

    fn responded(&self, frame: &Frame) -> bool {
        if !frame.input.confirm {
            return false;
        }
        if self.settings.laser_input {
            let hit = self.hit_identity(frame.input.pointer);
            if hit != HitIdentity::Target {
                debug!(trial = %self.name, ?hit, "confirm ignored, laser is off target");
                return false;
            }
        }
        true
    }

    fn show_target(&mut self, ctx: &mut TrialContext<'_>) {
        let target = Target {
            offset: Self::target_offset(&self.settings, self.depth),
            radius: visual_angle_to_distance(self.settings.target_radius_degrees, self.depth),
        };
        self.target = Some(target);
        ctx.scene.target = Some(target);
        if self.settings.enable_sound {
            ctx.scene.play(Cue::TargetSound);
        }
        self.state.can_react_now = true;
    }

    fn finalize(&mut self, ctx: &mut TrialContext<'_>) -> TrialStatus {
        self.state.trial_over = true;
        self.state.can_react_now = false;
        self.target = None;
        ctx.scene.clear_stimuli();
        self.phase = Phase::Finished;
        debug!(trial = %self.name, outcome = ?self.outcome(), "appearance trial finished");
        TrialStatus::Finished
    }
}

impl Trial for AppearanceTrial {
    fn name(&self) -> &str {
        &self.name
    }

    fn column_names(&self) -> &[&'static str] {
        COLUMNS
    }

    fn prompt_text(&self) -> &str {
        if self.settings.laser_input {
            "Point at the dot, then pull the trigger on the target when it appears"
        } else {
            "Look at the dot and press the trigger when a target appears"
        }
    }

    fn repetitions(&self) -> usize {
        self.settings.repetitions
    }

    fn template_settings(&self) -> Result<Value, ConfigError> {
        template_of(&self.name, &AppearanceSettings::default())
    }

    fn load_settings(&mut self, settings: &SettingsDocument) -> Result<(), ConfigError> {
        let parsed: AppearanceSettings = settings.section(&self.name)?.parse()?;
        parsed.validate(&self.name)?;
        self.settings = parsed;
        Ok(())
    }

    fn perform(&mut self, ctx: &mut TrialContext<'_>) {
        self.state = ReactionState::default();
        self.target = None;
        self.depth = ctx.session.focus_depth_meters;
        self.anchor = ctx.frame.input.head;
        self.fixation_dot = FixationDot {
            center: Vec2::ZERO,
            radius: visual_angle_to_distance(ctx.session.fixation_dot_radius_deg, self.depth),
        };

        ctx.scene.trial_plane = Some(self.anchor);
        ctx.scene.plane_depth = self.depth;
        ctx.scene.fixation_dot = Some(self.fixation_dot);
        ctx.scene.target = None;
        self.phase = Phase::WaitForFixation { held_ns: 0 };
    }

    fn update(&mut self, ctx: &mut TrialContext<'_>) -> TrialStatus {
        let frame = *ctx.frame;
        match self.phase {
            Phase::Inactive | Phase::Finished => TrialStatus::Finished,
            Phase::WaitForFixation { held_ns } => {
                let probe = self.wait_probe(&frame);
                let held_ns = if self.is_fixating(probe, &frame, ctx.session) {
                    held_ns + frame.delta_ns
                } else {
                    0
                };
                if held_ns >= seconds_to_ns(self.settings.fixation_time) {
                    let delay_ns = seconds_to_ns(ctx.rng.random_range(
                        self.settings.min_target_presentation_time
                            ..=self.settings.max_target_presentation_time,
                    ));
                    self.state.target_onset_delay_ns = Some(delay_ns);
                    self.phase = Phase::PreTargetDelay {
                        started_ns: frame.now_ns,
                        delay_ns,
                    };
                } else {
                    self.phase = Phase::WaitForFixation { held_ns };
                }
                TrialStatus::Running
            }
            Phase::PreTargetDelay {
                started_ns,
                delay_ns,
            } => {
                if frame.input.confirm {
                    self.state.false_alarm = true;
                    return self.finalize(ctx);
                }
                if frame.now_ns.saturating_sub(started_ns) >= delay_ns {
                    self.show_target(ctx);
                    self.phase = Phase::ReactionWindow {
                        onset_ns: frame.now_ns,
                    };
                }
                TrialStatus::Running
            }
            Phase::ReactionWindow { onset_ns } => {
                let elapsed = frame.now_ns.saturating_sub(onset_ns);
                if elapsed >= seconds_to_ns(self.settings.target_timeout) {
                    self.state.timed_out = true;
                    return self.finalize(ctx);
                }
                if !self.is_fixating(Self::gaze_ray(&frame), &frame, ctx.session) {
                    self.state.fixation_broken = true;
                    return self.finalize(ctx);
                }
                if self.responded(&frame) {
                    self.state.trial_succeeded = true;
                    self.state.reaction_time_ns = Some(elapsed);
                    return self.finalize(ctx);
                }
                TrialStatus::Running
            }
        }
    }

    fn retrieve_result_row(&mut self) -> ResultRow {
        debug_assert!(self.state.trial_over, "result requested before the trial ended");
        let s = &self.state;
        ResultRow::new()
            .with(COLUMNS[0], s.trial_succeeded)
            .with(COLUMNS[1], s.false_alarm)
            .with(COLUMNS[2], s.fixation_broken)
            .with(COLUMNS[3], s.timed_out)
            .with(COLUMNS[4], s.reaction_time_ns.map(ns_to_seconds))
            .with(COLUMNS[5], s.target_onset_delay_ns.map(ns_to_seconds))
            .with(COLUMNS[6], self.settings.distance_from_center_degrees)
            .with(COLUMNS[7], self.settings.polar_angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use vrpsy_core::{CellValue, InputSample, Scene, Vec3};

    const MS: u64 = 1_000_000;

    struct Harness {
        trial: AppearanceTrial,
        session: SessionSettings,
        scene: Scene,
        rng: StdRng,
        now_ns: u64,
    }

    impl Harness {
        fn new(settings: AppearanceSettings) -> Self {
            let mut h = Self {
                trial: AppearanceTrial::with_settings("Appearance", settings),
                session: SessionSettings::default(),
                scene: Scene::default(),
                rng: StdRng::seed_from_u64(3),
                now_ns: 0,
            };
            let frame = Frame::new(0, 0, InputSample::default());
            let mut ctx = TrialContext {
                frame: &frame,
                session: &h.session,
                scene: &mut h.scene,
                rng: &mut h.rng,
            };
            h.trial.perform(&mut ctx);
            h
        }

        fn step(&mut self, dt_ns: u64, input: InputSample) -> TrialStatus {
            self.now_ns += dt_ns;
            let frame = Frame::new(self.now_ns, dt_ns, input);
            let mut ctx = TrialContext {
                frame: &frame,
                session: &self.session,
                scene: &mut self.scene,
                rng: &mut self.rng,
            };
            self.trial.update(&mut ctx)
        }

        /// Steps with fixating input until the trial leaves the fixation wait.
        fn fixate_until_delay(&mut self) {
            while matches!(self.trial.phase, Phase::WaitForFixation { .. }) {
                self.step(10 * MS, InputSample::default());
            }
        }

        /// Steps until the target is shown.
        fn run_to_onset(&mut self) {
            self.fixate_until_delay();
            while matches!(self.trial.phase, Phase::PreTargetDelay { .. }) {
                self.step(10 * MS, InputSample::default());
            }
            assert!(matches!(self.trial.phase, Phase::ReactionWindow { .. }));
        }
    }

    fn away() -> InputSample {
        InputSample {
            gaze: Vec3::new(0.5, 0.0, 1.0),
            ..InputSample::default()
        }
    }

    fn confirm() -> InputSample {
        InputSample {
            confirm: true,
            ..InputSample::default()
        }
    }

    fn settings() -> AppearanceSettings {
        AppearanceSettings {
            min_target_presentation_time: 0.2,
            max_target_presentation_time: 0.5,
            target_timeout: 2.0,
            fixation_time: 1.0,
            ..AppearanceSettings::default()
        }
    }

    #[test]
    fn fixation_completes_at_exactly_the_dwell_time() {
        let mut h = Harness::new(settings());
        for _ in 0..9 {
            h.step(100 * MS, InputSample::default());
            assert!(matches!(h.trial.phase, Phase::WaitForFixation { .. }));
        }
        h.step(100 * MS, InputSample::default());
        assert!(matches!(h.trial.phase, Phase::PreTargetDelay { .. }));
        assert_eq!(h.now_ns, 1_000 * MS);
    }

    #[test]
    fn one_bad_sample_resets_the_accumulator() {
        let mut h = Harness::new(settings());
        for _ in 0..9 {
            h.step(100 * MS, InputSample::default());
        }
        h.step(100 * MS, away());
        assert_eq!(h.trial.phase, Phase::WaitForFixation { held_ns: 0 });
        for _ in 0..9 {
            h.step(100 * MS, InputSample::default());
        }
        assert!(matches!(h.trial.phase, Phase::WaitForFixation { .. }));
        h.step(100 * MS, InputSample::default());
        assert!(matches!(h.trial.phase, Phase::PreTargetDelay { .. }));
    }

    #[test]
    fn gaze_missing_the_plane_resets_instead_of_failing() {
        let mut h = Harness::new(settings());
        h.step(500 * MS, InputSample::default());
        let backwards = InputSample {
            gaze: Vec3::new(0.0, 0.0, -1.0),
            ..InputSample::default()
        };
        assert_eq!(h.step(10 * MS, backwards), TrialStatus::Running);
        assert_eq!(h.trial.phase, Phase::WaitForFixation { held_ns: 0 });
    }

    #[test]
    fn head_drift_breaks_fixation() {
        let mut h = Harness::new(settings());
        h.step(500 * MS, InputSample::default());
        let mut moved = InputSample::default();
        moved.head.position = Vec3::new(0.2, 0.0, 0.0);
        h.step(10 * MS, moved);
        assert_eq!(h.trial.phase, Phase::WaitForFixation { held_ns: 0 });
    }

    #[test]
    fn head_turn_beyond_angle_tolerance_resets_fixation() {
        let mut h = Harness::new(settings());
        h.step(500 * MS, InputSample::default());
        assert_eq!(h.trial.phase, Phase::WaitForFixation { held_ns: 500 * MS });

        let mut slight = InputSample::default();
        slight.head.forward = Vec3::new(0.05, 0.0, 1.0).normalized().unwrap();
        h.step(10 * MS, slight);
        assert_eq!(h.trial.phase, Phase::WaitForFixation { held_ns: 510 * MS });

        let mut turned = InputSample::default();
        turned.head.forward = Vec3::new(0.18, 0.0, 1.0).normalized().unwrap();
        h.step(10 * MS, turned);
        assert_eq!(h.trial.phase, Phase::WaitForFixation { held_ns: 0 });
    }

    #[test]
    fn head_drift_after_onset_breaks_fixation() {
        let mut h = Harness::new(settings());
        h.run_to_onset();
        let mut moved = InputSample::default();
        moved.head.position = Vec3::new(0.0, 0.1, 0.0);
        assert_eq!(h.step(10 * MS, moved), TrialStatus::Finished);

        assert_eq!(h.trial.outcome(), Some(Outcome::FixationBroken));
        let row = h.trial.retrieve_result_row();
        assert_eq!(row.get("FixationBroken"), Some(&CellValue::Boolean(true)));
        assert_eq!(row.get("TrialSucceeded"), Some(&CellValue::Boolean(false)));
        assert_eq!(row.get("ReactionTime"), Some(&CellValue::NotAvailable));
    }

    #[test]
    fn false_alarm_during_pre_target_wait() {
        let mut h = Harness::new(settings());
        h.fixate_until_delay();
        let start = h.now_ns;
        assert_eq!(h.step(100 * MS, confirm()), TrialStatus::Finished);
        assert_eq!(h.now_ns - start, 100 * MS);

        assert_eq!(h.trial.outcome(), Some(Outcome::FalseAlarm));
        assert!(h.scene.target.is_none());
        assert!(h.scene.fixation_dot.is_none());
        let row = h.trial.retrieve_result_row();
        assert_eq!(row.get("FalseAlarm"), Some(&CellValue::Boolean(true)));
        assert_eq!(row.get("TimedOut"), Some(&CellValue::Boolean(false)));
        assert_eq!(row.get("ReactionTime"), Some(&CellValue::NotAvailable));
    }

    #[test]
    fn no_response_times_out_after_window() {
        let mut h = Harness::new(settings());
        h.run_to_onset();
        let onset = h.now_ns;
        let mut status = TrialStatus::Running;
        while status == TrialStatus::Running {
            status = h.step(100 * MS, InputSample::default());
        }
        assert_eq!(h.now_ns - onset, 2_000 * MS);
        let row = h.trial.retrieve_result_row();
        assert_eq!(row.get("TimedOut"), Some(&CellValue::Boolean(true)));
        assert_eq!(row.get("FalseAlarm"), Some(&CellValue::Boolean(false)));
        assert_eq!(row.get("TrialSucceeded"), Some(&CellValue::Boolean(false)));
    }

    #[test]
    fn confirm_in_window_records_reaction_time() {
        let mut h = Harness::new(settings());
        h.run_to_onset();
        assert!(h.scene.target.is_some());
        h.step(100 * MS, InputSample::default());
        assert_eq!(h.step(250 * MS, confirm()), TrialStatus::Finished);
        assert_eq!(h.trial.outcome(), Some(Outcome::Success));
        let row = h.trial.retrieve_result_row();
        let rt = row.get("ReactionTime").and_then(CellValue::as_f64).unwrap();
        assert!((rt - 0.35).abs() < 1e-9);
        let delay = row.get("TargetOnsetDelay").and_then(CellValue::as_f64).unwrap();
        assert!((0.2..=0.5).contains(&delay));
    }

    #[test]
    fn looking_at_target_breaks_fixation() {
        let mut h = Harness::new(settings());
        h.run_to_onset();
        h.step(10 * MS, away());
        assert_eq!(h.trial.outcome(), Some(Outcome::FixationBroken));
        let row = h.trial.retrieve_result_row();
        assert_eq!(row.get("FixationBroken"), Some(&CellValue::Boolean(true)));
        assert_eq!(row.len(), COLUMNS.len());
    }

    #[test]
    fn target_offset_is_rotated_eccentricity() {
        let s = AppearanceSettings {
            distance_from_center_degrees: 10.0,
            polar_angle: 90.0,
            ..AppearanceSettings::default()
        };
        let offset = AppearanceTrial::target_offset(&s, 2.0);
        let r = 10f64.to_radians().tan() * 2.0;
        let (sin, cos) = 90f64.to_radians().sin_cos();
        let expected = Vec2::new(0.0 * cos - r * sin, 0.0 * sin + r * cos);
        assert!((offset.x - expected.x).abs() < 1e-12);
        assert!((offset.y - expected.y).abs() < 1e-12);
        assert!((offset.x + r).abs() < 1e-12);
    }

    #[test]
    fn sound_cue_plays_at_onset_when_enabled() {
        let mut h = Harness::new(AppearanceSettings {
            enable_sound: true,
            ..settings()
        });
        h.run_to_onset();
        assert_eq!(h.scene.take_cues(), vec![Cue::TargetSound]);
        assert!(h.scene.take_cues().is_empty());
    }

    #[test]
    fn laser_mode_requires_pointer_on_target() {
        let mut h = Harness::new(AppearanceSettings {
            laser_input: true,
            ..settings()
        });
        let on_dot = InputSample {
            pointer: Some(Ray::from_eyes(Vec3::FORWARD)),
            ..InputSample::default()
        };
        while matches!(h.trial.phase, Phase::WaitForFixation { .. }) {
            h.step(10 * MS, on_dot);
        }
        while matches!(h.trial.phase, Phase::PreTargetDelay { .. }) {
            h.step(10 * MS, on_dot);
        }
        assert_eq!(h.trial.hit_identity(on_dot.pointer), HitIdentity::FixationDot);

        let off_target = InputSample {
            confirm: true,
            ..on_dot
        };
        assert_eq!(h.step(10 * MS, off_target), TrialStatus::Running);

        let target = h.scene.target.unwrap().offset;
        let on_target = InputSample {
            confirm: true,
            pointer: Some(Ray::from_eyes(Vec3::new(target.x, target.y, 2.0))),
            ..InputSample::default()
        };
        assert_eq!(h.trial.hit_identity(on_target.pointer), HitIdentity::Target);
        assert_eq!(h.step(10 * MS, on_target), TrialStatus::Finished);
        assert_eq!(h.trial.outcome(), Some(Outcome::Success));
    }

    #[test]
    fn laser_mode_waits_while_pointer_is_missing() {
        let mut h = Harness::new(AppearanceSettings {
            laser_input: true,
            ..settings()
        });
        h.step(2_000 * MS, InputSample::default());
        assert_eq!(h.trial.phase, Phase::WaitForFixation { held_ns: 0 });
    }

    #[test]
    fn inverted_presentation_window_is_rejected() {
        let mut value = serde_json::to_value(AppearanceSettings::default()).unwrap();
        value["MinTargetPresentationTime"] = serde_json::json!(3.0);
        let doc = SettingsDocument::from_value(serde_json::json!({ "Appearance": value })).unwrap();
        let mut trial = AppearanceTrial::new("Appearance");
        assert!(matches!(
            trial.load_settings(&doc),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
