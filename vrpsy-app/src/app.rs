use std::time::Duration;

use anyhow::{Context, Result, bail};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use vrpsy_core::{Cue, InputSample, SettingsDocument, seconds_to_ns};
use vrpsy_experiment::trials::default_registry;
use vrpsy_experiment::{
    ActiveLaserManager, ControllerInput, DirectorySink, EyeTracker, EyeTrackerSelection,
    EyeTrackerSelector, GazeSample, PupilLabsEyeTracker, SessionDriver, SessionEvent,
    TableSummary,
};
use vrpsy_timing::Timer;

use crate::participant::{ParticipantAction, ParticipantProfile, SimulatedParticipant};

const STICK_DEADZONE: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub fps: f64,
    /// Buffer a pause once this many trials have been recorded.
    pub pause_after: Option<usize>,
    pub pause_seconds: f64,
    /// Seconds until the simulated headset tracker connects. `None` keeps it
    /// disconnected.
    pub eye_tracker_connect_after: Option<f64>,
    pub confidence_threshold: f64,
    pub max_session_seconds: f64,
}

/// Headless session host: samples the participant, steps the driver and paces
/// frames on `T`.
pub struct App<T: Timer<Timestamp = u64>> {
    driver: SessionDriver<T, StdRng, DirectorySink>,
    participant: SimulatedParticipant,
    eye_tracker: EyeTrackerSelector,
    lasers: ActiveLaserManager,
    config: RunConfig,
    frame_period: Duration,
    paused_at: Option<u64>,
    pause_requested: bool,
    frames: u64,
}

impl<T: Timer<Timestamp = u64>> App<T> {
    pub fn new(
        settings: SettingsDocument,
        timer: T,
        mut rng: StdRng,
        sink: DirectorySink,
        profile: ParticipantProfile,
        config: RunConfig,
    ) -> Result<Self> {
        if !(config.fps > 0.0) {
            bail!("frame rate must be positive, got {}", config.fps);
        }
        let participant = SimulatedParticipant::new(profile, StdRng::seed_from_u64(rng.random()));
        let eye_tracker = EyeTrackerSelector::new(
            EyeTrackerSelection::Dummy,
            PupilLabsEyeTracker::new(config.confidence_threshold),
        );
        Ok(Self {
            driver: SessionDriver::new(default_registry(), settings, timer, rng, sink),
            participant,
            eye_tracker,
            lasers: ActiveLaserManager::new(STICK_DEADZONE),
            frame_period: Duration::from_secs_f64(1.0 / config.fps),
            config,
            paused_at: None,
            pause_requested: false,
            frames: 0,
        })
    }

    pub fn run(mut self) -> Result<Vec<TableSummary>> {
        self.driver
            .begin_session()
            .context("failed to start the session")?;
        self.eye_tracker
            .select(self.driver.session_settings().eye_tracker);
        self.eye_tracker.update();

        info!(
            trials = self.driver.sequence_names().len(),
            fps = self.config.fps,
            "running session"
        );

        let start = self.driver.timer().now();
        let deadline = seconds_to_ns(self.config.max_session_seconds);
        loop {
            let frame_start = self.driver.timer().now();
            if frame_start.saturating_sub(start) > deadline {
                bail!(
                    "session still running after {} s ({})",
                    self.config.max_session_seconds,
                    self.driver.state()
                );
            }

            let input = self.sample_input(frame_start);
            for event in self.driver.update(input) {
                if self.dispatch(event, frame_start)? {
                    return Ok(self.finish());
                }
            }
            self.resume_if_due(frame_start)?;
            self.play_cues();
            self.pace(frame_start);
        }
    }

    fn sample_input(&mut self, now: u64) -> InputSample {
        let action = self.participant.act(self.driver.scene(), now);
        self.feed_eye_tracker(now, &action);

        if self.driver.scene().trial_plane.is_some() {
            self.lasers.activate_laser();
        } else {
            self.lasers.deactivate_both_lasers();
        }
        if let Some(hand) = action.confirm {
            if self.lasers.handle(ControllerInput::Confirm {
                hand,
                pressed: true,
            }) {
                info!(?hand, "participant switched controllers");
            }
        }

        InputSample {
            gaze: self.eye_tracker.local_gaze_direction(),
            pointer: self
                .lasers
                .active_ray(&action.left_hand, &action.right_hand),
            head: action.head,
            confirm: action.confirm.is_some(),
            click: action.click,
        }
    }

    fn feed_eye_tracker(&mut self, now: u64, action: &ParticipantAction) {
        let pupil = self.eye_tracker.pupil_mut();
        if let Some(after) = self.config.eye_tracker_connect_after {
            if !pupil.is_connected() && now >= seconds_to_ns(after) {
                let status = pupil.on_connected();
                debug!(?status, "eye tracker recording");
            }
        }
        pupil.receive_gaze(GazeSample {
            direction: action.gaze,
            confidence: action.gaze_confidence,
        });
        self.eye_tracker.update();
    }

    /// Forwards one lifecycle callback. Returns true once the session ended.
    fn dispatch(&mut self, event: SessionEvent, now: u64) -> Result<bool> {
        match &event {
            SessionEvent::SlotBegin(slot) => {
                if let Some((current, total)) = self.driver.trial_progress() {
                    info!(trial = %slot.trial, "trial {current}/{total}");
                }
            }
            SessionEvent::SlotEnd(slot) => {
                debug!(slot = slot.index, trial = %slot.trial, "trial done")
            }
            SessionEvent::Paused(slot) => {
                info!(
                    next = %slot.trial,
                    seconds = self.config.pause_seconds,
                    "session paused"
                );
                self.paused_at = Some(now);
            }
            SessionEvent::SessionEnded => return Ok(true),
        }

        self.driver
            .handle_event(event)
            .context("session callback failed")?;

        if let Some(after) = self.config.pause_after {
            if !self.pause_requested && self.driver.completed_trials() >= after {
                self.pause_requested = true;
                self.driver.buffer_pause();
            }
        }
        Ok(false)
    }

    fn resume_if_due(&mut self, now: u64) -> Result<()> {
        let Some(paused_at) = self.paused_at else {
            return Ok(());
        };
        if now.saturating_sub(paused_at) >= seconds_to_ns(self.config.pause_seconds) {
            self.paused_at = None;
            self.driver.resume().context("failed to resume the session")?;
        }
        Ok(())
    }

    fn play_cues(&mut self) {
        for cue in self.driver.scene_mut().take_cues() {
            match cue {
                Cue::TargetSound => debug!("target sound"),
            }
        }
    }

    fn pace(&mut self, frame_start: u64) {
        let work = self.driver.timer().elapsed(frame_start);
        if let Some(rest) = self.frame_period.checked_sub(work) {
            self.driver.timer().sleep(rest);
        }
        let frame_time = self.driver.timer().elapsed(frame_start);
        self.driver.timer_mut().record_frame(frame_time);
        self.frames += 1;
    }

    fn finish(self) -> Vec<TableSummary> {
        info!(
            frames = self.frames,
            controller_changes = self.lasers.controller_changes(),
            "session complete"
        );
        self.driver.summaries().to_vec()
    }
}
