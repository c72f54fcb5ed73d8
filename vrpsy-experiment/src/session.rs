use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;

use rand::Rng;
use tracing::{debug, info, warn};
use vrpsy_core::{
    ConfigError, Frame, InputSample, ResultsTable, Scene, SettingsDocument, seconds_to_ns,
};
use vrpsy_timing::Timer;

use crate::config::SessionSettings;
use crate::error::SessionError;
use crate::sequencer::build_sequence;
use crate::sink::ResultsSink;
use crate::summary::TableSummary;
use crate::trial::{Trial, TrialContext, TrialStatus};

/// Identifies one scheduled slot of the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotHandle {
    pub index: usize,
    pub trial: String,
}

/// Lifecycle callbacks, produced by [`SessionDriver::update`] and fed back
/// through [`SessionDriver::handle_event`] by the host loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SlotBegin(SlotHandle),
    SlotEnd(SlotHandle),
    /// The driver is holding at a slot boundary until [`SessionDriver::resume`].
    Paused(SlotHandle),
    SessionEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    PauseBuffered { slot: usize },
    AwaitingPromptDelay { slot: usize, shown_at: u64 },
    RunningTrialProtocol { slot: usize },
    ScoringAndRecording { slot: usize },
    NextSlot { slot: usize },
    Finalizing,
    Ended,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::PauseBuffered { slot } => write!(f, "paused before slot {slot}"),
            SessionState::AwaitingPromptDelay { slot, .. } => {
                write!(f, "showing the prompt for slot {slot}")
            }
            SessionState::RunningTrialProtocol { slot } => write!(f, "running slot {slot}"),
            SessionState::ScoringAndRecording { slot } => write!(f, "scoring slot {slot}"),
            SessionState::NextSlot { slot } => write!(f, "waiting to begin slot {slot}"),
            SessionState::Finalizing => f.write_str("finalizing"),
            SessionState::Ended => f.write_str("ended"),
        }
    }
}

/// Runs one session: sequences trials, drives the active protocol every frame
/// and hands the results tables to `S` when the last slot ends.
pub struct SessionDriver<T, R, S>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
    S: ResultsSink,
{
    trials: Vec<Box<dyn Trial>>,
    settings: SettingsDocument,
    session: SessionSettings,
    timer: T,
    rng: R,
    sink: S,
    state: SessionState,
    sequence: Vec<usize>,
    trial_count: usize,
    tables: BTreeMap<String, ResultsTable>,
    summaries: Vec<TableSummary>,
    pause_buffered: bool,
    pending: VecDeque<SessionEvent>,
    scene: Scene,
    last_input: InputSample,
    last_frame_ns: u64,
}

impl<T, R, S> SessionDriver<T, R, S>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
    S: ResultsSink,
{
    pub fn new(
        trials: Vec<Box<dyn Trial>>,
        settings: SettingsDocument,
        timer: T,
        rng: R,
        sink: S,
    ) -> Self {
        Self {
            trials,
            settings,
            session: SessionSettings::default(),
            timer,
            rng,
            sink,
            state: SessionState::Idle,
            sequence: Vec::new(),
            trial_count: 0,
            tables: BTreeMap::new(),
            summaries: Vec::new(),
            pause_buffered: false,
            pending: VecDeque::new(),
            scene: Scene::default(),
            last_input: InputSample::default(),
            last_frame_ns: 0,
        }
    }

    /// Loads settings, builds the trial order and queues the first slot.
    pub fn begin_session(&mut self) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Idle | SessionState::Ended) {
            return Err(self.out_of_order("begin_session"));
        }
        if self.trials.is_empty() {
            return Err(ConfigError::EmptyRegistry.into());
        }
        let mut names = HashSet::new();
        for trial in &self.trials {
            if !names.insert(trial.name()) {
                return Err(ConfigError::DuplicateTrial(trial.name().to_string()).into());
            }
        }

        self.session = SessionSettings::load(&self.settings)?;
        for trial in &mut self.trials {
            trial.load_settings(&self.settings)?;
        }

        let repetitions: Vec<usize> = self.trials.iter().map(|t| t.repetitions()).collect();
        let sequence = build_sequence(&repetitions, &mut self.rng);
        if sequence.is_empty() {
            return Err(ConfigError::EmptySequence.into());
        }

        self.sequence = sequence;
        self.trial_count = 0;
        self.tables.clear();
        self.summaries.clear();
        self.pending.clear();
        self.pause_buffered = false;
        self.scene = Scene::default();
        self.last_frame_ns = self.timer.now();

        info!(
            slots = self.sequence.len(),
            trial_types = self.trials.len(),
            "session started"
        );
        let first = self.slot_handle(0);
        self.state = SessionState::NextSlot { slot: 0 };
        self.pending.push_back(SessionEvent::SlotBegin(first));
        Ok(())
    }

    /// Advances one frame and returns the lifecycle callbacks that are due.
    pub fn update(&mut self, input: InputSample) -> Vec<SessionEvent> {
        let now = self.timer.now();
        let frame = Frame::new(now, now.saturating_sub(self.last_frame_ns), input);
        self.last_frame_ns = now;
        self.last_input = input;

        let mut events: Vec<SessionEvent> = self.pending.drain(..).collect();

        match self.state {
            SessionState::AwaitingPromptDelay { slot, shown_at } => {
                if now.saturating_sub(shown_at) >= seconds_to_ns(self.session.prompt_delay_seconds)
                {
                    self.scene.prompt = None;
                    self.start_protocol(slot, &frame);
                }
            }
            SessionState::RunningTrialProtocol { slot } => {
                let index = self.sequence[slot];
                let status = {
                    let mut ctx = TrialContext {
                        frame: &frame,
                        session: &self.session,
                        scene: &mut self.scene,
                        rng: &mut self.rng,
                    };
                    self.trials[index].update(&mut ctx)
                };
                if status == TrialStatus::Finished {
                    self.state = SessionState::ScoringAndRecording { slot };
                    events.push(SessionEvent::SlotEnd(self.slot_handle(slot)));
                }
            }
            _ => {}
        }

        events
    }

    /// Dispatches a lifecycle callback. Returns false for purely informational
    /// events the host handles itself.
    pub fn handle_event(&mut self, event: SessionEvent) -> Result<bool, SessionError> {
        match event {
            SessionEvent::SlotBegin(slot) => self.on_slot_begin(slot).map(|_| true),
            SessionEvent::SlotEnd(slot) => self.on_slot_end(slot).map(|_| true),
            SessionEvent::Paused(_) | SessionEvent::SessionEnded => Ok(false),
        }
    }

    pub fn on_slot_begin(&mut self, slot: SlotHandle) -> Result<(), SessionError> {
        match self.state {
            SessionState::NextSlot { slot: expected } if expected == slot.index => {}
            _ => return Err(self.out_of_order("on_slot_begin")),
        }

        if self.pause_buffered {
            info!(slot = slot.index, trial = %slot.trial, "session paused");
            self.state = SessionState::PauseBuffered { slot: slot.index };
            self.scene.pause_prompt = true;
            self.pending.push_back(SessionEvent::Paused(slot));
            return Ok(());
        }

        let index = self.sequence[slot.index];
        self.scene.prompt = Some(self.trials[index].prompt_text().to_string());
        self.state = SessionState::AwaitingPromptDelay {
            slot: slot.index,
            shown_at: self.timer.now(),
        };
        debug!(slot = slot.index, trial = %slot.trial, "prompt shown");
        Ok(())
    }

    pub fn on_slot_end(&mut self, slot: SlotHandle) -> Result<(), SessionError> {
        match self.state {
            SessionState::ScoringAndRecording { slot: expected } if expected == slot.index => {}
            _ => return Err(self.out_of_order("on_slot_end")),
        }

        let trial = &mut self.trials[self.sequence[slot.index]];
        let row = trial.retrieve_result_row();
        let table = self
            .tables
            .entry(trial.name().to_string())
            .or_insert_with(|| {
                ResultsTable::new(trial.name(), trial.column_names().iter().copied())
            });
        table
            .add_complete_row(row)
            .map_err(|source| SessionError::ColumnMismatch {
                trial: slot.trial.clone(),
                source,
            })?;

        self.trial_count += 1;
        debug!(
            slot = slot.index,
            trial = %slot.trial,
            completed = self.trial_count,
            total = self.sequence.len(),
            "slot recorded"
        );

        if self.trial_count < self.sequence.len() {
            let next = slot.index + 1;
            let handle = self.slot_handle(next);
            self.state = SessionState::NextSlot { slot: next };
            self.pending.push_back(SessionEvent::SlotBegin(handle));
            Ok(())
        } else {
            self.state = SessionState::Finalizing;
            self.summaries = self.tables.values().map(TableSummary::of).collect();
            self.finalize()
        }
    }

    /// Retries handing the remaining tables to the sink after a failed save.
    pub fn retry_finalize(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Finalizing {
            return Err(self.out_of_order("retry_finalize"));
        }
        self.finalize()
    }

    /// Holds the session at the next slot boundary.
    pub fn buffer_pause(&mut self) {
        if !self.pause_buffered {
            info!("pause buffered until the next slot boundary");
        }
        self.pause_buffered = true;
    }

    /// Clears a buffered pause; if the driver is already holding, starts the
    /// held slot's protocol right away.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        self.pause_buffered = false;
        match self.state {
            SessionState::PauseBuffered { slot } => {
                info!(slot, "session resumed");
                self.scene.pause_prompt = false;
                let now = self.timer.now();
                let frame = Frame::new(now, 0, self.last_input);
                self.last_frame_ns = now;
                self.start_protocol(slot, &frame);
                Ok(())
            }
            SessionState::Ended | SessionState::Idle => Err(self.out_of_order("resume")),
            _ => Ok(()),
        }
    }

    fn start_protocol(&mut self, slot: usize, frame: &Frame) {
        let index = self.sequence[slot];
        let mut ctx = TrialContext {
            frame,
            session: &self.session,
            scene: &mut self.scene,
            rng: &mut self.rng,
        };
        self.trials[index].perform(&mut ctx);
        self.state = SessionState::RunningTrialProtocol { slot };
        debug!(slot, trial = self.trials[index].name(), "protocol started");
    }

    /// Saves tables one by one; a table leaves the driver only once the sink
    /// accepted it.
    fn finalize(&mut self) -> Result<(), SessionError> {
        while let Some((name, table)) = self.tables.pop_first() {
            if let Err(err) = self.sink.save_table(&name, &table) {
                warn!(table = %name, unsaved = self.tables.len() + 1, "saving results failed");
                self.tables.insert(name, table);
                return Err(err.into());
            }
        }

        for summary in &self.summaries {
            info!("{summary}");
        }
        let stats = self.timer.calibration_stats();
        if stats.frames > 0 {
            info!(
                "frame timing: {:.3} ms/frame, {:.1} Hz, jitter {:.3} ms",
                stats.average_frame_time_ns / 1_000_000.0,
                stats.effective_fps,
                stats.jitter_ns / 1_000_000.0,
            );
        }

        self.scene = Scene::default();
        self.state = SessionState::Ended;
        self.pending.push_back(SessionEvent::SessionEnded);
        info!(trials = self.trial_count, "session ended");
        Ok(())
    }

    fn slot_handle(&self, slot: usize) -> SlotHandle {
        SlotHandle {
            index: slot,
            trial: self.trials[self.sequence[slot]].name().to_string(),
        }
    }

    fn out_of_order(&self, operation: &'static str) -> SessionError {
        warn!(operation, state = %self.state, "lifecycle callback out of order");
        SessionError::OutOfOrder {
            operation,
            state: self.state.to_string(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state == SessionState::Ended
    }

    pub fn is_pause_buffered(&self) -> bool {
        self.pause_buffered
    }

    pub fn session_settings(&self) -> &SessionSettings {
        &self.session
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Trial names in execution order.
    pub fn sequence_names(&self) -> Vec<&str> {
        self.sequence
            .iter()
            .map(|&i| self.trials[i].name())
            .collect()
    }

    pub fn completed_trials(&self) -> usize {
        self.trial_count
    }

    /// `(current slot, total)`, 1-based, while a session is running.
    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        match self.state {
            SessionState::Idle | SessionState::Ended => None,
            _ => Some(((self.trial_count + 1).min(self.sequence.len()), self.sequence.len())),
        }
    }

    /// Tables that have not been flushed yet.
    pub fn tables(&self) -> &BTreeMap<String, ResultsTable> {
        &self.tables
    }

    pub fn summaries(&self) -> &[TableSummary] {
        &self.summaries
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

}
