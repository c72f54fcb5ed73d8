use rand::RngCore;
use serde_json::Value;
use vrpsy_core::{ConfigError, Frame, ResultRow, Scene, SettingsDocument};

use crate::config::SessionSettings;

/// Whether a protocol needs more frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialStatus {
    Running,
    Finished,
}

/// Everything a protocol may touch while it is the active trial.
pub struct TrialContext<'a> {
    pub frame: &'a Frame,
    pub session: &'a SessionSettings,
    pub scene: &'a mut Scene,
    pub rng: &'a mut dyn RngCore,
}

/// One configurable stimulus-presentation-and-response protocol.
///
/// The session driver calls [`Trial::perform`] once to start an instance, then
/// [`Trial::update`] every frame until it returns [`TrialStatus::Finished`],
/// and only then [`Trial::retrieve_result_row`].
pub trait Trial {
    /// Trial type name; doubles as settings section and results table name.
    fn name(&self) -> &str;

    /// Result columns. Stable for the lifetime of the trial.
    fn column_names(&self) -> &[&'static str];

    fn prompt_text(&self) -> &str;

    fn repetitions(&self) -> usize;

    /// Default settings written to the template document.
    fn template_settings(&self) -> Result<Value, ConfigError>;

    /// Reads this trial's section (keyed by [`Trial::name`]).
    fn load_settings(&mut self, settings: &SettingsDocument) -> Result<(), ConfigError>;

    /// Starts a fresh instance of the protocol.
    fn perform(&mut self, ctx: &mut TrialContext<'_>);

    /// Advances the protocol by one frame.
    fn update(&mut self, ctx: &mut TrialContext<'_>) -> TrialStatus;

    /// Result of the instance that just finished.
    fn retrieve_result_row(&mut self) -> ResultRow;
}

pub(crate) fn template_of<T: serde::Serialize>(
    name: &str,
    settings: &T,
) -> Result<Value, ConfigError> {
    serde_json::to_value(settings).map_err(|source| ConfigError::Malformed {
        section: name.to_string(),
        source,
    })
}
