use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use vrpsy_core::{Color, ConfigError, ResultRow, SettingsDocument, seconds_to_ns};

use crate::trial::{Trial, TrialContext, TrialStatus, template_of};

const COLUMNS: &[&str] = &["PresentationDelay"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColorSettings {
    pub repetitions: usize,
    /// Seconds the sphere stays visible.
    pub presentation_delay: f64,
    pub colors: Vec<Color>,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            repetitions: 10,
            presentation_delay: 1.0,
            colors: vec![[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]],
        }
    }
}

/// Flashes a sphere in a random palette color.
pub struct ColorTrial {
    name: String,
    settings: ColorSettings,
    shown_at: Option<u64>,
}

impl ColorTrial {
    pub fn new(name: &str) -> Self {
        Self::with_settings(name, ColorSettings::default())
    }

    pub fn with_settings(name: &str, settings: ColorSettings) -> Self {
        Self {
            name: name.to_string(),
            settings,
            shown_at: None,
        }
    }
}

impl Trial for ColorTrial {
    fn name(&self) -> &str {
        &self.name
    }

    fn column_names(&self) -> &[&'static str] {
        COLUMNS
    }

    fn prompt_text(&self) -> &str {
        "Color Change!"
    }

    fn repetitions(&self) -> usize {
        self.settings.repetitions
    }

    fn template_settings(&self) -> Result<Value, ConfigError> {
        template_of(&self.name, &ColorSettings::default())
    }

    fn load_settings(&mut self, settings: &SettingsDocument) -> Result<(), ConfigError> {
        let parsed: ColorSettings = settings.section(&self.name)?.parse()?;
        if parsed.colors.is_empty() {
            return Err(ConfigError::Invalid {
                section: self.name.clone(),
                reason: "Colors must not be empty".into(),
            });
        }
        if parsed.presentation_delay < 0.0 {
            return Err(ConfigError::Invalid {
                section: self.name.clone(),
                reason: "PresentationDelay must be non-negative".into(),
            });
        }
        self.settings = parsed;
        Ok(())
    }

    fn perform(&mut self, ctx: &mut TrialContext<'_>) {
        let color = self
            .settings
            .colors
            .choose(&mut *ctx.rng)
            .copied()
            .unwrap_or([255, 255, 255, 255]);
        debug!(trial = %self.name, ?color, "showing sphere");
        ctx.scene.sphere = Some(color);
        self.shown_at = Some(ctx.frame.now_ns);
    }

    fn update(&mut self, ctx: &mut TrialContext<'_>) -> TrialStatus {
        let Some(shown_at) = self.shown_at else {
            return TrialStatus::Finished;
        };
        let elapsed = ctx.frame.now_ns.saturating_sub(shown_at);
        if elapsed >= seconds_to_ns(self.settings.presentation_delay) {
            ctx.scene.sphere = None;
            self.shown_at = None;
            return TrialStatus::Finished;
        }
        TrialStatus::Running
    }

    fn retrieve_result_row(&mut self) -> ResultRow {
        ResultRow::new().with(COLUMNS[0], self.settings.presentation_delay)
    }
}
