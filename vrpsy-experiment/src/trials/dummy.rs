use serde::{Deserialize, Serialize};
use serde_json::Value;
use vrpsy_core::{ConfigError, ResultRow, SettingsDocument, seconds_to_ns};

use crate::trial::{Trial, TrialContext, TrialStatus, template_of};

const COLUMNS: &[&str] = &["ClickCount"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DummySettings {
    pub repetitions: usize,
    pub wait_time_seconds: f64,
}

impl Default for DummySettings {
    fn default() -> Self {
        Self {
            repetitions: 2,
            wait_time_seconds: 3.0,
        }
    }
}

/// Placeholder trial: shows a click pad and counts clicks until time runs out.
pub struct DummyTrial {
    name: String,
    settings: DummySettings,
    click_count: i64,
    shown_at: Option<u64>,
}

impl DummyTrial {
    pub fn new(name: &str) -> Self {
        Self::with_settings(name, DummySettings::default())
    }

    pub fn with_settings(name: &str, settings: DummySettings) -> Self {
        Self {
            name: name.to_string(),
            settings,
            click_count: 0,
            shown_at: None,
        }
    }

    pub fn button_clicked(&mut self) {
        self.click_count += 1;
    }
}

impl Trial for DummyTrial {
    fn name(&self) -> &str {
        &self.name
    }

    fn column_names(&self) -> &[&'static str] {
        COLUMNS
    }

    fn prompt_text(&self) -> &str {
        "Click!"
    }

    fn repetitions(&self) -> usize {
        self.settings.repetitions
    }

    fn template_settings(&self) -> Result<Value, ConfigError> {
        template_of(&self.name, &DummySettings::default())
    }

    fn load_settings(&mut self, settings: &SettingsDocument) -> Result<(), ConfigError> {
        self.settings = settings.section(&self.name)?.parse()?;
        Ok(())
    }

    fn perform(&mut self, ctx: &mut TrialContext<'_>) {
        self.click_count = 0;
        self.shown_at = Some(ctx.frame.now_ns);
        ctx.scene.click_pad = true;
    }

    fn update(&mut self, ctx: &mut TrialContext<'_>) -> TrialStatus {
        let Some(shown_at) = self.shown_at else {
            return TrialStatus::Finished;
        };
        if ctx.frame.input.click {
            self.button_clicked();
        }
        let elapsed = ctx.frame.now_ns.saturating_sub(shown_at);
        if elapsed >= seconds_to_ns(self.settings.wait_time_seconds) {
            ctx.scene.click_pad = false;
            self.shown_at = None;
            return TrialStatus::Finished;
        }
        TrialStatus::Running
    }

    fn retrieve_result_row(&mut self) -> ResultRow {
        ResultRow::new().with(COLUMNS[0], self.click_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionSettings;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use vrpsy_core::{CellValue, Frame, InputSample, Scene};

    #[test]
    fn counts_clicks_until_wait_elapses() {
        let mut trial = DummyTrial::with_settings(
            "Dummy",
            DummySettings {
                repetitions: 1,
                wait_time_seconds: 1.0,
            },
        );
        let session = SessionSettings::default();
        let mut scene = Scene::default();
        let mut rng = StdRng::seed_from_u64(0);
        let click = InputSample {
            click: true,
            ..InputSample::default()
        };

        let mut step = |now: u64, input: InputSample, trial: &mut DummyTrial| {
            let frame = Frame::new(now, 0, input);
            let mut ctx = TrialContext {
                frame: &frame,
                session: &session,
                scene: &mut scene,
                rng: &mut rng,
            };
            if now == 0 {
                trial.perform(&mut ctx);
                TrialStatus::Running
            } else {
                trial.update(&mut ctx)
            }
        };

        step(0, InputSample::default(), &mut trial);
        assert_eq!(step(100, click, &mut trial), TrialStatus::Running);
        assert_eq!(step(200, InputSample::default(), &mut trial), TrialStatus::Running);
        assert_eq!(step(300, click, &mut trial), TrialStatus::Running);
        assert_eq!(step(1_000_000_000, InputSample::default(), &mut trial), TrialStatus::Finished);
        assert!(!scene.click_pad);
        assert_eq!(
            trial.retrieve_result_row().get("ClickCount"),
            Some(&CellValue::Integer(2))
        );
    }

    #[test]
    fn perform_resets_count() {
        let mut trial = DummyTrial::new("Dummy");
        trial.button_clicked();
        let session = SessionSettings::default();
        let mut scene = Scene::default();
        let mut rng = StdRng::seed_from_u64(0);
        let frame = Frame::default();
        trial.perform(&mut TrialContext {
            frame: &frame,
            session: &session,
            scene: &mut scene,
            rng: &mut rng,
        });
        assert!(scene.click_pad);
        assert_eq!(trial.retrieve_result_row().len(), trial.column_names().len());
        assert_eq!(
            trial.retrieve_result_row().get("ClickCount"),
            Some(&CellValue::Integer(0))
        );
    }
}
