pub mod appearance;
pub mod color;
pub mod dummy;

pub use appearance::{AppearanceSettings, AppearanceTrial, HitIdentity, Outcome};
pub use color::{ColorSettings, ColorTrial};
pub use dummy::{DummySettings, DummyTrial};

use crate::trial::Trial;

/// The trial types a standard session registers.
pub fn default_registry() -> Vec<Box<dyn Trial>> {
    vec![
        Box::new(AppearanceTrial::new("Appearance")),
        Box::new(ColorTrial::new("Color")),
        Box::new(DummyTrial::new("Dummy")),
    ]
}
