pub mod error;
pub mod geometry;
pub mod input;
pub mod settings;
pub mod stimulus;
pub mod trial;

pub use error::{ConfigError, TableError};
pub use geometry::{Pose, Ray, Vec2, Vec3, rotate_2d, visual_angle_to_distance};
pub use input::{Frame, InputSample, ns_to_seconds, seconds_to_ns};
pub use settings::{SettingsDocument, SettingsSection};
pub use stimulus::{Color, Cue, FixationDot, Scene, Target};
pub use trial::{CellValue, ResultRow, ResultsTable};
