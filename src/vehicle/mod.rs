pub mod mission;
pub mod pod;

pub use mission::{presets, MissionBuilder, MissionConfig, SensorParams};
pub use pod::{LevitationParams, PropulsionParams};
