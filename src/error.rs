use thiserror::Error;

use crate::sim::runner::MissionStatus;

#[derive(Error, Debug)]
pub enum MaglevError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Mission already terminated with status {0}")]
    MissionOver(MissionStatus),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type MaglevResult<T> = Result<T, MaglevError>;

/// Reject a non-positive or non-finite timestep.
pub(crate) fn check_dt(dt: f64) -> MaglevResult<()> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(MaglevError::Config(format!("timestep must be > 0, got {dt}")))
    }
}
