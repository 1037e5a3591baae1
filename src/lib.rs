pub mod logger;
pub mod error;
pub mod levitation;
pub mod dynamics;
pub mod vehicle;
pub mod sim;
pub mod telemetry;
pub mod io;

pub use error::{MaglevError, MaglevResult};
pub use sim::{MissionSequencer, MissionStatus, Phase};
pub use telemetry::{TelemetryRecord, TelemetrySink};
pub use vehicle::{presets, MissionBuilder, MissionConfig};
