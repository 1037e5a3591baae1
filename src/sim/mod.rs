pub mod event;
pub mod noise;
pub mod phase;
pub mod runner;

pub use event::{EventDetector, EventKind, MissionEvent, PhaseChangeDetector, SpeedDetector};
pub use noise::{NoNoise, NoiseSource, UniformNoise};
pub use phase::{Phase, PhaseEntry, PhaseTable};
pub use runner::{MissionOutcome, MissionSequencer, MissionStatus, TickReport};
