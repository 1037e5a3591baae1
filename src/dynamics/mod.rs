pub mod constants;
pub mod longitudinal;

pub use constants::KMH_PER_MS;
pub use longitudinal::Dynamics;
