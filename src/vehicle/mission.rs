use serde::{Deserialize, Serialize};

use crate::error::{check_dt, MaglevResult};
use crate::sim::phase::{Phase, PhaseEntry, PhaseTable};
use super::pod::{require, LevitationParams, PropulsionParams};

// ---------------------------------------------------------------------------
// Mission: pod parameters + flight profile + loop timing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorParams {
    pub noise_amplitude: f64,         // mm, uniform +/-
    /// Fixed seed for reproducible runs; `None` draws from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self { noise_amplitude: 0.5, seed: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionConfig {
    pub name: String,
    pub dt: f64,                      // s per tick
    pub tick_count: usize,
    /// Telemetry decimation: record tick 1 and every `sample_every`-th after.
    pub sample_every: usize,
    pub levitation: LevitationParams,
    pub propulsion: PropulsionParams,
    #[serde(default)]
    pub sensor: SensorParams,
    pub phases: Vec<PhaseEntry>,
    /// Wall-clock sleep between ticks, for live console runs. `None` leaves
    /// the choice to the caller; `Some(0)` runs unpaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realtime_pacing_ms: Option<u64>,
}

impl MissionConfig {
    /// Load a mission from a JSON file and validate it.
    pub fn from_file(path: &str) -> MaglevResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> MaglevResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> MaglevResult<()> {
        check_dt(self.dt)?;
        require(self.tick_count > 0, || "tick_count must be > 0".into())?;
        require(self.sample_every > 0, || "sample_every must be > 0".into())?;
        require(
            self.sensor.noise_amplitude.is_finite() && self.sensor.noise_amplitude >= 0.0,
            || format!("noise_amplitude must be >= 0, got {}", self.sensor.noise_amplitude),
        )?;
        self.levitation.validate()?;
        self.propulsion.validate()?;
        self.phase_table().map(|_| ())
    }

    pub fn phase_table(&self) -> MaglevResult<PhaseTable> {
        PhaseTable::new(self.phases.clone())
    }

    /// Simulated length of the full mission, s.
    pub fn duration(&self) -> f64 {
        self.tick_count as f64 * self.dt
    }
}

// ---------------------------------------------------------------------------
// Mission builder
// ---------------------------------------------------------------------------

/// Fluent construction starting from the reference profile.
pub struct MissionBuilder {
    config: MissionConfig,
}

impl MissionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let mut config = presets::reference();
        config.name = name.into();
        Self { config }
    }

    pub fn dt(mut self, v: f64) -> Self { self.config.dt = v; self }
    pub fn tick_count(mut self, v: usize) -> Self { self.config.tick_count = v; self }
    pub fn sample_every(mut self, v: usize) -> Self { self.config.sample_every = v; self }
    pub fn levitation(mut self, v: LevitationParams) -> Self { self.config.levitation = v; self }
    pub fn propulsion(mut self, v: PropulsionParams) -> Self { self.config.propulsion = v; self }
    pub fn target_gap(mut self, v: f64) -> Self { self.config.levitation.target_gap = v; self }
    pub fn gains(mut self, kp: f64, ki: f64, kd: f64) -> Self {
        self.config.levitation.kp = kp;
        self.config.levitation.ki = ki;
        self.config.levitation.kd = kd;
        self
    }
    pub fn noise(mut self, amplitude: f64) -> Self { self.config.sensor.noise_amplitude = amplitude; self }
    pub fn seed(mut self, seed: u64) -> Self { self.config.sensor.seed = Some(seed); self }
    pub fn pacing_ms(mut self, v: u64) -> Self { self.config.realtime_pacing_ms = Some(v); self }

    /// Replace the flight profile.
    pub fn phases(mut self, phases: Vec<PhaseEntry>) -> Self {
        self.config.phases = phases;
        self
    }

    pub fn build(self) -> MaglevResult<MissionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ---------------------------------------------------------------------------
// Preset missions
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Station A -> Station B demo run: hover 2 s, accelerate to 7 s, coast
    /// to 9 s, brake until 10 s.
    pub fn reference() -> MissionConfig {
        MissionConfig {
            name: "Station A -> Station B".into(),
            dt: 0.1,
            tick_count: 100,
            sample_every: 5,
            levitation: LevitationParams {
                target_gap: 12.0,
                ..LevitationParams::default()
            },
            propulsion: PropulsionParams::default(),
            sensor: SensorParams::default(),
            phases: vec![
                PhaseEntry::new(Phase::Levitating, 0.0, 0.0),
                PhaseEntry::new(Phase::Accel, 2.0, 0.8),
                PhaseEntry::new(Phase::Coast, 7.0, 0.0),
                PhaseEntry::new(Phase::Braking, 9.0, -0.5).with_friction(0.9),
            ],
            realtime_pacing_ms: None,
        }
    }
}
