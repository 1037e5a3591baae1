use serde::{Deserialize, Serialize};

use crate::dynamics::constants::{REF_DRAG_COEFF, REF_MASS, REF_MAX_THRUST};
use crate::error::{MaglevError, MaglevResult};

// ---------------------------------------------------------------------------
// Levitation subsystem parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevitationParams {
    pub target_gap: f64,              // mm
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub max_gap: f64,                 // mm, mechanical stop
    pub lift_factor: f64,             // mm per unit of control output
    #[serde(default)]
    pub initial_gap: f64,             // mm, 0 = resting on the track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integral_limit: Option<f64>,
}

impl Default for LevitationParams {
    fn default() -> Self {
        Self {
            target_gap: 10.0,
            kp: 1.5,
            ki: 0.2,
            kd: 0.05,
            max_gap: 20.0,
            lift_factor: 0.1,
            initial_gap: 0.0,
            integral_limit: None,
        }
    }
}

impl LevitationParams {
    pub fn validate(&self) -> MaglevResult<()> {
        for (name, v) in [("kp", self.kp), ("ki", self.ki), ("kd", self.kd)] {
            require(v.is_finite() && v >= 0.0, || format!("gain {name} must be >= 0, got {v}"))?;
        }
        require(self.max_gap.is_finite() && self.max_gap > 0.0, || {
            format!("max_gap must be > 0, got {}", self.max_gap)
        })?;
        require((0.0..=self.max_gap).contains(&self.target_gap), || {
            format!("target_gap {} outside [0, {}]", self.target_gap, self.max_gap)
        })?;
        require((0.0..=self.max_gap).contains(&self.initial_gap), || {
            format!("initial_gap {} outside [0, {}]", self.initial_gap, self.max_gap)
        })?;
        require(self.lift_factor.is_finite() && self.lift_factor > 0.0, || {
            format!("lift_factor must be > 0, got {}", self.lift_factor)
        })?;
        if let Some(limit) = self.integral_limit {
            require(limit.is_finite() && limit > 0.0, || {
                format!("integral_limit must be > 0, got {limit}")
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Propulsion (linear motor) parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropulsionParams {
    pub max_thrust: f64,              // N at full throttle
    pub mass: f64,                    // kg
    pub drag_coeff: f64,              // N / (km/h)^2, low-pressure tube
}

impl Default for PropulsionParams {
    fn default() -> Self {
        Self {
            max_thrust: REF_MAX_THRUST,
            mass: REF_MASS,
            drag_coeff: REF_DRAG_COEFF,
        }
    }
}

impl PropulsionParams {
    pub fn validate(&self) -> MaglevResult<()> {
        require(self.mass.is_finite() && self.mass > 0.0, || {
            format!("mass must be > 0, got {}", self.mass)
        })?;
        require(self.max_thrust.is_finite() && self.max_thrust >= 0.0, || {
            format!("max_thrust must be >= 0, got {}", self.max_thrust)
        })?;
        require(self.drag_coeff.is_finite() && self.drag_coeff >= 0.0, || {
            format!("drag_coeff must be >= 0, got {}", self.drag_coeff)
        })
    }
}

pub(crate) fn require(ok: bool, msg: impl FnOnce() -> String) -> MaglevResult<()> {
    if ok {
        Ok(())
    } else {
        Err(MaglevError::Config(msg()))
    }
}
