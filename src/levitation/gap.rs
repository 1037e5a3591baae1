use crate::error::MaglevResult;
use crate::vehicle::pod::LevitationParams;
use super::pid::Pid;

// ---------------------------------------------------------------------------
// Gap controller: PID on the air gap plus a first-order plant model
// ---------------------------------------------------------------------------

/// Holds the pod at a target air gap (mm).
///
/// `update` is the controller, `apply_actuation` is the plant. A real sensor
/// or actuator replaces one side without touching the other.
#[derive(Debug, Clone)]
pub struct GapController {
    target_gap: f64,
    pid: Pid,
    current_gap: f64,
    max_gap: f64,
    lift_factor: f64,
    active: bool,
}

impl GapController {
    pub fn new(params: &LevitationParams) -> MaglevResult<Self> {
        params.validate()?;
        let mut pid = Pid::new(params.kp, params.ki, params.kd);
        if let Some(limit) = params.integral_limit {
            pid = pid.with_integral_limit(limit);
        }
        Ok(Self {
            target_gap: params.target_gap,
            pid,
            current_gap: params.initial_gap,
            max_gap: params.max_gap,
            lift_factor: params.lift_factor,
            active: false,
        })
    }

    /// Arm the magnets. Idempotent.
    pub fn activate(&mut self) {
        if !self.active {
            crate::info!("[LEV] Levitation active, target gap {:.1} mm", self.target_gap);
        }
        self.active = true;
    }

    /// PID output for a measured gap. Inactive controllers return `0.0` and
    /// leave the integral and previous error untouched.
    pub fn update(&mut self, measured_gap: f64, dt: f64) -> MaglevResult<f64> {
        if !self.active {
            return Ok(0.0);
        }
        self.pid.update(self.target_gap - measured_gap, dt)
    }

    /// Plant response: move the gap by `control_output * lift_factor`,
    /// clamped to the mechanical range `[0, max_gap]`.
    pub fn apply_actuation(&mut self, control_output: f64) -> f64 {
        self.current_gap = (self.current_gap + control_output * self.lift_factor).clamp(0.0, self.max_gap);
        self.current_gap
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn target_gap(&self) -> f64 {
        self.target_gap
    }

    pub fn current_gap(&self) -> f64 {
        self.current_gap
    }

    pub fn max_gap(&self) -> f64 {
        self.max_gap
    }

    pub fn integral(&self) -> f64 {
        self.pid.integral()
    }

    pub fn previous_error(&self) -> f64 {
        self.pid.prev_error()
    }
}
