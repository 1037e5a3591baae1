use crate::error::{check_dt, MaglevResult};

// ---------------------------------------------------------------------------
// PID Controller (single axis)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Pid {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Symmetric clamp on the integral term; `None` lets it run free.
    pub integral_limit: Option<f64>,
    integral: f64,
    prev_error: f64,
}

impl Pid {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd, integral_limit: None, integral: 0.0, prev_error: 0.0 }
    }

    pub fn with_integral_limit(mut self, limit: f64) -> Self {
        self.integral_limit = Some(limit.abs());
        self
    }

    /// One PID step. `prev_error` starts at zero, so the first call carries
    /// the full `error / dt` derivative kick.
    pub fn update(&mut self, error: f64, dt: f64) -> MaglevResult<f64> {
        check_dt(dt)?;
        self.integral += error * dt;
        if let Some(limit) = self.integral_limit {
            self.integral = self.integral.clamp(-limit, limit);
        }
        let derivative = (error - self.prev_error) / dt;
        self.prev_error = error;
        Ok(self.kp * error + self.ki * self.integral + self.kd * derivative)
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }
}
