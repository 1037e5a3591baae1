use crate::error::{check_dt, MaglevResult};
use crate::vehicle::pod::PropulsionParams;
use super::constants::KMH_PER_MS;

// ---------------------------------------------------------------------------
// Longitudinal dynamics (1DOF, forward Euler)
// ---------------------------------------------------------------------------

/// Speed along the track under motor thrust and quadratic drag.
///
/// Forces modeled:
///   1. Thrust — `throttle * max_thrust`, signed (negative = reverse thrust)
///   2. Drag   — `drag_coeff * v^2`, always opposing forward motion
///
/// Velocity is kept in km/h and never goes negative.
#[derive(Debug, Clone)]
pub struct Dynamics {
    max_thrust: f64,
    mass: f64,
    drag_coeff: f64,
    velocity: f64,
    active: bool,
}

impl Dynamics {
    pub fn new(params: &PropulsionParams) -> MaglevResult<Self> {
        params.validate()?;
        Ok(Self {
            max_thrust: params.max_thrust,
            mass: params.mass,
            drag_coeff: params.drag_coeff,
            velocity: 0.0,
            active: false,
        })
    }

    /// Bring the inverters online. Idempotent.
    pub fn activate(&mut self) {
        if !self.active {
            crate::info!("[PROP] Inverters online, max thrust {:.0} N", self.max_thrust);
        }
        self.active = true;
    }

    /// Advance speed by one step. `throttle` is clamped to `[-1, 1]`.
    /// Inactive motors return `0.0` and leave the velocity alone.
    pub fn integrate(&mut self, throttle: f64, dt: f64) -> MaglevResult<f64> {
        if !self.active {
            return Ok(0.0);
        }
        check_dt(dt)?;
        let thrust = throttle.clamp(-1.0, 1.0) * self.max_thrust;
        let drag = self.drag_coeff * self.velocity * self.velocity;
        let accel = (thrust - drag) / self.mass;
        self.velocity = (self.velocity + accel * dt * KMH_PER_MS).max(0.0);
        Ok(self.velocity)
    }

    /// Multiplicative speed decay (track friction during braking).
    pub fn apply_decay(&mut self, factor: f64) {
        self.velocity = (self.velocity * factor).max(0.0);
    }

    /// Idealized instantaneous stop. A real pod would ramp down under bounded
    /// reverse thrust; the simulation zeroes the speed outright.
    pub fn emergency_brake(&mut self) {
        crate::warn!("[PROP] Emergency brake at {:.2} km/h", self.velocity);
        self.velocity = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current speed, km/h.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Dynamics {
        let mut d = Dynamics::new(&PropulsionParams::default()).unwrap();
        d.activate();
        d
    }

    #[test]
    fn full_throttle_from_rest() {
        let mut d = engine();
        // a = 5000 / 500 = 10 m/s^2 -> 10 * 0.1 * 3.6 = 3.6 km/h
        let v = d.integrate(1.0, 0.1).unwrap();
        assert!((v - 3.6).abs() < 1e-12);
    }

    #[test]
    fn drag_uses_current_speed() {
        let mut d = engine();
        d.integrate(1.0, 1.0).unwrap(); // 36 km/h
        let v0 = d.velocity();
        let v1 = d.integrate(0.0, 0.1).unwrap();
        let expected = v0 - 0.02 * v0 * v0 / 500.0 * 0.1 * 3.6;
        assert!((v1 - expected).abs() < 1e-12);
    }

    #[test]
    fn reverse_thrust_stops_at_zero() {
        let mut d = engine();
        d.integrate(0.5, 0.1).unwrap();
        let v = d.integrate(-1.0, 1.0).unwrap();
        assert_eq!(v, 0.0);
    }

    #[test]
    fn inactive_integrate_is_inert() {
        let mut d = Dynamics::new(&PropulsionParams::default()).unwrap();
        assert_eq!(d.integrate(1.0, 0.1).unwrap(), 0.0);
        assert_eq!(d.velocity(), 0.0);
    }

    #[test]
    fn emergency_brake_zeroes_speed() {
        let mut d = engine();
        d.integrate(1.0, 2.0).unwrap();
        assert!(d.velocity() > 0.0);
        d.emergency_brake();
        assert_eq!(d.velocity(), 0.0);
    }

    #[test]
    fn decay_scales_speed() {
        let mut d = engine();
        d.integrate(1.0, 1.0).unwrap();
        let v = d.velocity();
        d.apply_decay(0.9);
        assert!((d.velocity() - v * 0.9).abs() < 1e-12);
    }

    #[test]
    fn terminal_speed_balances_drag() {
        let mut d = engine();
        for _ in 0..20_000 {
            d.integrate(1.0, 0.01).unwrap();
        }
        // thrust == drag  ->  v = sqrt(5000 / 0.02) = 500 km/h
        assert!((d.velocity() - 500.0).abs() < 1.0, "v = {}", d.velocity());
    }

    #[test]
    fn bad_dt_rejected() {
        let mut d = engine();
        assert!(d.integrate(1.0, 0.0).is_err());
        assert_eq!(d.velocity(), 0.0);
    }
}
