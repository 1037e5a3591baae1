// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

/// m/s to km/h.
pub const KMH_PER_MS: f64 = 3.6;

// Reference pod: linear induction motor in a low-pressure tube
pub const REF_MAX_THRUST: f64 = 5_000.0; // N
pub const REF_MASS: f64 = 500.0;         // kg
pub const REF_DRAG_COEFF: f64 = 0.02;    // N / (km/h)^2
