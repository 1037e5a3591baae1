use hyperpod_sim::sim::{MissionSequencer, NoiseSource};
use hyperpod_sim::telemetry::TelemetryRecord;
use hyperpod_sim::vehicle::MissionBuilder;

/// Sensor that reads a fixed offset high, plus a slow sinusoidal wobble.
struct BiasedSensor {
    bias: f64,
    phase: f64,
}

impl NoiseSource for BiasedSensor {
    fn sample(&mut self) -> f64 {
        self.phase += 0.3;
        self.bias + 0.2 * self.phase.sin()
    }
}

fn main() {
    let config = MissionBuilder::new("Biased sensor demo")
        .target_gap(12.0)
        .sample_every(10)
        .build()
        .expect("valid mission");

    let sensor = BiasedSensor { bias: 0.8, phase: 0.0 };
    let mut seq = MissionSequencer::new(&config, sensor).expect("valid sequencer");

    let mut rows: Vec<TelemetryRecord> = Vec::new();
    let outcome = seq.run_mission(&mut rows).expect("mission runs");

    for r in &rows {
        println!("{:>5.1}s  {:>8.2} km/h  {:>6.2} mm  {}", r.time, r.speed_kmh, r.gap_mm, r.status);
    }
    // A biased sensor makes the loop settle below the true target.
    println!(
        "{}: final gap {:.2} mm (target {:.1}), final speed {:.2} km/h",
        outcome.status, outcome.final_gap_mm, config.levitation.target_gap, outcome.final_speed_kmh
    );
}
