use std::time::Duration;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tokio_util::sync::CancellationToken;

use crate::dynamics::Dynamics;
use crate::error::{MaglevError, MaglevResult};
use crate::levitation::GapController;
use crate::telemetry::{TelemetryRecord, TelemetrySink};
use crate::vehicle::MissionConfig;
use super::event::{EventDetector, EventKind, MissionEvent, PhaseChangeDetector};
use super::noise::{NoiseSource, UniformNoise};
use super::phase::{Phase, PhaseTable};

// ---------------------------------------------------------------------------
// Run status and per-tick results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    Ready,
    Running,
    Complete,
    Aborted,
}

impl MissionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, MissionStatus::Complete | MissionStatus::Aborted)
    }
}

/// Everything computed during one tick, sampled or not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: usize,                  // 1-based
    pub time: f64,                    // s
    pub phase: Phase,
    pub throttle: f64,
    pub measured_gap: f64,            // mm, gap model + sensor noise
    pub control_output: f64,
    pub gap_mm: f64,
    pub speed_kmh: f64,
    /// Whether this tick was forwarded to the telemetry sink.
    pub sampled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionOutcome {
    pub status: MissionStatus,
    pub ticks_run: usize,
    pub final_time: f64,
    pub final_speed_kmh: f64,
    pub final_gap_mm: f64,
}

// ---------------------------------------------------------------------------
// Mission sequencer
// ---------------------------------------------------------------------------

/// Fixed-rate driver coupling the gap loop and the propulsion model through
/// the phase table.
///
/// Each tick runs to completion before the next starts:
/// phase lookup -> braking decay -> noisy gap reading -> PID -> actuation ->
/// dynamics -> telemetry. Abort is polled between ticks only.
pub struct MissionSequencer<N: NoiseSource> {
    name: String,
    dt: f64,
    tick_count: usize,
    sample_every: usize,
    pacing: Duration,
    phases: PhaseTable,
    gap: GapController,
    dynamics: Dynamics,
    noise: N,
    tick: usize,
    clock: f64,
    status: MissionStatus,
    abort: CancellationToken,
    detectors: Vec<Box<dyn EventDetector>>,
    events: Vec<MissionEvent>,
    last: Option<TickReport>,
}

impl MissionSequencer<UniformNoise<StdRng>> {
    /// Sequencer with uniform gap noise, seeded from the config when a seed
    /// is given.
    pub fn from_config(config: &MissionConfig) -> MaglevResult<Self> {
        let amplitude = config.sensor.noise_amplitude;
        let noise = match config.sensor.seed {
            Some(seed) => UniformNoise::seeded(amplitude, seed)?,
            None => UniformNoise::from_entropy(amplitude)?,
        };
        Self::new(config, noise)
    }
}

impl<N: NoiseSource> MissionSequencer<N> {
    pub fn new(config: &MissionConfig, noise: N) -> MaglevResult<Self> {
        config.validate()?;
        Ok(Self {
            name: config.name.clone(),
            dt: config.dt,
            tick_count: config.tick_count,
            sample_every: config.sample_every,
            pacing: Duration::from_millis(config.realtime_pacing_ms.unwrap_or(0)),
            phases: config.phase_table()?,
            gap: GapController::new(&config.levitation)?,
            dynamics: Dynamics::new(&config.propulsion)?,
            noise,
            tick: 0,
            clock: 0.0,
            status: MissionStatus::Ready,
            abort: CancellationToken::new(),
            detectors: vec![Box::new(PhaseChangeDetector)],
            events: Vec::new(),
            last: None,
        })
    }

    pub fn add_detector(&mut self, detector: Box<dyn EventDetector>) {
        self.detectors.push(detector);
    }

    /// Arm levitation and propulsion. Idempotent.
    pub fn activate(&mut self) {
        if self.gap.is_active() && self.dynamics.is_active() {
            return;
        }
        self.gap.activate();
        self.dynamics.activate();
        self.push_event(EventKind::Activated);
    }

    /// Request an abort. Takes effect before the next tick.
    pub fn abort(&self) {
        self.abort.cancel();
    }

    /// Token that aborts this mission when cancelled from elsewhere.
    pub fn abort_handle(&self) -> CancellationToken {
        self.abort.clone()
    }

    /// Advance one tick. Fails with [`MaglevError::MissionOver`] once the
    /// mission has completed or been aborted.
    pub fn tick<S: TelemetrySink + ?Sized>(&mut self, sink: &mut S) -> MaglevResult<TickReport> {
        self.poll_abort();
        if self.status.is_terminal() {
            return Err(MaglevError::MissionOver(self.status));
        }
        self.status = MissionStatus::Running;

        let tick = self.tick + 1;
        let time = tick as f64 * self.dt;
        let entry = self.phases.lookup(time);
        let (phase, throttle) = (entry.phase, entry.throttle);
        if let Some(factor) = entry.friction {
            self.dynamics.apply_decay(factor);
        }

        let measured_gap = self.gap.current_gap() + self.noise.sample();
        let control_output = self.gap.update(measured_gap, self.dt)?;
        let gap_mm = self.gap.apply_actuation(control_output);
        let speed_kmh = self.dynamics.integrate(throttle, self.dt)?;

        self.tick = tick;
        self.clock = time;

        let report = TickReport {
            tick,
            time,
            phase,
            throttle,
            measured_gap,
            control_output,
            gap_mm,
            speed_kmh,
            sampled: (tick - 1) % self.sample_every == 0,
        };
        crate::event!(
            "[MSN] tick {tick} t={time:.1}s {phase} thr={throttle:+.2} gap={gap_mm:.3}mm v={speed_kmh:.2}km/h"
        );

        if let Some(prev) = self.last {
            let fired: Vec<EventKind> = self
                .detectors
                .iter_mut()
                .filter_map(|d| d.check(&prev, &report))
                .collect();
            for kind in fired {
                self.push_event(kind);
            }
        }
        self.last = Some(report);

        if tick >= self.tick_count {
            self.status = MissionStatus::Complete;
            self.push_event(EventKind::Completed);
        }

        // Sink goes last: the tick is fully committed even if recording fails.
        if report.sampled {
            sink.record(&TelemetryRecord { time, speed_kmh, gap_mm, status: phase })?;
        }
        Ok(report)
    }

    /// Activate, then tick until the configured count is reached or an abort
    /// is requested.
    pub fn run_mission<S: TelemetrySink + ?Sized>(&mut self, sink: &mut S) -> MaglevResult<MissionOutcome> {
        self.activate();
        crate::info!("[MSN] Mission start: {} ({} ticks, dt={} s)", self.name, self.tick_count, self.dt);
        loop {
            self.poll_abort();
            if self.status.is_terminal() {
                break;
            }
            self.tick(&mut *sink)?;
            if !self.pacing.is_zero() && !self.status.is_terminal() {
                std::thread::sleep(self.pacing);
            }
        }
        Ok(self.outcome())
    }

    pub fn outcome(&self) -> MissionOutcome {
        MissionOutcome {
            status: self.status,
            ticks_run: self.tick,
            final_time: self.clock,
            final_speed_kmh: self.dynamics.velocity(),
            final_gap_mm: self.gap.current_gap(),
        }
    }

    pub fn status(&self) -> MissionStatus {
        self.status
    }

    /// Simulated seconds elapsed.
    pub fn mission_clock(&self) -> f64 {
        self.clock
    }

    pub fn ticks_run(&self) -> usize {
        self.tick
    }

    pub fn current_gap(&self) -> f64 {
        self.gap.current_gap()
    }

    pub fn velocity(&self) -> f64 {
        self.dynamics.velocity()
    }

    pub fn gap_controller(&self) -> &GapController {
        &self.gap
    }

    pub fn dynamics(&self) -> &Dynamics {
        &self.dynamics
    }

    pub fn events(&self) -> &[MissionEvent] {
        &self.events
    }

    fn poll_abort(&mut self) {
        if self.abort.is_cancelled() && !self.status.is_terminal() {
            self.dynamics.emergency_brake();
            self.status = MissionStatus::Aborted;
            self.push_event(EventKind::Aborted);
        }
    }

    fn push_event(&mut self, kind: EventKind) {
        match kind {
            EventKind::Aborted => {
                crate::warn!("[MSN] t={:.1}s mission ABORTED after {} ticks", self.clock, self.tick)
            }
            _ => crate::info!("[MSN] t={:.1}s {}", self.clock, kind),
        }
        self.events.push(MissionEvent { tick: self.tick, time: self.clock, kind });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::event::SpeedDetector;
    use crate::sim::noise::NoNoise;
    use crate::telemetry::NullSink;
    use crate::vehicle::{presets, MissionBuilder};

    fn quiet() -> MissionSequencer<NoNoise> {
        MissionSequencer::new(&presets::reference(), NoNoise).unwrap()
    }

    #[test]
    fn reference_phase_ladder() {
        let mut seq = quiet();
        seq.activate();
        let mut phases = Vec::new();
        for _ in 0..100 {
            phases.push(seq.tick(&mut NullSink).unwrap().phase);
        }
        for (i, p) in phases.iter().enumerate() {
            let tick = i + 1;
            let expected = match tick {
                1..=19 => Phase::Levitating,
                20..=69 => Phase::Accel,
                70..=89 => Phase::Coast,
                _ => Phase::Braking,
            };
            assert_eq!(*p, expected, "tick {tick}");
        }
        assert_eq!(seq.mission_clock(), 10.0);
        assert_eq!(seq.status(), MissionStatus::Complete);
    }

    #[test]
    fn telemetry_is_decimated() {
        let mut seq = quiet();
        let mut rows = Vec::new();
        let outcome = seq.run_mission(&mut rows).unwrap();
        assert_eq!(outcome.status, MissionStatus::Complete);
        assert_eq!(outcome.ticks_run, 100);
        assert_eq!(rows.len(), 20);
        assert!((rows[0].time - 0.1).abs() < 1e-12);
        assert!((rows[1].time - 0.6).abs() < 1e-12);
        assert!((rows[19].time - 9.6).abs() < 1e-12);
        assert!(rows.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn speed_builds_then_bleeds_off() {
        let mut seq = quiet();
        let mut reports = Vec::new();
        seq.activate();
        for _ in 0..100 {
            reports.push(seq.tick(&mut NullSink).unwrap());
        }
        assert_eq!(reports[18].speed_kmh, 0.0, "no thrust while hovering");
        let peak = reports[68].speed_kmh;
        assert!(peak > 100.0, "peak {peak}");
        assert!(reports[99].speed_kmh < reports[88].speed_kmh);
    }

    #[test]
    fn inactive_tick_produces_no_motion() {
        let mut seq = quiet();
        let r = seq.tick(&mut NullSink).unwrap();
        assert_eq!(r.control_output, 0.0);
        assert_eq!(r.speed_kmh, 0.0);
        assert_eq!(r.gap_mm, 0.0);
    }

    #[test]
    fn tick_after_completion_fails() {
        let mut seq = MissionSequencer::new(&MissionBuilder::new("one").tick_count(1).build().unwrap(), NoNoise)
            .unwrap();
        seq.run_mission(&mut NullSink).unwrap();
        assert!(matches!(
            seq.tick(&mut NullSink),
            Err(MaglevError::MissionOver(MissionStatus::Complete))
        ));
    }

    #[test]
    fn abort_brakes_and_stops() {
        let mut seq = quiet();
        seq.activate();
        for _ in 0..50 {
            seq.tick(&mut NullSink).unwrap();
        }
        assert!(seq.velocity() > 0.0);
        seq.abort();
        let outcome = seq.run_mission(&mut NullSink).unwrap();
        assert_eq!(outcome.status, MissionStatus::Aborted);
        assert_eq!(outcome.ticks_run, 50);
        assert_eq!(outcome.final_speed_kmh, 0.0);
        assert_eq!(seq.events().last().map(|e| &e.kind), Some(&EventKind::Aborted));
    }

    #[test]
    fn abort_handle_from_another_owner() {
        let mut seq = quiet();
        let handle = seq.abort_handle();
        handle.cancel();
        let mut rows = Vec::new();
        let outcome = seq.run_mission(&mut rows).unwrap();
        assert_eq!(outcome.status, MissionStatus::Aborted);
        assert_eq!(outcome.ticks_run, 0);
        assert!(rows.is_empty());
    }

    #[test]
    fn phase_changes_are_recorded() {
        let mut seq = quiet();
        seq.add_detector(Box::new(SpeedDetector::new(50.0, true)));
        seq.run_mission(&mut NullSink).unwrap();
        let changes: Vec<(usize, Phase)> = seq
            .events()
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::PhaseChange { to, .. } => Some((e.tick, to)),
                _ => None,
            })
            .collect();
        assert_eq!(changes, [(20, Phase::Accel), (70, Phase::Coast), (90, Phase::Braking)]);
        assert!(seq.events().iter().any(|e| matches!(e.kind, EventKind::Speed { .. })));
        assert_eq!(seq.events().first().map(|e| &e.kind), Some(&EventKind::Activated));
        assert_eq!(seq.events().last().map(|e| &e.kind), Some(&EventKind::Completed));
    }

    #[test]
    fn noise_reaches_the_controller() {
        let cfg = presets::reference();
        let mut seq = MissionSequencer::new(&cfg, || 0.25).unwrap();
        seq.activate();
        let r = seq.tick(&mut NullSink).unwrap();
        assert_eq!(r.measured_gap, 0.25);
    }
}
