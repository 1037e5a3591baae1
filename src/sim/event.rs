use std::fmt;

use crate::sim::phase::Phase;
use crate::sim::runner::TickReport;

// ---------------------------------------------------------------------------
// Mission events
// ---------------------------------------------------------------------------

/// Kinds of mission events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Activated,
    PhaseChange { from: Phase, to: Phase },
    Speed { threshold: f64, rising: bool },
    Aborted,
    Completed,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Activated => write!(f, "activated"),
            EventKind::PhaseChange { from, to } => write!(f, "{from} -> {to}"),
            EventKind::Speed { threshold, rising } => write!(
                f,
                "speed {} {:.1} km/h",
                if *rising { "above" } else { "below" },
                threshold
            ),
            EventKind::Aborted => write!(f, "aborted"),
            EventKind::Completed => write!(f, "completed"),
        }
    }
}

/// A discrete event, stamped with the tick it was raised on (0 = before the
/// first tick).
#[derive(Debug, Clone, PartialEq)]
pub struct MissionEvent {
    pub tick: usize,
    pub time: f64,
    pub kind: EventKind,
}

/// Passive detector run over consecutive tick reports.
pub trait EventDetector: Send {
    fn check(&mut self, prev: &TickReport, current: &TickReport) -> Option<EventKind>;
}

/// Fires on every phase transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseChangeDetector;

impl EventDetector for PhaseChangeDetector {
    fn check(&mut self, prev: &TickReport, current: &TickReport) -> Option<EventKind> {
        (prev.phase != current.phase).then_some(EventKind::PhaseChange {
            from: prev.phase,
            to: current.phase,
        })
    }
}

/// Fires once when speed crosses a threshold in the given direction.
#[derive(Debug, Clone)]
pub struct SpeedDetector {
    pub threshold: f64,
    pub rising: bool,
    fired: bool,
}

impl SpeedDetector {
    pub fn new(threshold: f64, rising: bool) -> Self {
        Self { threshold, rising, fired: false }
    }
}

impl EventDetector for SpeedDetector {
    fn check(&mut self, prev: &TickReport, current: &TickReport) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let crossed = if self.rising {
            prev.speed_kmh < self.threshold && current.speed_kmh >= self.threshold
        } else {
            prev.speed_kmh > self.threshold && current.speed_kmh <= self.threshold
        };
        if crossed {
            self.fired = true;
            Some(EventKind::Speed { threshold: self.threshold, rising: self.rising })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(tick: usize, phase: Phase, speed: f64) -> TickReport {
        TickReport {
            tick,
            time: tick as f64 * 0.1,
            phase,
            throttle: 0.0,
            measured_gap: 10.0,
            control_output: 0.0,
            gap_mm: 10.0,
            speed_kmh: speed,
            sampled: false,
        }
    }

    #[test]
    fn phase_change_detected() {
        let mut det = PhaseChangeDetector;
        let prev = report(19, Phase::Levitating, 0.0);
        let curr = report(20, Phase::Accel, 5.0);
        assert_eq!(
            det.check(&prev, &curr),
            Some(EventKind::PhaseChange { from: Phase::Levitating, to: Phase::Accel })
        );
        assert_eq!(det.check(&curr, &curr), None);
    }

    #[test]
    fn speed_detector_fires_once() {
        let mut det = SpeedDetector::new(100.0, true);
        let prev = report(1, Phase::Accel, 90.0);
        let curr = report(2, Phase::Accel, 105.0);
        assert!(det.check(&prev, &curr).is_some());
        assert!(det.check(&prev, &curr).is_none());
    }

    #[test]
    fn falling_speed_detector() {
        let mut det = SpeedDetector::new(10.0, false);
        assert!(det.check(&report(1, Phase::Braking, 20.0), &report(2, Phase::Braking, 12.0)).is_none());
        assert!(det.check(&report(2, Phase::Braking, 12.0), &report(3, Phase::Braking, 9.0)).is_some());
    }
}
