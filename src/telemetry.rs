//! Sampled mission snapshots and the sink they are pushed into.

use serde::{Deserialize, Serialize};

use crate::error::MaglevResult;
use crate::sim::phase::Phase;

/// One sampled row: time (s), speed (km/h), gap (mm) and phase label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub time: f64,
    pub speed_kmh: f64,
    pub gap_mm: f64,
    pub status: Phase,
}

/// Receives telemetry rows in tick order. Called synchronously from the
/// tick loop, after the tick's computation has finished.
pub trait TelemetrySink {
    fn record(&mut self, record: &TelemetryRecord) -> MaglevResult<()>;
}

impl TelemetrySink for Vec<TelemetryRecord> {
    fn record(&mut self, record: &TelemetryRecord) -> MaglevResult<()> {
        self.push(*record);
        Ok(())
    }
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for &mut S {
    fn record(&mut self, record: &TelemetryRecord) -> MaglevResult<()> {
        (**self).record(record)
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn record(&mut self, _record: &TelemetryRecord) -> MaglevResult<()> {
        Ok(())
    }
}
