use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::MaglevResult;
use crate::sim::runner::{MissionOutcome, MissionStatus};
use crate::telemetry::TelemetryRecord;

/// Summary statistics over a mission's sampled telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub mission: String,
    pub status: MissionStatus,
    pub ticks_run: usize,
    pub final_time_s: f64,
    pub final_speed_kmh: f64,
    pub top_speed_kmh: f64,
    pub min_gap_mm: f64,
    pub max_gap_mm: f64,
    pub target_gap_mm: f64,
    /// RMS of (gap - target) over the sampled rows.
    pub gap_rms_error_mm: f64,
    pub samples: usize,
}

impl MissionSummary {
    pub fn from_telemetry(
        mission: &str,
        target_gap: f64,
        outcome: &MissionOutcome,
        rows: &[TelemetryRecord],
    ) -> Self {
        let top_speed = rows.iter().map(|r| r.speed_kmh).fold(0.0_f64, f64::max);
        let (min_gap, max_gap) = if rows.is_empty() {
            (outcome.final_gap_mm, outcome.final_gap_mm)
        } else {
            rows.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| (lo.min(r.gap_mm), hi.max(r.gap_mm)))
        };
        let rms = if rows.is_empty() {
            0.0
        } else {
            let sq: f64 = rows.iter().map(|r| (r.gap_mm - target_gap).powi(2)).sum();
            (sq / rows.len() as f64).sqrt()
        };

        MissionSummary {
            mission: mission.to_string(),
            status: outcome.status,
            ticks_run: outcome.ticks_run,
            final_time_s: outcome.final_time,
            final_speed_kmh: outcome.final_speed_kmh,
            top_speed_kmh: top_speed.max(outcome.final_speed_kmh),
            min_gap_mm: min_gap,
            max_gap_mm: max_gap,
            target_gap_mm: target_gap,
            gap_rms_error_mm: rms,
            samples: rows.len(),
        }
    }
}

/// Write mission summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &MissionSummary) -> MaglevResult<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// Write mission summary JSON to a file.
pub fn write_summary_file(path: &str, summary: &MissionSummary) -> MaglevResult<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::phase::Phase;

    fn rows() -> Vec<TelemetryRecord> {
        vec![
            TelemetryRecord { time: 0.1, speed_kmh: 0.0, gap_mm: 10.0, status: Phase::Levitating },
            TelemetryRecord { time: 0.6, speed_kmh: 40.0, gap_mm: 14.0, status: Phase::Accel },
            TelemetryRecord { time: 1.1, speed_kmh: 20.0, gap_mm: 12.0, status: Phase::Braking },
        ]
    }

    fn outcome() -> MissionOutcome {
        MissionOutcome {
            status: MissionStatus::Complete,
            ticks_run: 11,
            final_time: 1.1,
            final_speed_kmh: 20.0,
            final_gap_mm: 12.0,
        }
    }

    #[test]
    fn summary_statistics() {
        let s = MissionSummary::from_telemetry("T", 12.0, &outcome(), &rows());
        assert_eq!(s.top_speed_kmh, 40.0);
        assert_eq!(s.min_gap_mm, 10.0);
        assert_eq!(s.max_gap_mm, 14.0);
        // sqrt((4 + 4 + 0) / 3)
        assert!((s.gap_rms_error_mm - (8.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.samples, 3);
    }

    #[test]
    fn empty_telemetry_falls_back_to_outcome() {
        let s = MissionSummary::from_telemetry("T", 12.0, &outcome(), &[]);
        assert_eq!(s.min_gap_mm, 12.0);
        assert_eq!(s.gap_rms_error_mm, 0.0);
        assert_eq!(s.top_speed_kmh, 20.0);
    }

    #[test]
    fn json_output_is_valid() {
        let s = MissionSummary::from_telemetry("Test", 12.0, &outcome(), &rows());
        let mut buf = Vec::new();
        write_summary(&mut buf, &s).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.contains("\"status\": \"COMPLETE\""));
        let back: MissionSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mission, "Test");
    }
}
