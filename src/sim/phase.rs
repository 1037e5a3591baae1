use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::error::MaglevResult;
use crate::vehicle::pod::require;

/// Operating phase of a mission, in flight-profile order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Levitating,
    Accel,
    Coast,
    Braking,
}

/// One row of the mission profile: from `starts_at` onward the pod is in
/// `phase` and the motor gets `throttle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseEntry {
    pub phase: Phase,
    pub starts_at: f64,               // s
    pub throttle: f64,                // [-1, 1]
    /// Per-tick velocity decay applied on top of `throttle` (braking friction).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction: Option<f64>,
}

impl PhaseEntry {
    pub fn new(phase: Phase, starts_at: f64, throttle: f64) -> Self {
        Self { phase, starts_at, throttle, friction: None }
    }

    pub fn with_friction(mut self, factor: f64) -> Self {
        self.friction = Some(factor);
        self
    }
}

/// Ordered, validated phase ladder. Lookup picks the last entry whose
/// threshold has been reached.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTable {
    entries: Vec<PhaseEntry>,
}

impl PhaseTable {
    pub fn new(entries: Vec<PhaseEntry>) -> MaglevResult<Self> {
        require(!entries.is_empty(), || "phase table is empty".into())?;
        require(entries[0].starts_at == 0.0, || {
            format!("first phase must start at 0.0, got {}", entries[0].starts_at)
        })?;
        for pair in entries.windows(2) {
            require(pair[1].starts_at > pair[0].starts_at, || {
                format!(
                    "phase thresholds not strictly increasing: {} ({}) then {} ({})",
                    pair[0].phase, pair[0].starts_at, pair[1].phase, pair[1].starts_at
                )
            })?;
        }
        for e in &entries {
            require(e.starts_at.is_finite(), || format!("{} threshold is not finite", e.phase))?;
            require((-1.0..=1.0).contains(&e.throttle), || {
                format!("{} throttle {} outside [-1, 1]", e.phase, e.throttle)
            })?;
            if let Some(f) = e.friction {
                require(f > 0.0 && f <= 1.0, || {
                    format!("{} friction {} outside (0, 1]", e.phase, f)
                })?;
            }
        }
        Ok(Self { entries })
    }

    pub fn lookup(&self, time: f64) -> &PhaseEntry {
        let idx = self.entries.partition_point(|e| e.starts_at <= time);
        &self.entries[idx.saturating_sub(1)]
    }

    pub fn entries(&self) -> &[PhaseEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn reference() -> PhaseTable {
        PhaseTable::new(vec![
            PhaseEntry::new(Phase::Levitating, 0.0, 0.0),
            PhaseEntry::new(Phase::Accel, 2.0, 0.8),
            PhaseEntry::new(Phase::Coast, 7.0, 0.0),
            PhaseEntry::new(Phase::Braking, 9.0, -0.5).with_friction(0.9),
        ])
        .unwrap()
    }

    #[test]
    fn labels_are_screaming_case() {
        let labels: Vec<String> = Phase::iter().map(|p| p.to_string()).collect();
        assert_eq!(labels, ["LEVITATING", "ACCEL", "COAST", "BRAKING"]);
    }

    #[test]
    fn thresholds_are_inclusive_lower_bounds() {
        let t = reference();
        assert_eq!(t.lookup(0.0).phase, Phase::Levitating);
        assert_eq!(t.lookup(1.999).phase, Phase::Levitating);
        assert_eq!(t.lookup(2.0).phase, Phase::Accel);
        assert_eq!(t.lookup(6.9).phase, Phase::Accel);
        assert_eq!(t.lookup(7.0).phase, Phase::Coast);
        assert_eq!(t.lookup(9.0).phase, Phase::Braking);
        assert_eq!(t.lookup(1e6).phase, Phase::Braking);
        assert_eq!(t.lookup(9.5).friction, Some(0.9));
    }

    #[test]
    fn rejects_malformed_tables() {
        assert!(PhaseTable::new(vec![]).is_err());
        assert!(PhaseTable::new(vec![PhaseEntry::new(Phase::Accel, 1.0, 0.5)]).is_err());
        assert!(PhaseTable::new(vec![
            PhaseEntry::new(Phase::Levitating, 0.0, 0.0),
            PhaseEntry::new(Phase::Accel, 2.0, 0.8),
            PhaseEntry::new(Phase::Coast, 2.0, 0.0),
        ])
        .is_err());
        assert!(PhaseTable::new(vec![PhaseEntry::new(Phase::Levitating, 0.0, 1.5)]).is_err());
        assert!(PhaseTable::new(vec![
            PhaseEntry::new(Phase::Levitating, 0.0, 0.0).with_friction(1.2),
        ])
        .is_err());
    }

    #[test]
    fn entry_json_shape() {
        let e: PhaseEntry =
            serde_json::from_str(r#"{"phase":"BRAKING","starts_at":9.0,"throttle":-0.5,"friction":0.9}"#)
                .unwrap();
        assert_eq!(e, PhaseEntry::new(Phase::Braking, 9.0, -0.5).with_friction(0.9));
    }
}
