//! Landing outcomes and weighted outcome selection
//!
//! The outcome table is validated once on construction. After that,
//! selection is a pure function of the random draw.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed drift between the probability sum and 1.0
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Configuration errors for the outcome table and settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("outcome table is empty")]
    Empty,
    #[error("outcome {kind:?} has negative probability {probability}")]
    NegativeProbability { kind: OutcomeKind, probability: f64 },
    #[error("outcome {kind:?} has non-finite probability")]
    NonFiniteProbability { kind: OutcomeKind },
    #[error("outcome probabilities sum to {sum}, expected 1.0")]
    ProbabilitySum { sum: f64 },
    #[error("outcome {kind:?} appears more than once")]
    DuplicateOutcome { kind: OutcomeKind },
    #[error("outcome {kind:?} has is_success = {is_success}; only perfect landings count as a success")]
    SuccessMismatch { kind: OutcomeKind, is_success: bool },
    #[error("invalid settings json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How the thrown actor ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeKind {
    /// Full rotation, caught upright
    Perfect,
    /// Lands on its head, poking the hand
    UpsideDown,
    /// Misses the hand and drops to the ground
    Fallen,
}

impl OutcomeKind {
    pub const ALL: [OutcomeKind; 3] = [
        OutcomeKind::Perfect,
        OutcomeKind::UpsideDown,
        OutcomeKind::Fallen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Perfect => "perfect",
            OutcomeKind::UpsideDown => "upside-down",
            OutcomeKind::Fallen => "fallen",
        }
    }

    /// Visual tag applied to the actor while the result is shown
    pub fn tag(&self) -> &'static str {
        match self {
            OutcomeKind::Perfect => "landed-perfect",
            OutcomeKind::UpsideDown => "landed-upside",
            OutcomeKind::Fallen => "landed-fallen",
        }
    }
}

/// One row of the outcome table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(rename = "name")]
    pub kind: OutcomeKind,
    /// Final rotation target (degrees)
    pub rotation: f32,
    /// Chance of this outcome (0..1)
    pub probability: f64,
    pub is_success: bool,
}

impl Outcome {
    pub const fn new(kind: OutcomeKind, rotation: f32, probability: f64, is_success: bool) -> Self {
        Self {
            kind,
            rotation,
            probability,
            is_success,
        }
    }
}

/// Weighted random selection over an ordered outcome slice.
///
/// Each entry owns the half-open interval `[previous cumulative, cumulative)`,
/// so `r` equal to a cumulative edge selects the following entry. If float
/// drift leaves `r` at or above the final cumulative sum, the first entry is
/// returned and the drift is logged.
pub fn select_outcome(table: &[Outcome], r: f64) -> Result<&Outcome, ConfigError> {
    let first = table.first().ok_or(ConfigError::Empty)?;
    if let Some(bad) = table.iter().find(|o| o.probability < 0.0) {
        return Err(ConfigError::NegativeProbability {
            kind: bad.kind,
            probability: bad.probability,
        });
    }

    let mut cumulative = 0.0;
    for outcome in table {
        cumulative += outcome.probability;
        if r < cumulative {
            return Ok(outcome);
        }
    }

    log::warn!(
        "Draw {} exceeded cumulative probability {}, falling back to {}",
        r,
        cumulative,
        first.kind.as_str()
    );
    Ok(first)
}

/// Validated, ordered outcome table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutcomeTable {
    outcomes: Vec<Outcome>,
}

impl OutcomeTable {
    /// Validate and build a table
    pub fn new(outcomes: Vec<Outcome>) -> Result<Self, ConfigError> {
        if outcomes.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut seen = Vec::with_capacity(outcomes.len());
        for outcome in &outcomes {
            if !outcome.probability.is_finite() {
                return Err(ConfigError::NonFiniteProbability { kind: outcome.kind });
            }
            if outcome.probability < 0.0 {
                return Err(ConfigError::NegativeProbability {
                    kind: outcome.kind,
                    probability: outcome.probability,
                });
            }
            if seen.contains(&outcome.kind) {
                return Err(ConfigError::DuplicateOutcome { kind: outcome.kind });
            }
            if outcome.is_success != (outcome.kind == OutcomeKind::Perfect) {
                return Err(ConfigError::SuccessMismatch {
                    kind: outcome.kind,
                    is_success: outcome.is_success,
                });
            }
            seen.push(outcome.kind);
        }

        let sum: f64 = outcomes.iter().map(|o| o.probability).sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ConfigError::ProbabilitySum { sum });
        }

        Ok(Self { outcomes })
    }

    /// Select the outcome for a draw `r` in [0, 1)
    pub fn select(&self, r: f64) -> &Outcome {
        // Validated on construction, so only the drift fallback can apply
        select_outcome(&self.outcomes, r).unwrap_or(&self.outcomes[0])
    }

    /// Draw `r` from the RNG and select
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &Outcome {
        let r: f64 = rng.random();
        self.select(r)
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn get(&self, kind: OutcomeKind) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.kind == kind)
    }
}

impl Default for OutcomeTable {
    fn default() -> Self {
        Self {
            outcomes: vec![
                Outcome::new(OutcomeKind::Perfect, 360.0, 0.30, true),
                Outcome::new(OutcomeKind::UpsideDown, 540.0, 0.35, false),
                Outcome::new(OutcomeKind::Fallen, 450.0, 0.35, false),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn kind_at(r: f64) -> OutcomeKind {
        OutcomeTable::default().select(r).kind
    }

    #[test]
    fn test_canonical_table_is_valid() {
        let table = OutcomeTable::default();
        assert!(OutcomeTable::new(table.outcomes().to_vec()).is_ok());
    }

    #[test]
    fn test_select_boundaries() {
        assert_eq!(kind_at(0.0), OutcomeKind::Perfect);
        assert_eq!(kind_at(0.29), OutcomeKind::Perfect);
        assert_eq!(kind_at(0.30), OutcomeKind::UpsideDown);
        assert_eq!(kind_at(0.64), OutcomeKind::UpsideDown);
        assert_eq!(kind_at(0.66), OutcomeKind::Fallen);
        assert_eq!(kind_at(0.999), OutcomeKind::Fallen);
    }

    #[test]
    fn test_drift_falls_back_to_first() {
        let table = [
            Outcome::new(OutcomeKind::Perfect, 360.0, 0.5, true),
            Outcome::new(OutcomeKind::Fallen, 450.0, 0.4999999999, false),
        ];
        let picked = select_outcome(&table, 0.99999999999).unwrap();
        assert_eq!(picked.kind, OutcomeKind::Perfect);
    }

    #[test]
    fn test_select_rejects_empty_and_negative() {
        assert!(matches!(select_outcome(&[], 0.5), Err(ConfigError::Empty)));

        let table = [
            Outcome::new(OutcomeKind::Perfect, 360.0, 1.5, true),
            Outcome::new(OutcomeKind::Fallen, 450.0, -0.5, false),
        ];
        assert!(matches!(
            select_outcome(&table, 0.1),
            Err(ConfigError::NegativeProbability {
                kind: OutcomeKind::Fallen,
                ..
            })
        ));
    }

    #[test]
    fn test_table_validation() {
        assert!(matches!(OutcomeTable::new(vec![]), Err(ConfigError::Empty)));

        let short = vec![
            Outcome::new(OutcomeKind::Perfect, 360.0, 0.3, true),
            Outcome::new(OutcomeKind::Fallen, 450.0, 0.3, false),
        ];
        assert!(matches!(
            OutcomeTable::new(short),
            Err(ConfigError::ProbabilitySum { .. })
        ));

        let nan = vec![Outcome::new(OutcomeKind::Perfect, 360.0, f64::NAN, true)];
        assert!(matches!(
            OutcomeTable::new(nan),
            Err(ConfigError::NonFiniteProbability { .. })
        ));

        let dup = vec![
            Outcome::new(OutcomeKind::Fallen, 450.0, 0.5, false),
            Outcome::new(OutcomeKind::Fallen, 450.0, 0.5, false),
        ];
        assert!(matches!(
            OutcomeTable::new(dup),
            Err(ConfigError::DuplicateOutcome { .. })
        ));

        let lucky_fall = vec![
            Outcome::new(OutcomeKind::Perfect, 360.0, 0.5, true),
            Outcome::new(OutcomeKind::Fallen, 450.0, 0.5, true),
        ];
        assert!(matches!(
            OutcomeTable::new(lucky_fall),
            Err(ConfigError::SuccessMismatch { .. })
        ));
    }

    #[test]
    fn test_table_json() {
        let json = r#"[
            {"name": "perfect", "rotation": 360, "probability": 0.5, "is_success": true},
            {"name": "upside-down", "rotation": 540, "probability": 0.5, "is_success": false}
        ]"#;
        let outcomes: Vec<Outcome> = serde_json::from_str(json).unwrap();
        let table = OutcomeTable::new(outcomes).unwrap();
        assert_eq!(table.outcomes().len(), 2);
        assert_eq!(table.select(0.75).kind, OutcomeKind::UpsideDown);
        assert_eq!(
            serde_json::from_str::<Vec<Outcome>>(&serde_json::to_string(&table).unwrap()).unwrap(),
            table.outcomes()
        );
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let table = OutcomeTable::default();
        let mut a = Pcg32::seed_from_u64(7);
        let mut b = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(table.draw(&mut a).kind, table.draw(&mut b).kind);
        }
    }

    proptest! {
        #[test]
        fn prop_select_is_pure(r in 0.0f64..1.0) {
            let table = OutcomeTable::default();
            prop_assert_eq!(table.select(r), table.select(r));
        }

        #[test]
        fn prop_select_matches_interval(r in 0.0f64..1.0) {
            let expected = if r < 0.30 {
                OutcomeKind::Perfect
            } else if r < 0.30 + 0.35 {
                OutcomeKind::UpsideDown
            } else {
                OutcomeKind::Fallen
            };
            // Inside the drift band the first entry is the documented answer
            let actual = kind_at(r);
            prop_assert!(actual == expected || (r >= 0.999_999 && actual == OutcomeKind::Perfect));
        }
    }
}
