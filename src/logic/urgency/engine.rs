//! Urgency Decision Engine
//!
//! CORE LOGIC - Deterministic and Explainable
//!
//! (confidence × risk) → base urgency → escalation → ceiling.
//! Toàn bộ 15 ô được tính sẵn thành DecisionTable khi khởi tạo, runtime chỉ lookup.
//! Ô thiếu ⇒ InvalidEnumValue (fail closed), không bao giờ đoán urgency.

use std::collections::BTreeMap;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::logic::confidence::ConfidenceLevel;
use crate::logic::error::{Stage, TriageError};
use super::rules::UrgencyPolicy;
use super::types::{DecisionStep, EnvironmentRisk, UrgencyLevel};

// ============================================================================
// DECISION
// ============================================================================

/// One resolved cell of the decision table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub confidence: ConfidenceLevel,
    pub risk: EnvironmentRisk,
    pub base_urgency: UrgencyLevel,
    pub urgency: UrgencyLevel,
    pub steps: Vec<DecisionStep>,
}

/// Apply the escalation rules to one (confidence, risk) pair
pub fn evaluate(
    policy: &UrgencyPolicy,
    confidence: ConfidenceLevel,
    risk: EnvironmentRisk,
) -> Result<Decision, TriageError> {
    let base_urgency = policy.base_urgency(confidence)?;
    let mut urgency = base_urgency;
    let mut steps = Vec::new();

    // 1. Hazard without a victim signal is not victim urgency
    if confidence == ConfidenceLevel::None && risk > EnvironmentRisk::Low {
        steps.push(DecisionStep::Suppressed { risk });
    } else {
        // 2./3. Risk escalates by at most one tier
        let escalate = match risk {
            EnvironmentRisk::High => true,
            EnvironmentRisk::Medium => base_urgency < UrgencyLevel::High,
            EnvironmentRisk::Low => false,
        };

        if escalate {
            // 4. Ceiling
            match urgency.next() {
                Some(next) => {
                    steps.push(DecisionStep::Escalated { risk, from: urgency, to: next });
                    urgency = next;
                }
                None => steps.push(DecisionStep::Capped { risk }),
            }
        }
    }

    Ok(Decision {
        confidence,
        risk,
        base_urgency,
        urgency,
        steps,
    })
}

// ============================================================================
// DECISION TABLE
// ============================================================================

/// Precomputed, inspectable confidence × risk table
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTable {
    cells: BTreeMap<(ConfidenceLevel, EnvironmentRisk), Decision>,
}

impl DecisionTable {
    pub fn from_policy(policy: &UrgencyPolicy) -> Result<Self, TriageError> {
        policy.validate()?;

        let mut cells = BTreeMap::new();
        for confidence in ConfidenceLevel::ALL {
            for risk in EnvironmentRisk::ALL {
                cells.insert((confidence, risk), evaluate(policy, confidence, risk)?);
            }
        }

        Ok(Self { cells })
    }

    /// Resolved cell; a missing cell fails closed
    pub fn lookup(&self, confidence: ConfidenceLevel, risk: EnvironmentRisk) -> Result<&Decision, TriageError> {
        self.cells
            .get(&(confidence, risk))
            .ok_or_else(|| TriageError::InvalidEnumValue {
                stage: Stage::Decision,
                field: "decision_table",
                value: format!("{}/{}", confidence, risk),
            })
    }

    pub fn decide(
        &self,
        confidence: ConfidenceLevel,
        risk: EnvironmentRisk,
    ) -> Result<(UrgencyLevel, Vec<DecisionStep>), TriageError> {
        let decision = self.lookup(confidence, risk)?;
        debug!(
            "Decision {}/{} -> base {} final {} ({} steps)",
            confidence,
            risk,
            decision.base_urgency,
            decision.urgency,
            decision.steps.len()
        );
        Ok((decision.urgency, decision.steps.clone()))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Decision> {
        self.cells.values()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Plain-text grid: one row per confidence level, one column per risk
    pub fn render(&self) -> String {
        let mut out = format!("{:<12}", "CONFIDENCE");
        for risk in EnvironmentRisk::ALL {
            out.push_str(&format!("{:<12}", format!("RISK {}", risk)));
        }
        out.push('\n');

        for confidence in ConfidenceLevel::ALL {
            out.push_str(&format!("{:<12}", confidence.as_str()));
            for risk in EnvironmentRisk::ALL {
                let cell = match self.cells.get(&(confidence, risk)) {
                    Some(d) => d.urgency.as_str(),
                    None => "<missing>",
                };
                out.push_str(&format!("{:<12}", cell));
            }
            out.push('\n');
        }

        out
    }

    #[cfg(test)]
    pub(crate) fn remove_cell(&mut self, confidence: ConfidenceLevel, risk: EnvironmentRisk) {
        self.cells.remove(&(confidence, risk));
    }
}

/// Decide with the default policy
pub fn decide(
    confidence: ConfidenceLevel,
    risk: EnvironmentRisk,
) -> Result<(UrgencyLevel, Vec<DecisionStep>), TriageError> {
    DecisionTable::from_policy(&UrgencyPolicy::default())?.decide(confidence, risk)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ConfidenceLevel as C;
    use EnvironmentRisk as R;
    use UrgencyLevel as U;

    fn table() -> DecisionTable {
        DecisionTable::from_policy(&UrgencyPolicy::default()).unwrap()
    }

    #[test]
    fn test_full_table() {
        let expected = [
            (C::None, [U::None, U::None, U::None]),
            (C::Low, [U::Moderate, U::High, U::High]),
            (C::Moderate, [U::Moderate, U::High, U::High]),
            (C::High, [U::High, U::High, U::Critical]),
            (C::Critical, [U::Critical, U::Critical, U::Critical]),
        ];

        let table = table();
        assert_eq!(table.len(), 15);
        for (confidence, row) in expected {
            for (risk, urgency) in R::ALL.iter().zip(row) {
                assert_eq!(
                    table.lookup(confidence, *risk).unwrap().urgency,
                    urgency,
                    "cell {}/{}",
                    confidence,
                    risk
                );
            }
        }
    }

    #[test]
    fn test_monotone_in_risk_and_confidence() {
        let table = table();
        for confidence in C::ALL {
            let row: Vec<U> = R::ALL.iter().map(|r| table.lookup(confidence, *r).unwrap().urgency).collect();
            assert!(row.windows(2).all(|w| w[0] <= w[1]), "row {}", confidence);
        }
        for risk in R::ALL {
            let column: Vec<U> = C::ALL.iter().map(|c| table.lookup(*c, risk).unwrap().urgency).collect();
            assert!(column.windows(2).all(|w| w[0] <= w[1]), "column {}", risk);
        }
    }

    #[test]
    fn test_escalation_is_at_most_one_tier() {
        for decision in table().cells() {
            assert!(decision.urgency.severity_level() <= decision.base_urgency.severity_level() + 1);
            assert!(decision.urgency <= U::Critical);
        }
    }

    #[test]
    fn test_moderate_high_risk_escalates_once() {
        let (urgency, steps) = table().decide(C::Moderate, R::High).unwrap();
        assert_eq!(urgency, U::High);
        assert_eq!(
            steps,
            vec![DecisionStep::Escalated { risk: R::High, from: U::Moderate, to: U::High }]
        );
    }

    #[test]
    fn test_critical_high_risk_is_capped() {
        let (urgency, steps) = table().decide(C::Critical, R::High).unwrap();
        assert_eq!(urgency, U::Critical);
        assert_eq!(steps, vec![DecisionStep::Capped { risk: R::High }]);
    }

    #[test]
    fn test_medium_risk_does_not_escalate_high_base() {
        let (urgency, steps) = table().decide(C::High, R::Medium).unwrap();
        assert_eq!(urgency, U::High);
        assert!(steps.is_empty());
    }

    #[test]
    fn test_no_signal_is_suppressed() {
        for risk in [R::Medium, R::High] {
            let (urgency, steps) = table().decide(C::None, risk).unwrap();
            assert_eq!(urgency, U::None);
            assert_eq!(steps, vec![DecisionStep::Suppressed { risk }]);
        }
        let (_, steps) = table().decide(C::None, R::Low).unwrap();
        assert!(steps.is_empty());
    }

    #[test]
    fn test_missing_cell_fails_closed() {
        let mut table = table();
        table.remove_cell(C::High, R::High);

        let err = table.decide(C::High, R::High).unwrap_err();
        assert!(matches!(err, TriageError::InvalidEnumValue { stage: Stage::Decision, .. }));
        assert!(err.to_string().contains("HIGH/HIGH"));
        assert!(table.render().contains("<missing>"));
    }

    #[test]
    fn test_free_decide_matches_table() {
        assert_eq!(decide(C::Low, R::Medium).unwrap().0, U::High);
    }

    #[test]
    fn test_render_lists_every_level() {
        let text = table().render();
        for confidence in C::ALL {
            assert!(text.contains(confidence.as_str()));
        }
        assert_eq!(text.lines().count(), 6);
    }
}
