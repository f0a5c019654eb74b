//! Explanation Builder
//!
//! Dựng factor list theo thứ tự cố định từ `ExplainInput`, rồi giao cho renderer.

use log::debug;
use crate::logic::urgency::{DecisionStep, EnvironmentRisk};
use super::render::{ExplanationRenderer, TextRenderer};
use super::types::{ExplainInput, ExplanationTrace, Factor, FactorKind};

/// Build the factor list and render it with the default text renderer
pub fn explain(input: &ExplainInput) -> ExplanationTrace {
    explain_with(input, &TextRenderer)
}

pub fn explain_with(input: &ExplainInput, renderer: &dyn ExplanationRenderer) -> ExplanationTrace {
    let factors = build_factors(input);
    let summary = renderer.render(&factors);
    debug!("Explanation: {} factors", factors.len());
    ExplanationTrace { factors, summary }
}

/// Ordered factors: basis, base urgency, then each rule that fired
pub fn build_factors(input: &ExplainInput) -> Vec<Factor> {
    let mut factors = Vec::with_capacity(3 + input.steps.len());

    factors.push(Factor {
        kind: FactorKind::ConfidenceBasis,
        name: "Victim-presence confidence".to_string(),
        effect: format!(
            "Sensor fusion rates victim presence {} (p={:.2}).",
            input.confidence, input.probability
        ),
    });

    factors.push(Factor {
        kind: FactorKind::BaseUrgency,
        name: "Base urgency".to_string(),
        effect: format!(
            "{} confidence sets base urgency {}.",
            input.confidence, input.base_urgency
        ),
    });

    for step in &input.steps {
        factors.push(step_factor(step));
    }

    if input.steps.is_empty() {
        let effect = match input.risk {
            EnvironmentRisk::Low => format!(
                "LOW environmental risk does not escalate; urgency stays {}.",
                input.final_urgency
            ),
            risk => format!(
                "{} environmental risk does not escalate a base urgency of {}; urgency stays {}.",
                risk, input.base_urgency, input.final_urgency
            ),
        };
        factors.push(Factor {
            kind: FactorKind::NoEscalation,
            name: "Environmental risk".to_string(),
            effect,
        });
    }

    factors
}

fn step_factor(step: &DecisionStep) -> Factor {
    match step {
        DecisionStep::Escalated { risk, from, to } => Factor {
            kind: FactorKind::RiskEscalation,
            name: "Environmental risk".to_string(),
            effect: format!(
                "{} environmental risk escalates urgency from {} to {}.",
                risk, from, to
            ),
        },
        DecisionStep::Suppressed { risk } => Factor {
            kind: FactorKind::RiskSuppressed,
            name: "Environmental risk".to_string(),
            effect: format!(
                "{} environmental risk does not raise urgency without a victim signal; \
                 hazard alone is a site-safety matter.",
                risk
            ),
        },
        DecisionStep::Capped { risk } => Factor {
            kind: FactorKind::CeilingCap,
            name: "Urgency ceiling".to_string(),
            effect: format!(
                "{} environmental risk cannot escalate past CRITICAL; urgency capped at CRITICAL.",
                risk
            ),
        },
    }
}
