//! Explain Module - Decision trace → factors + rationale
//!
//! Không re-derive quyết định nào, chỉ kể lại những gì confidence / urgency đã quyết.

pub mod types;
pub mod engine;
pub mod render;

pub use types::{ExplainInput, ExplanationTrace, Factor, FactorKind};
pub use engine::{build_factors, explain, explain_with};
pub use render::{ExplanationRenderer, JsonRenderer, TextRenderer};
