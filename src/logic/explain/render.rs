//! Explanation Renderers
//!
//! Factor list là dữ liệu; render chỉ là bước trình bày cuối, đổi được.

use log::error;
use super::types::Factor;

pub trait ExplanationRenderer {
    fn render(&self, factors: &[Factor]) -> String;
}

/// One paragraph: factor effects joined in order
pub struct TextRenderer;

impl ExplanationRenderer for TextRenderer {
    fn render(&self, factors: &[Factor]) -> String {
        factors
            .iter()
            .map(|f| f.effect.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// JSON array of factors for machine consumers
pub struct JsonRenderer;

impl ExplanationRenderer for JsonRenderer {
    fn render(&self, factors: &[Factor]) -> String {
        match serde_json::to_string(factors) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to render explanation as JSON: {}", e);
                String::from("[]")
            }
        }
    }
}
