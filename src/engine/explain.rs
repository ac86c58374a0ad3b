//! Traced cascade runs for diagnostics.
//!
//! [`ValidationEngine::explain`] executes exactly the same layer table as
//! `validate`, but records every layer it visits along with the scoring
//! inputs, so a surprising decision can be traced to the layer that made it.

use crate::layout::KeyboardLayout;

use super::validator::{ValidationEngine, ValidationResult, WordContext, LAYERS};

/// One visited cascade layer.
#[derive(Debug, Clone)]
pub struct LayerStep {
    /// Stable layer name from the cascade table.
    pub name: &'static str,
    /// The reason tag when this layer decided; `None` when it passed.
    pub decision: Option<String>,
}

/// Full record of one traced validation.
#[derive(Debug, Clone)]
pub struct CascadeTrace {
    pub word: String,
    pub current: KeyboardLayout,
    pub bias: Option<KeyboardLayout>,
    /// The word remapped to the opposite layout, symbols included.
    pub swapped: String,
    pub original_score: f64,
    pub swapped_score: f64,
    /// `exp(swapped_score - original_score)`.
    pub ratio: f64,
    /// Layers visited, in order; the last one carries the decision.
    pub steps: Vec<LayerStep>,
    pub result: ValidationResult,
}

impl std::fmt::Display for CascadeTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:?} [{}]{}",
            self.word,
            self.current,
            match self.bias {
                Some(b) => format!(" bias={}", b),
                None => String::new(),
            }
        )?;
        writeln!(
            f,
            "  swapped: {:?}  scores: {:.4} / {:.4}  ratio: {:.4}",
            self.swapped, self.original_score, self.swapped_score, self.ratio
        )?;
        for step in &self.steps {
            match &step.decision {
                Some(reason) => writeln!(f, "  {} -> {}", step.name, reason)?,
                None => writeln!(f, "  {} -> pass", step.name)?,
            }
        }
        match &self.result {
            ValidationResult::Keep { .. } => write!(f, "  verdict: keep"),
            ValidationResult::Switch {
                target, converted, ..
            } => write!(f, "  verdict: switch to {} as {:?}", target, converted),
        }
    }
}

impl ValidationEngine {
    /// Run the cascade and record every visited layer.
    ///
    /// The decision is identical to [`ValidationEngine::validate`] for the
    /// same inputs; only the bookkeeping differs. Unlike `validate`, the
    /// trace always computes both n-gram scores so the report is complete
    /// even when a cheap guard short-circuits — diagnostics pay the
    /// scoring cost that the hot path avoids.
    pub fn explain(
        &self,
        word: &str,
        current: KeyboardLayout,
        bias: Option<KeyboardLayout>,
    ) -> CascadeTrace {
        let ctx = WordContext::new(word, current, bias);
        let mut steps = Vec::new();
        let mut result = None;

        for &(name, layer) in LAYERS {
            match layer(self, &ctx) {
                Some(decision) => {
                    steps.push(LayerStep {
                        name,
                        decision: Some(decision.reason().to_string()),
                    });
                    result = Some(decision);
                    break;
                }
                None => steps.push(LayerStep {
                    name,
                    decision: None,
                }),
            }
        }

        let (original_score, swapped_score) = ctx.scores(self.scorer());
        CascadeTrace {
            word: word.to_string(),
            current,
            bias,
            swapped: ctx.swapped().to_string(),
            original_score,
            swapped_score,
            ratio: (swapped_score - original_score).exp(),
            steps,
            // the terminal layer always decides
            result: result.unwrap_or(ValidationResult::Keep {
                reason: super::validator::Reason::NoConfidentSignal,
            }),
        }
    }
}
