//! crates/lingo_core/src/model_family.rs
//!
//! Reasoning models reject sampling parameters, so they are stripped from the
//! options before any outbound payload is built.

use crate::domain::GenerationOptions;
use tracing::warn;

/// Model id prefixes of the reasoning family.
pub const REASONING_MODEL_PREFIXES: [&str; 4] = ["o1", "o3", "o4", "gpt-5"];

pub fn is_reasoning_model(model: &str) -> bool {
    let model = model.trim().to_ascii_lowercase();
    REASONING_MODEL_PREFIXES
        .iter()
        .any(|prefix| model.starts_with(prefix))
}

/// Returns the options that may actually be sent for `options.model`, plus the
/// names of any parameters that were removed.
pub fn gate_options(mut options: GenerationOptions) -> (GenerationOptions, Vec<&'static str>) {
    let mut dropped = Vec::new();
    if is_reasoning_model(&options.model) {
        if options.temperature.take().is_some() {
            dropped.push("temperature");
        }
        if options.top_p.take().is_some() {
            dropped.push("top_p");
        }
    }
    if !dropped.is_empty() {
        warn!(
            model = %options.model,
            dropped = ?dropped,
            "Dropping sampling parameters unsupported by reasoning model"
        );
    }
    (options, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_reasoning_prefixes() {
        for model in ["o1-mini", "o3", "O4-mini", "gpt-5-nano"] {
            assert!(is_reasoning_model(model), "{} should be reasoning", model);
        }
        for model in ["gpt-4o", "gpt-4o-mini", "gpt-4.1", "whisper-1"] {
            assert!(!is_reasoning_model(model), "{} should not be reasoning", model);
        }
    }

    #[test]
    fn strips_sampling_for_reasoning_models() {
        let mut options = GenerationOptions::for_model("o3-mini").with_temperature(0.7);
        options.top_p = Some(0.9);
        options.max_output_tokens = Some(200);

        let (gated, dropped) = gate_options(options);
        assert_eq!(gated.temperature, None);
        assert_eq!(gated.top_p, None);
        assert_eq!(gated.max_output_tokens, Some(200));
        assert_eq!(dropped, vec!["temperature", "top_p"]);
    }

    #[test]
    fn keeps_sampling_for_other_models() {
        let options = GenerationOptions::for_model("gpt-4o").with_temperature(0.7);
        let (gated, dropped) = gate_options(options);
        assert_eq!(gated.temperature, Some(0.7));
        assert!(dropped.is_empty());
    }
}
