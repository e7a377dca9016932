//! services/api/src/coach/analyze.rs
//!
//! Tutor-style feedback on a learner's sentence or paragraph.

use crate::coach::prompts::ANALYSIS_INSTRUCTIONS;
use lingo_core::domain::{Analysis, ChatMessage, GenerationOptions, GenerationRequest};
use lingo_core::ports::{PortResult, TextGenerationService};
use lingo_core::validation::AnalysisInput;

/// Returns the model's feedback verbatim. An empty reply yields empty feedback.
pub async fn analyze_text(
    llm: &dyn TextGenerationService,
    model: &str,
    input: &AnalysisInput,
) -> PortResult<Analysis> {
    let request = GenerationRequest::Chat {
        messages: vec![
            ChatMessage::system(ANALYSIS_INSTRUCTIONS.replace("{level}", input.level.as_str())),
            ChatMessage::user(input.text.clone()),
        ],
    };
    let options = GenerationOptions::for_model(model)
        .with_temperature(0.4)
        .with_max_output_tokens(1000);

    let result = llm.generate(&request, &options).await?;
    Ok(Analysis {
        level: input.level,
        feedback: result.text.trim().to_string(),
        model: result.model_id,
        usage: result.usage,
    })
}
