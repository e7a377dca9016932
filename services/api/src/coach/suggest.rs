//! services/api/src/coach/suggest.rs
//!
//! Reply suggestions: three things the learner could say next.

use crate::coach::prompts::SUGGESTION_INSTRUCTIONS;
use lingo_core::domain::{GenerationOptions, GenerationRequest, SuggestionSet};
use lingo_core::ports::{PortResult, TextGenerationService};
use lingo_core::recovery::recover_suggestions;
use lingo_core::validation::SuggestionInput;

pub async fn suggest_replies(
    llm: &dyn TextGenerationService,
    model: &str,
    input: &SuggestionInput,
) -> PortResult<SuggestionSet> {
    let request = GenerationRequest::SingleInput {
        text: input.text.clone(),
        instructions: Some(SUGGESTION_INSTRUCTIONS.replace("{level}", input.level.as_str())),
    };
    let options = GenerationOptions::for_model(model)
        .with_temperature(0.8)
        .with_max_output_tokens(500);

    let result = llm.generate(&request, &options).await?;
    recover_suggestions(&result.text)
}
