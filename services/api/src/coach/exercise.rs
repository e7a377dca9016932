//! services/api/src/coach/exercise.rs
//!
//! Practice exercise generation for a topic and difficulty.

use crate::coach::prompts::EXERCISE_INSTRUCTIONS;
use lingo_core::domain::{ExerciseSet, GenerationOptions, GenerationRequest};
use lingo_core::ports::{PortResult, TextGenerationService};
use lingo_core::recovery::recover_list;
use lingo_core::validation::ExerciseInput;

pub async fn generate_exercises(
    llm: &dyn TextGenerationService,
    model: &str,
    input: &ExerciseInput,
) -> PortResult<ExerciseSet> {
    let instructions = EXERCISE_INSTRUCTIONS
        .replace("{count}", &input.count.to_string())
        .replace("{difficulty}", input.difficulty.as_str());
    let request = GenerationRequest::SingleInput {
        text: input.topic.clone(),
        instructions: Some(instructions),
    };
    // Roughly 80 tokens per exercise plus the JSON wrapper.
    let options = GenerationOptions::for_model(model)
        .with_temperature(0.7)
        .with_max_output_tokens(200 + 80 * input.count);

    let result = llm.generate(&request, &options).await?;
    let exercises = recover_list(&result.text, "exercises", input.count as usize)?;

    Ok(ExerciseSet {
        topic: input.topic.clone(),
        difficulty: input.difficulty,
        exercises,
    })
}
