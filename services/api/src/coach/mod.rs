//! services/api/src/coach/mod.rs
//!
//! The practice features built on top of the text-generation port. Each task
//! takes already-validated input, issues one provider call, and turns the reply
//! into a typed result.

pub mod analyze;
pub mod exercise;
pub mod prompts;
pub mod suggest;
pub mod translate;

pub use analyze::analyze_text;
pub use exercise::generate_exercises;
pub use suggest::suggest_replies;
pub use translate::translate;
