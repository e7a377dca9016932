//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use lingo_core::ports::{DatabaseService, SpeechToTextService, TextGenerationService};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
/// Nothing in it is mutated after construction.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub sst_adapter: Arc<dyn SpeechToTextService>,
    pub llm_adapter: Arc<dyn TextGenerationService>,
}
