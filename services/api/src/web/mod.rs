pub mod docs;
pub mod envelope;
pub mod gpt;
pub mod health;
pub mod practice;
pub mod router;
pub mod state;
pub mod whisper;

// Re-export the router builder so the binary and the integration tests share
// exactly the same routes.
pub use router::build_router;
